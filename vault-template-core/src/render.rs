use crate::error::{ParseError, RenderError};
use crate::namespace::{self, HelperInstaller};
use crate::resolver::SecretResolver;
use minijinja::{Environment, Template, context};
use regex::Regex;
use std::collections::HashSet;
use std::sync::Arc;

// Bound by the engine while a template executes (loops, macros, blocks), so
// they never resolve against an empty context up front.
const ENGINE_BOUND_NAMES: &[&str] = &["loop", "caller", "varargs", "kwargs", "self", "super"];

/// Renders templates against a secret resolver.
///
/// The renderer only remembers which helper libraries to install; every call
/// to [`render`](TemplateRenderer::render) builds its own namespace, so one
/// renderer can be shared freely between threads.
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    helpers: Vec<HelperInstaller>,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::with_helpers(vec![namespace::contrib_helpers as HelperInstaller])
    }
}

impl TemplateRenderer {
    /// Creates a renderer with the default helper library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a renderer that installs `helpers`, in order, before binding
    /// the secret lookup.
    pub fn with_helpers(helpers: Vec<HelperInstaller>) -> Self {
        Self { helpers }
    }

    /// Parses and executes `source`, returning the rendered bytes.
    ///
    /// Rendering is all-or-nothing: either the complete output is returned or
    /// the first error is. Syntax errors and references to unknown names are
    /// reported as [`RenderError::Parse`] before `resolver` is ever called.
    /// A failing call during execution, most notably a secret lookup, stops
    /// the render and is reported as [`RenderError::Execution`].
    pub fn render(
        &self,
        resolver: Arc<dyn SecretResolver>,
        source: &str,
    ) -> Result<Vec<u8>, RenderError> {
        let env = namespace::build(&self.helpers, resolver);
        let template = env.template_from_str(source).map_err(ParseError::Syntax)?;
        ensure_names_bound(&env, &template, source)?;

        let rendered = template.render(context! {}).map_err(|err| {
            tracing::debug!(error = %err, "template execution failed");
            RenderError::Execution(err)
        })?;

        tracing::info!(bytes = rendered.len(), "rendered template");
        Ok(rendered.into_bytes())
    }
}

/// Rejects templates that read a name the namespace does not bind.
///
/// The data context is always empty, so any name a template reads has to be
/// either a global of the namespace or assigned by the template itself. Names
/// assigned inside a nested block (`{% if %}{% set x = .. %}{% endif %}`) are
/// invisible to MiniJinja's own tracker, so assignment tags are collected from
/// the source as well. Anything this check lets through is still caught by
/// strict undefined handling during execution.
fn ensure_names_bound(
    env: &Environment<'_>,
    template: &Template<'_, '_>,
    source: &str,
) -> Result<(), ParseError> {
    let globals: HashSet<&str> = env
        .globals()
        .filter(|(_, value)| !value.is_undefined())
        .map(|(name, _)| name)
        .collect();

    let mut unbound: Vec<String> = template
        .undeclared_variables(false)
        .into_iter()
        .filter(|name| !ENGINE_BOUND_NAMES.contains(&name.as_str()))
        .filter(|name| !globals.contains(name.as_str()))
        .collect();
    if unbound.is_empty() {
        return Ok(());
    }

    let assigned = match assigned_names(source) {
        Ok(assigned) => assigned,
        Err(err) => {
            tracing::warn!(error = %err, "skipping unknown name check");
            return Ok(());
        }
    };
    unbound.retain(|name| !assigned.contains(name.as_str()));
    unbound.sort();

    match unbound.into_iter().next() {
        Some(name) => Err(ParseError::UndefinedName(name)),
        None => Ok(()),
    }
}

/// Collects every name a `set`, `macro`, `import` or `from` tag in `source`
/// assigns, regardless of the block it sits in.
fn assigned_names(source: &str) -> Result<HashSet<&str>, regex::Error> {
    let tag = Regex::new(r"(?s)\{%[-+]?\s*(set|macro|import|from)\s+(.*?)[-+]?%\}")?;
    let ident = Regex::new(r"[A-Za-z_][A-Za-z0-9_]*")?;

    let mut names = HashSet::new();
    for caps in tag.captures_iter(source) {
        let (Some(keyword), Some(body)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let body = body.as_str();
        let targets = match keyword.as_str() {
            "set" => body.split('=').next().unwrap_or_default(),
            "macro" => body.split('(').next().unwrap_or_default(),
            "import" => body.rsplit_once(" as ").map_or("", |(_, alias)| alias),
            _ => body.split_once(" import ").map_or("", |(_, names)| names),
        };
        names.extend(
            ident
                .find_iter(targets)
                .map(|m| m.as_str())
                .filter(|name| *name != "as"),
        );
    }
    Ok(names)
}

/// Renders `source` with the default helper library and `resolver` bound as
/// `vault`.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use vault_template_core::{SecretError, render};
///
/// let resolver = Arc::new(|path: &str| -> Result<String, SecretError> {
///     match path {
///         "db-password" => Ok("s3cr3t".to_string()),
///         other => Err(SecretError::NotFound(other.to_string())),
///     }
/// });
///
/// let output = render(resolver, r#"Host: {{ "db-password" | vault }}"#).unwrap();
/// assert_eq!(output, b"Host: s3cr3t");
/// ```
pub fn render(resolver: Arc<dyn SecretResolver>, source: &str) -> Result<Vec<u8>, RenderError> {
    TemplateRenderer::default().render(resolver, source)
}
