//! Construction of the callable namespace a template executes against.
//!
//! A namespace is a MiniJinja [`Environment`] built fresh for every render:
//! helper libraries are installed first, then the secret lookup is bound under
//! [`SECRET_FUNCTION`] both as a global function and as a filter, so either
//! `{{ vault("db/password") }}` or `{{ "db/password" | vault }}` works.
//!
//! Installing the lookup last means it replaces any helper that happens to use
//! the same name.

use crate::resolver::SecretResolver;
use minijinja::{AutoEscape, Environment, Error, ErrorKind, UndefinedBehavior};
use std::sync::Arc;

/// The reserved name templates use to look up a secret.
pub const SECRET_FUNCTION: &str = "vault";

/// Installs a set of helper functions, filters or tests into a namespace.
pub type HelperInstaller = fn(&mut Environment<'_>);

/// The default helper library: `minijinja-contrib` filters and globals plus
/// Python-style string and collection methods (`"x".upper()`, `d.items()`).
pub fn contrib_helpers(env: &mut Environment<'_>) {
    minijinja_contrib::add_to_environment(env);
    env.set_unknown_method_callback(minijinja_contrib::pycompat::unknown_method_callback);
}

/// Builds a namespace from `helpers` with `resolver` bound under
/// [`SECRET_FUNCTION`].
///
/// Rendering is configured for configuration files rather than HTML: values
/// are never auto-escaped, undefined values are errors and the source's
/// trailing newline is kept.
pub fn build<'source>(
    helpers: &[HelperInstaller],
    resolver: Arc<dyn SecretResolver>,
) -> Environment<'source> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_auto_escape_callback(|_name: &str| AutoEscape::None);
    env.set_keep_trailing_newline(true);

    for install in helpers {
        install(&mut env);
    }

    let for_function = Arc::clone(&resolver);
    env.add_function(SECRET_FUNCTION, move |path: String| {
        lookup(for_function.as_ref(), &path)
    });
    env.add_filter(SECRET_FUNCTION, move |path: String| {
        lookup(resolver.as_ref(), &path)
    });

    tracing::debug!(
        helpers = helpers.len(),
        function = SECRET_FUNCTION,
        "built template namespace"
    );
    env
}

fn lookup(resolver: &dyn SecretResolver, path: &str) -> Result<String, Error> {
    tracing::debug!(resolver = resolver.name(), path, "resolving secret");
    resolver.query_secret(path).map_err(|err| {
        Error::new(
            ErrorKind::InvalidOperation,
            format!("{}({:?}) failed: {}", SECRET_FUNCTION, path, err),
        )
        .with_source(err)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::SecretError;

    fn no_secrets() -> Arc<dyn SecretResolver> {
        Arc::new(|path: &str| -> Result<String, SecretError> {
            Err(SecretError::NotFound(path.to_string()))
        })
    }

    #[test]
    fn test_contrib_helpers_are_installed() {
        let env = build(&[contrib_helpers as HelperInstaller], no_secrets());
        let rendered = env
            .render_str("{{ 1 | pluralize }}|{{ 2 | pluralize }}", ())
            .unwrap();
        assert_eq!(rendered, "|s");
    }

    #[test]
    fn test_pycompat_methods_are_available() {
        let env = build(&[contrib_helpers as HelperInstaller], no_secrets());
        let rendered = env.render_str("{{ 'db'.upper() }}", ()).unwrap();
        assert_eq!(rendered, "DB");
    }

    #[test]
    fn test_no_helpers_still_binds_secret_function() {
        let resolver: Arc<dyn SecretResolver> =
            Arc::new(|path: &str| -> Result<String, SecretError> { Ok(format!("<{path}>")) });
        let env = build(&[], resolver);
        let rendered = env.render_str("{{ vault('a') }} {{ 'b' | vault }}", ()).unwrap();
        assert_eq!(rendered, "<a> <b>");
    }

    #[test]
    fn test_lookup_error_keeps_cause() {
        let err = lookup(no_secrets().as_ref(), "missing").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
        let cause = std::error::Error::source(&err)
            .and_then(|source| source.downcast_ref::<SecretError>())
            .unwrap();
        assert_eq!(cause, &SecretError::NotFound("missing".to_string()));
    }
}
