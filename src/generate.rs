//! The end-to-end pipeline: token, template, render, output.

use crate::config::Config;
use crate::output::write_output;
use crate::provider::VaultProvider;
use crate::{Result, VaultTemplateError};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use vault_template_core::{SecretResolver, TemplateRenderer};

/// Outcome of a successful generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub template: PathBuf,
    pub output: PathBuf,
    pub bytes: usize,
}

/// Reads a Vault token from `path`, dropping surrounding whitespace such as
/// the trailing newline most tools write.
pub fn read_token(path: &Path) -> Result<String> {
    let raw = fs::read_to_string(path).map_err(|source| VaultTemplateError::TokenFile {
        path: path.to_path_buf(),
        source,
    })?;
    let token = raw.trim();
    if token.is_empty() {
        return Err(VaultTemplateError::EmptyToken(path.to_path_buf()));
    }
    Ok(token.to_string())
}

/// Renders the configured template with secrets from Vault and writes the
/// result to the configured output file.
///
/// Nothing is written unless the whole template rendered successfully.
pub fn generate(config: &Config) -> Result<Report> {
    let token = read_token(&config.vault_token_file)?;
    let provider = VaultProvider::new(config.vault(token))?;
    tracing::debug!(address = %config.vault_address, "created vault client");
    generate_with(config, Arc::new(provider))
}

/// Same as [`generate`], with secrets answered by `resolver` instead of a
/// Vault client built from `config`.
pub fn generate_with(config: &Config, resolver: Arc<dyn SecretResolver>) -> Result<Report> {
    let source =
        fs::read_to_string(&config.template_file).map_err(|source| {
            VaultTemplateError::TemplateFile {
                path: config.template_file.clone(),
                source,
            }
        })?;

    tracing::info!(
        template = %config.template_file.display(),
        resolver = resolver.name(),
        "rendering template"
    );
    let rendered = TemplateRenderer::new().render(resolver, &source)?;

    write_output(&config.output_file, &rendered).map_err(|source| {
        VaultTemplateError::OutputFile {
            path: config.output_file.clone(),
            source,
        }
    })?;

    Ok(Report {
        template: config.template_file.clone(),
        output: config.output_file.clone(),
        bytes: rendered.len(),
    })
}
