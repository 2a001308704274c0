//! Error types for vault-template operations

use std::io;
use std::path::PathBuf;
use thiserror::Error;
use vault_template_core::RenderError;

/// The main error type for vault-template operations
///
/// Each stage of generating a file has its own variant so that the message
/// names the step that failed (reading the token, reaching Vault, rendering,
/// writing the result).
#[derive(Error, Debug)]
pub enum VaultTemplateError {
    #[error("{0}")]
    MissingSetting(&'static str),
    #[error("{0}")]
    InvalidSetting(&'static str),
    #[error("Invalid vault endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
    #[error("Unable to read vault token file {}: {source}", .path.display())]
    TokenFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Vault token file {} is empty", .0.display())]
    EmptyToken(PathBuf),
    #[error("Unable to create vault client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("Unable to read template file {}: {source}", .path.display())]
    TemplateFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Unable to render template: {0}")]
    Render(#[from] RenderError),
    #[error("Unable to write output file {}: {source}", .path.display())]
    OutputFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A type alias for `Result<T, VaultTemplateError>`
pub type Result<T> = std::result::Result<T, VaultTemplateError>;
