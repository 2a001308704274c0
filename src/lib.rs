//! vault-template - render configuration files with secrets from Vault
//!
//! This library generates configuration artifacts (service configs, env files)
//! from templates that look up their credentials in HashiCorp Vault at render
//! time, so no plaintext secret has to live in source control.
//!
//! # Features
//!
//! - **Secret lookups in templates**: `{{ vault("secret/data/db#password") }}`
//!   or `{{ "secret/data/db#password" | vault }}`
//! - **Jinja2 templates**: MiniJinja syntax with the `minijinja-contrib` helpers
//! - **All-or-nothing output**: a failed lookup never leaves a partial file
//! - **Owner-only output**: generated files are written with mode 0600 on Unix
//!
//! # Example
//!
//! ```ignore
//! use vault_template::{Config, Settings, generate};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_settings(Settings {
//!         vault_address: Some("https://vault.internal:8200".into()),
//!         vault_token_file: Some("/run/secrets/vault-token".into()),
//!         template_file: Some("app.conf.tmpl".into()),
//!         output_file: Some("app.conf".into()),
//!         timeout: None,
//!     })?;
//!
//!     let report = generate(&config)?;
//!     println!("wrote {} bytes to {}", report.bytes, report.output.display());
//!     Ok(())
//! }
//! ```

// Internal modules
mod config;
mod error;
mod generate;
mod output;

pub mod provider;

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;

// Public API exports
pub use config::{Config, Settings};
pub use error::{Result, VaultTemplateError};
pub use generate::{Report, generate, generate_with, read_token};
pub use output::write_output;

// Re-export the rendering core for library users
pub use vault_template_core::{
    ParseError, RenderError, SECRET_FUNCTION, SecretError, SecretResolver, TemplateRenderer,
    render,
};
