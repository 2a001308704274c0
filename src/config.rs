//! Process configuration.
//!
//! Settings arrive from command line flags or their environment variables
//! (`VAULT_ADDR`, `VAULT_TOKEN_FILE`, `TEMPLATE_FILE`, `OUTPUT_FILE`,
//! `VAULT_TIMEOUT`). [`Settings`] holds whatever was supplied; [`Config`] is
//! the validated form the rest of the crate works with.

use crate::provider::vault::{DEFAULT_ADDRESS, DEFAULT_TIMEOUT};
use crate::provider::VaultConfig;
use crate::{Result, VaultTemplateError};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Raw, possibly incomplete settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub vault_address: Option<String>,
    pub vault_token_file: Option<PathBuf>,
    pub template_file: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
    pub timeout: Option<Duration>,
}

/// Validated configuration for one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Vault API endpoint
    pub vault_address: Url,
    /// File containing the Vault token
    pub vault_token_file: PathBuf,
    /// Template to render
    pub template_file: PathBuf,
    /// Where the rendered output is written
    pub output_file: PathBuf,
    /// Timeout for each Vault request
    pub timeout: Duration,
}

impl Config {
    /// Validates `settings`, filling in the default address and timeout.
    ///
    /// Required settings are checked in a fixed order (token file, template,
    /// output) and the first missing one is reported.
    ///
    /// # Errors
    ///
    /// - [`VaultTemplateError::MissingSetting`] if a required path is absent
    /// - [`VaultTemplateError::InvalidEndpoint`] if the address is unusable
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let vault_token_file = required(settings.vault_token_file, "No vault token file given")?;
        let template_file = required(settings.template_file, "No template file given")?;
        let output_file = required(settings.output_file, "No output file given")?;

        let address = settings
            .vault_address
            .filter(|address| !address.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ADDRESS.to_string());
        let vault_address = VaultConfig::new(address.trim(), String::new())?.address;

        let timeout = settings.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(VaultTemplateError::InvalidSetting(
                "Vault timeout must be greater than zero",
            ));
        }

        Ok(Self {
            vault_address,
            vault_token_file,
            template_file,
            output_file,
            timeout,
        })
    }

    /// Builds the Vault connection settings for `token`.
    pub fn vault(&self, token: String) -> VaultConfig {
        VaultConfig {
            address: self.vault_address.clone(),
            token,
            timeout: self.timeout,
        }
    }
}

impl TryFrom<Settings> for Config {
    type Error = VaultTemplateError;

    fn try_from(settings: Settings) -> std::result::Result<Self, Self::Error> {
        Self::from_settings(settings)
    }
}

fn required(value: Option<PathBuf>, message: &'static str) -> Result<PathBuf> {
    value
        .filter(|path| !path.as_os_str().is_empty())
        .ok_or(VaultTemplateError::MissingSetting(message))
}
