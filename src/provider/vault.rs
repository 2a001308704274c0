use crate::{Result, VaultTemplateError};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use std::time::Duration;
use url::Url;
use vault_template_core::{SecretError, SecretResolver};

/// Vault address used when none is configured.
pub const DEFAULT_ADDRESS: &str = "https://127.0.0.1:8200";

/// Default timeout for a single Vault request (30 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Field read from a secret when the query does not name one.
pub const DEFAULT_FIELD: &str = "value";

/// User agent sent with every Vault request
pub const USER_AGENT: &str = concat!("vault-template/", env!("CARGO_PKG_VERSION"));

const TOKEN_HEADER: &str = "X-Vault-Token";

/// Connection settings for a Vault server.
///
/// The token is never printed: the `Debug` output redacts it.
#[derive(Clone)]
pub struct VaultConfig {
    /// Base address of the Vault server, e.g. `https://vault.internal:8200`
    pub address: Url,
    /// Token sent as `X-Vault-Token`
    pub token: String,
    /// Timeout applied to every request
    pub timeout: Duration,
}

impl fmt::Debug for VaultConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultConfig")
            .field("address", &self.address.as_str())
            .field("token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl VaultConfig {
    /// Creates a configuration from an address string such as
    /// `https://127.0.0.1:8200`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultTemplateError::InvalidEndpoint`] if the address does not
    /// parse or is not an `http`/`https` URL.
    pub fn new(address: &str, token: impl Into<String>) -> Result<Self> {
        let url = Url::parse(address).map_err(|e| VaultTemplateError::InvalidEndpoint {
            endpoint: address.to_string(),
            reason: e.to_string(),
        })?;
        let mut config = Self::try_from(&url)?;
        config.token = token.into();
        Ok(config)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the API URL for a secret path: `{address}/v1/{path}`.
    fn secret_url(&self, path: &str) -> std::result::Result<Url, SecretError> {
        let mut url = self.address.clone();
        url.path_segments_mut()
            .map_err(|_| SecretError::Backend(format!("cannot build a URL for '{}'", path)))?
            .pop_if_empty()
            .push("v1")
            .extend(path.split('/').filter(|segment| !segment.is_empty()));
        Ok(url)
    }
}

impl TryFrom<&Url> for VaultConfig {
    type Error = VaultTemplateError;

    /// Validates that `url` can address a Vault server. The token is left
    /// empty and the timeout at [`DEFAULT_TIMEOUT`].
    fn try_from(url: &Url) -> std::result::Result<Self, Self::Error> {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(VaultTemplateError::InvalidEndpoint {
                endpoint: url.to_string(),
                reason: format!("unsupported scheme '{}', expected http or https", url.scheme()),
            });
        }
        if url.cannot_be_a_base() || url.host().is_none() {
            return Err(VaultTemplateError::InvalidEndpoint {
                endpoint: url.to_string(),
                reason: "address must include a host".to_string(),
            });
        }

        Ok(Self {
            address: url.clone(),
            token: String::new(),
            timeout: DEFAULT_TIMEOUT,
        })
    }
}

#[derive(Debug, Deserialize)]
struct SecretResponse {
    data: Option<Map<String, Value>>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    errors: Vec<String>,
}

/// Resolves secrets by reading them from Vault's HTTP API.
///
/// A query is a secret path, optionally followed by `#field`:
///
/// ```text
/// secret/data/db#password   -> field "password" of secret/data/db
/// secret/legacy/api         -> field "value" of secret/legacy/api
/// ```
///
/// Both KV version 2 (`data.data.<field>`) and version 1 (`data.<field>`)
/// response layouts are understood. String fields are returned as-is, other
/// JSON values as their JSON text.
///
/// Every query is exactly one `GET` request; nothing is cached or retried.
pub struct VaultProvider {
    config: VaultConfig,
    client: Client,
}

impl VaultProvider {
    pub const PROVIDER_NAME: &'static str = "vault";

    /// Creates a provider with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`VaultTemplateError::Client`] if the HTTP client cannot be
    /// built (for example when no TLS backend is usable).
    pub fn new(config: VaultConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    fn read_field(&self, path: &str, field: &str) -> std::result::Result<String, SecretError> {
        let url = self.config.secret_url(path)?;
        tracing::debug!(path, field, "reading secret from vault");

        let response = self
            .client
            .get(url)
            .header(TOKEN_HEADER, &self.config.token)
            .send()
            .map_err(|e| SecretError::Unreachable(e.to_string()))?;

        let status = response.status();
        match status {
            StatusCode::NOT_FOUND => return Err(SecretError::NotFound(path.to_string())),
            StatusCode::FORBIDDEN => return Err(SecretError::PermissionDenied(path.to_string())),
            status if !status.is_success() => {
                let body: ErrorResponse = response.json().unwrap_or_default();
                let detail = if body.errors.is_empty() {
                    String::new()
                } else {
                    format!(": {}", body.errors.join("; "))
                };
                return Err(SecretError::Backend(format!(
                    "vault returned {} for '{}'{}",
                    status, path, detail
                )));
            }
            _ => {}
        }

        let body: SecretResponse = response.json().map_err(|e| {
            SecretError::Backend(format!("invalid response from vault for '{}': {}", path, e))
        })?;

        body.data
            .as_ref()
            .and_then(|data| extract_field(data, field))
            .ok_or_else(|| SecretError::NotFound(format!("{}#{}", path, field)))
    }
}

impl SecretResolver for VaultProvider {
    fn query_secret(&self, query: &str) -> std::result::Result<String, SecretError> {
        let (path, field) = split_query(query);
        self.read_field(path, field)
    }

    fn name(&self) -> &'static str {
        Self::PROVIDER_NAME
    }
}

/// Splits `path#field` into its parts, defaulting the field to
/// [`DEFAULT_FIELD`].
pub(crate) fn split_query(query: &str) -> (&str, &str) {
    match query.rsplit_once('#') {
        Some((path, field)) if !field.is_empty() => (path, field),
        Some((path, _)) => (path, DEFAULT_FIELD),
        None => (query, DEFAULT_FIELD),
    }
}

fn extract_field(data: &Map<String, Value>, field: &str) -> Option<String> {
    let kv2 = data
        .get("data")
        .and_then(Value::as_object)
        .and_then(|inner| inner.get(field));

    match kv2.or_else(|| data.get(field))? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
