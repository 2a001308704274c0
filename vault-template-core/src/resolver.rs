//! The secret lookup capability consumed by the renderer.

use thiserror::Error;

/// Why a secret lookup failed.
///
/// Resolvers map their backend failures onto these variants so callers can
/// tell a missing secret from an access or transport problem without knowing
/// which store answered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SecretError {
    #[error("secret '{0}' not found")]
    NotFound(String),
    #[error("permission denied reading secret '{0}'")]
    PermissionDenied(String),
    #[error("secret store unreachable: {0}")]
    Unreachable(String),
    #[error("{0}")]
    Backend(String),
}

/// A synchronous, single-shot secret lookup.
///
/// The renderer calls [`query_secret`](SecretResolver::query_secret) once for
/// every lookup a template performs, in execution order, and never retries or
/// caches. Implementations may block on network I/O.
///
/// # Thread Safety
///
/// Resolvers must be `Send + Sync` because the lookup function registered in
/// the template namespace has to be shareable by the template engine.
///
/// # Example
///
/// ```
/// use vault_template_core::{SecretError, SecretResolver};
///
/// struct Fixed;
///
/// impl SecretResolver for Fixed {
///     fn query_secret(&self, path: &str) -> Result<String, SecretError> {
///         match path {
///             "db-password" => Ok("s3cr3t".to_string()),
///             other => Err(SecretError::NotFound(other.to_string())),
///         }
///     }
///
///     fn name(&self) -> &'static str {
///         "fixed"
///     }
/// }
///
/// assert_eq!(Fixed.query_secret("db-password").unwrap(), "s3cr3t");
/// ```
pub trait SecretResolver: Send + Sync {
    /// Resolves `path` to the secret's value.
    ///
    /// The query string is passed through untouched; its structure is entirely
    /// up to the resolver.
    fn query_secret(&self, path: &str) -> Result<String, SecretError>;

    /// Returns the name of this resolver for logging.
    fn name(&self) -> &'static str;
}

impl<F> SecretResolver for F
where
    F: Fn(&str) -> Result<String, SecretError> + Send + Sync,
{
    fn query_secret(&self, path: &str) -> Result<String, SecretError> {
        self(path)
    }

    fn name(&self) -> &'static str {
        "function"
    }
}
