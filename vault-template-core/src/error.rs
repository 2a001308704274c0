//! Error types for template rendering

use crate::resolver::SecretError;
use thiserror::Error;

/// A template was rejected before anything was executed.
///
/// No secret has been looked up when this error is returned, so it is always
/// safe to report.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("{0}")]
    Syntax(#[source] minijinja::Error),
    #[error("unknown function or variable '{0}'")]
    UndefinedName(String),
}

/// The error returned by a render call.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to parse template: {0}")]
    Parse(#[from] ParseError),
    /// A call made while executing the template failed. Lookups that ran
    /// before the failing call have already reached the secret store.
    #[error("failed to execute template: {0}")]
    Execution(#[source] minijinja::Error),
}

impl RenderError {
    /// Returns `true` if the template was rejected before execution started.
    pub fn is_parse(&self) -> bool {
        matches!(self, RenderError::Parse(_))
    }

    /// Returns `true` if execution started and was halted by a failing call.
    pub fn is_execution(&self) -> bool {
        matches!(self, RenderError::Execution(_))
    }

    /// Returns the secret lookup failure that halted execution, if that is
    /// what happened.
    pub fn secret_error(&self) -> Option<&SecretError> {
        let mut source = std::error::Error::source(self);
        while let Some(err) = source {
            if let Some(secret_err) = err.downcast_ref::<SecretError>() {
                return Some(secret_err);
            }
            source = err.source();
        }
        None
    }
}
