//! The module contains the errors the engine can return.
//!
//! - [`Validation`] bad or missing user input, raised before any request.
//! - [`Remote`] the service answered with a non-success status.
//! - [`Network`] the request could not complete.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`Remote`]: EngineError::Remote
//!  [`Network`]: EngineError::Network
use thiserror::Error;

/// Engine custom errors.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("{0}")]
    Validation(String),
    #[error("server answered {status}: {message}")]
    Remote { status: u16, message: String },
    #[error("server unreachable: {0}")]
    Network(String),
    #[error("unexpected response: {0}")]
    InvalidResponse(String),
    #[error("invalid base_url: {0}")]
    InvalidUrl(String),
}

impl EngineError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// HTTP status of a [`EngineError::Remote`] error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for EngineError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::InvalidResponse(err.to_string());
        }
        Self::Network(err.to_string())
    }
}
