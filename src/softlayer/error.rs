//! Error types for the SoftLayer backend.

use crate::backend::{BackendError, ProviderFault};
use crate::config::ConfigError;
use thiserror::Error;

/// Fault code reported when the failure happened before SoftLayer produced a
/// fault of its own (connection refused, unreadable body, and so on).
pub const LOCAL_FAULT_CODE: &str = "0";

/// Errors raised by the SoftLayer backend.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum SoftLayerBackendError {
    /// Raised when the transport configuration is unusable.
    #[error("configuration error: {0}")]
    Config(String),
    /// Raised when a request is missing a required field.
    #[error("invalid instance request: {0}")]
    Validation(String),
    /// Fault returned by the SoftLayer API.
    #[error("{code}: {message}")]
    Fault {
        /// SoftLayer exception class or HTTP status code.
        code: String,
        /// Message accompanying the fault.
        message: String,
    },
    /// Raised when the HTTP exchange itself fails.
    #[error("transport error: {message}")]
    Transport {
        /// Message returned by the HTTP client.
        message: String,
    },
    /// Raised when a successful response cannot be decoded.
    #[error("failed to decode {operation} response: {message}")]
    Decode {
        /// API operation whose response was malformed.
        operation: String,
        /// Decoder error message.
        message: String,
    },
}

impl ProviderFault for SoftLayerBackendError {
    fn fault_code(&self) -> String {
        match self {
            Self::Fault { code, .. } => code.clone(),
            Self::Config(_) | Self::Validation(_) | Self::Transport { .. } | Self::Decode { .. } => {
                LOCAL_FAULT_CODE.to_owned()
            }
        }
    }

    fn fault_string(&self) -> String {
        match self {
            Self::Fault { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for SoftLayerBackendError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport {
            message: value.to_string(),
        }
    }
}

impl From<BackendError> for SoftLayerBackendError {
    fn from(value: BackendError) -> Self {
        match value {
            BackendError::Validation(field) => Self::Validation(field),
        }
    }
}

impl From<ConfigError> for SoftLayerBackendError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value.to_string())
    }
}
