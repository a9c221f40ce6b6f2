//! Client error types

use reqwest::StatusCode;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status from the remote API
    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// Payload does not have the expected shape
    #[error("Unexpected payload: {0}")]
    DataShape(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Client could not be constructed
    #[error("Client setup error: {0}")]
    Setup(String),
}

impl ClientError {
    /// Network or HTTP-level failure
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Http(_) | ClientError::Status { .. })
    }

    /// Response arrived but could not be interpreted
    pub fn is_data_shape(&self) -> bool {
        matches!(self, ClientError::DataShape(_) | ClientError::Serialization(_))
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            ClientError::Http(e) => e.status(),
            _ => None,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
