//! Service error types

use catalog_client::ClientError;
use thiserror::Error;

/// Service-level error
///
/// Configuration problems surface as [`super::ConfigError`] before any of
/// the service is built.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("catalog client error: {0}")]
    Client(#[from] ClientError),
}

pub type SyncResult<T> = Result<T, SyncError>;
