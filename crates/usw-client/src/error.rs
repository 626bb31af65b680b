//! Client error types.

use thiserror::Error;
use usw_core::ScheduleError;
use usw_providers::ProviderError;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that abort a `usw` run.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A calendar source could not be fetched or parsed.
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Today's events are unusable.
    #[error("schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    /// `--time` does not name a valid local time.
    #[error("invalid time: {0}")]
    InvalidTime(String),

    /// JSON output could not be produced.
    #[error("failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
}
