//! Error types for schedule resolution.

use thiserror::Error;

/// Result type for schedule operations.
pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// Errors that abort a schedule resolution run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// An event occurrence is missing a field the engine requires.
    #[error("event {event} is missing required field `{field}`")]
    MissingField {
        /// Identifier of the offending event (UID or summary).
        event: String,
        /// Name of the missing field.
        field: &'static str,
    },
}

impl ScheduleError {
    /// Creates a missing field error.
    pub fn missing_field(event: impl Into<String>, field: &'static str) -> Self {
        Self::MissingField {
            event: event.into(),
            field,
        }
    }
}
