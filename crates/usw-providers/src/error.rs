//! Error types for calendar provider operations.
//!
//! This module defines the errors that can occur while fetching, parsing and
//! expanding calendar sources.

use std::fmt;
use thiserror::Error;

/// The category of a provider error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorCode {
    /// Network error - connection failed, timeout, DNS resolution, etc.
    NetworkError,
    /// Server returned an error (5xx status codes).
    ServerError,
    /// Resource not found (404 or missing local file).
    NotFound,
    /// The source could not be read from disk.
    IoError,
    /// Invalid content - not parseable as iCalendar.
    InvalidResponse,
    /// A recurrence rule uses a feature the expander does not support.
    UnsupportedRecurrence,
}

impl ProviderErrorCode {
    /// Returns a human-readable name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NetworkError => "network_error",
            Self::ServerError => "server_error",
            Self::NotFound => "not_found",
            Self::IoError => "io_error",
            Self::InvalidResponse => "invalid_response",
            Self::UnsupportedRecurrence => "unsupported_recurrence",
        }
    }
}

impl fmt::Display for ProviderErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error that occurred while reading a calendar source.
#[derive(Debug, Error)]
pub struct ProviderError {
    /// The error code categorizing this error.
    code: ProviderErrorCode,
    /// A human-readable message describing the error.
    message: String,
    /// The source that generated this error (URL or path).
    source_path: Option<String>,
    /// The underlying cause of this error, if any.
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ProviderError {
    /// Creates a new provider error with the given code and message.
    pub fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source_path: None,
            source: None,
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::NetworkError, message)
    }

    /// Creates a server error.
    pub fn server(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::ServerError, message)
    }

    /// Creates a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::NotFound, message)
    }

    /// Creates an IO error.
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::IoError, message)
    }

    /// Creates an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::InvalidResponse, message)
    }

    /// Creates an unsupported recurrence error.
    pub fn unsupported_recurrence(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorCode::UnsupportedRecurrence, message)
    }

    /// Sets the calendar source (URL or path) for this error.
    pub fn with_source_path(mut self, path: impl Into<String>) -> Self {
        self.source_path = Some(path.into());
        self
    }

    /// Sets the source error for this error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Returns the error code.
    pub fn code(&self) -> ProviderErrorCode {
        self.code
    }

    /// Returns the calendar source, if set.
    pub fn source_path(&self) -> Option<&str> {
        self.source_path.as_deref()
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref path) = self.source_path {
            write!(f, "[{}] ", path)?;
        }
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// A specialized Result type for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_display() {
        assert_eq!(ProviderErrorCode::IoError.as_str(), "io_error");
        assert_eq!(
            ProviderErrorCode::UnsupportedRecurrence.to_string(),
            "unsupported_recurrence"
        );
    }

    #[test]
    fn provider_error_with_source_path() {
        let err = ProviderError::not_found("no such file").with_source_path("/tmp/cal.ics");
        assert_eq!(err.code(), ProviderErrorCode::NotFound);
        assert_eq!(err.source_path(), Some("/tmp/cal.ics"));
        assert_eq!(err.to_string(), "[/tmp/cal.ics] not_found: no such file");
    }

    #[test]
    fn provider_error_with_source() {
        use std::error::Error;
        let io_err = std::io::Error::other("disk full");
        let err = ProviderError::io("failed to read").with_source(io_err);
        assert!(err.source().is_some());
        assert_eq!(err.code(), ProviderErrorCode::IoError);
    }
}
