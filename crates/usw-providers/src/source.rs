//! Calendar source definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a calendar source is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// An `http(s)://` URL.
    #[serde(alias = "WEB")]
    Web,
    /// A file on disk.
    #[serde(alias = "LOCAL")]
    Local,
}

impl SourceKind {
    /// Guesses the kind from a path given on the command line.
    pub fn infer(path: &str) -> Self {
        if path.starts_with("http") {
            Self::Web
        } else {
            Self::Local
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Web => write!(f, "web"),
            Self::Local => write!(f, "local"),
        }
    }
}

/// A single iCalendar source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarSource {
    /// How to fetch the source.
    #[serde(rename = "type")]
    pub kind: SourceKind,
    /// URL or file path.
    pub path: String,
}

impl CalendarSource {
    /// Creates a web source.
    pub fn web(url: impl Into<String>) -> Self {
        Self {
            kind: SourceKind::Web,
            path: url.into(),
        }
    }

    /// Creates a local file source.
    pub fn local(path: impl Into<String>) -> Self {
        Self {
            kind: SourceKind::Local,
            path: path.into(),
        }
    }

    /// Creates a source, inferring its kind from the path.
    pub fn infer(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            kind: SourceKind::infer(&path),
            path,
        }
    }
}

impl fmt::Display for CalendarSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.path, self.kind)
    }
}
