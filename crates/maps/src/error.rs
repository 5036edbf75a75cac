//! Error and diagnostic types for the maps crate

use mapdef_core::CoreError;
use serde::Serialize;
use std::fmt;

/// Errors that abort a map load
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// The map file does not exist
    #[error("Map not found: {0}")]
    NotFound(String),

    /// File I/O error
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed map content; no partial map is returned
    #[error("{file}:{line}: {message}")]
    Format {
        file: String,
        line: usize,
        message: String,
    },
}

impl MapError {
    /// True for errors caused by the map's content rather than its absence
    pub fn is_format(&self) -> bool {
        matches!(self, MapError::Format { .. })
    }
}

impl From<MapError> for CoreError {
    fn from(err: MapError) -> Self {
        match err {
            MapError::NotFound(path) => CoreError::NotFound(path),
            MapError::Io(e) => CoreError::Io(e),
            other => CoreError::InvalidData(other.to_string()),
        }
    }
}

/// Result type for map operations
pub type Result<T> = std::result::Result<T, MapError>;

/// How serious a non-fatal load diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    /// The loader fixed up the map to restore an invariant
    Repair,
    /// Something was ignored; the map is unaffected
    Advisory,
}

/// A non-fatal problem found while loading a map
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub file: String,
    /// 1-based line, or 0 for problems with the file as a whole
    pub line: usize,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Repair => "repair",
            Severity::Advisory => "warning",
        };
        if self.line == 0 {
            write!(f, "{}: {}: {}", self.file, tag, self.message)
        } else {
            write!(f, "{}:{}: {}: {}", self.file, self.line, tag, self.message)
        }
    }
}
