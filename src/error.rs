//! Error types for table setup and high-score storage.
//!
//! Setup errors (`TableError`) are fatal: a table with a degenerate shape or
//! an out-of-range setting cannot simulate correctly. Storage errors
//! (`StorageError`) are always recovered where they occur.

use std::fmt;

/// Errors raised while building a table.
#[derive(Debug)]
pub enum TableError {
    /// A static shape has too few distinct vertices or no area.
    DegenerateGeometry {
        /// Label of the shape being built.
        label: String,
        /// Distinct vertices found.
        vertex_count: usize,
    },
    /// A vertex path contains a token that is not a number, or an odd
    /// number of coordinates.
    MalformedPath { label: String, token: String },
    /// A setting is outside the range the simulation supports.
    InvalidSetting {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },
    /// Settings file could not be parsed.
    Config(serde_json::Error),
    /// Settings file could not be read.
    Io(std::io::Error),
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::DegenerateGeometry {
                label,
                vertex_count,
            } => write!(
                f,
                "degenerate geometry '{}': {} distinct vertices, need a polygon with area",
                label, vertex_count
            ),
            TableError::MalformedPath { label, token } => {
                write!(f, "malformed vertex path '{}' at token '{}'", label, token)
            }
            TableError::InvalidSetting {
                name,
                value,
                expected,
            } => write!(f, "setting '{}' = {} must be {}", name, value, expected),
            TableError::Config(e) => write!(f, "invalid settings: {}", e),
            TableError::Io(e) => write!(f, "could not read settings: {}", e),
        }
    }
}

impl std::error::Error for TableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TableError::Config(e) => Some(e),
            TableError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TableError {
    fn from(e: serde_json::Error) -> Self {
        TableError::Config(e)
    }
}

impl From<std::io::Error> for TableError {
    fn from(e: std::io::Error) -> Self {
        TableError::Io(e)
    }
}

/// Convenience alias for setup results.
pub type TableResult<T> = Result<T, TableError>;

/// Errors from a high-score backend.
#[derive(Debug)]
pub enum StorageError {
    /// Backend not reachable (no window, storage disabled, security error).
    Unavailable(String),
    /// Stored value could not be decoded.
    Corrupt(String),
    Io(std::io::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Unavailable(why) => write!(f, "storage unavailable: {}", why),
            StorageError::Corrupt(why) => write!(f, "stored high score is corrupt: {}", why),
            StorageError::Io(e) => write!(f, "storage i/o failed: {}", e),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_offending_shape() {
        let err = TableError::DegenerateGeometry {
            label: "dome".into(),
            vertex_count: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("dome"));
        assert!(msg.contains('2'));
    }

    #[test]
    fn test_config_error_has_source() {
        let parse = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = TableError::from(parse);
        assert!(std::error::Error::source(&err).is_some());
    }
}
