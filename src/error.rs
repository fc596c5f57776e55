//! Error types for autoalt library.
//!
//! The filter itself never fails. These errors only come out of loading
//! rule sets and media libraries.

use std::io;
use thiserror::Error;

/// Result type alias for autoalt operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while loading configuration or media data.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed JSON input.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A block rule is unusable (empty type name, empty key, ...).
    #[error("Invalid block rule: {0}")]
    InvalidRule(String),

    /// A media library record is unusable.
    #[error("Invalid media record: {0}")]
    InvalidMedia(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidRule("empty type name".into());
        assert_eq!(err.to_string(), "Invalid block rule: empty type name");

        let err = Error::InvalidMedia("id must be positive".into());
        assert_eq!(err.to_string(), "Invalid media record: id must be positive");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
