//! # Error Module
//!
//! Error types for the import core.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, file names, what went wrong
//! - **Fail per file** - a `DecodeError` is fatal for one file, never for a batch
//! - **Silent metadata** - tag extraction degrades field by field and has no error type

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Invalid identifier: {0}")]
    Identifier(#[from] IdentifierError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors raised while turning a file into a canonical preview.
///
/// Raised only by the codec and the canonicalizer. There is no fallback
/// value: the caller records the failure for that file and moves on.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Failed to read image file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported or unrecognised image format: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("Failed to decode image {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("Image is empty or corrupted: {path}")]
    EmptyImage { path: PathBuf },

    #[error("Invalid preview dimension: {value} (must be at least 1)")]
    InvalidDimension { value: u32 },

    #[error("Failed to resize image {path}: {reason}")]
    Resize { path: PathBuf, reason: String },

    #[error("Failed to encode preview: {reason}")]
    Encode { reason: String },
}

/// Errors reported by a backend client implementation
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Backend rejected record {hothash}: {reason}")]
    Rejected { hothash: String, reason: String },

    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

/// Errors from parsing a content identifier
#[derive(Error, Debug, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("Expected 64 hex characters, got {length}")]
    InvalidLength { length: usize },

    #[error("Identifier must be lowercase hex, found {found:?}")]
    InvalidCharacter { found: char },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_includes_path() {
        let error = DecodeError::Decode {
            path: PathBuf::from("/photos/broken.jpg"),
            reason: "invalid JPEG".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("/photos/broken.jpg"));
        assert!(message.contains("invalid JPEG"));
    }

    #[test]
    fn decode_error_converts_to_import_error() {
        let error: ImportError = DecodeError::EmptyImage {
            path: PathBuf::from("/photos/empty.png"),
        }
        .into();
        assert!(matches!(error, ImportError::Decode(_)));
        assert!(error.to_string().contains("/photos/empty.png"));
    }

    #[test]
    fn identifier_error_reports_length() {
        let error = IdentifierError::InvalidLength { length: 12 };
        assert!(error.to_string().contains("12"));
    }
}
