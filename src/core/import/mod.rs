//! # Import Module
//!
//! Drives canonicalization and metadata extraction over the files of an
//! import and hands the results to a backend.
//!
//! ## Flow
//! 1. The caller (a directory scanner, a file picker) supplies paths
//! 2. Each file gets a hot preview (its identity), optionally a cold preview,
//!    and both metadata tiers
//! 3. Records are keyed by hothash and forwarded to a [`BackendClient`]
//!
//! Files are processed in parallel with rayon. One bad file never aborts a
//! batch; it is reported as an [`ImportFailure`] and the rest carry on.

mod backend;
mod processor;

pub use backend::{BackendClient, BackendFailure};
pub use processor::{BatchResult, CancellationToken, ImportProcessor};

use crate::core::metadata::PhotoMetadata;
use crate::core::preview::{
    CanonicalPreview, Hothash, COLD_PREVIEW_DIMENSION, HOT_PREVIEW_DIMENSION, JPEG_QUALITY,
};
use crate::error::DecodeError;
use std::path::PathBuf;
use thiserror::Error;

/// Everything produced for one imported file
#[derive(Debug, Clone)]
pub struct ImportRecord {
    /// Source file
    pub path: PathBuf,
    /// Source file size in bytes
    pub file_size: u64,
    /// Identity of the photo: the hash of `hotpreview`
    pub hothash: Hothash,
    pub hotpreview: CanonicalPreview,
    /// Display preview, when enabled
    pub coldpreview: Option<CanonicalPreview>,
    pub metadata: PhotoMetadata,
}

/// A file that could not be imported
#[derive(Error, Debug)]
#[error("Failed to import {}: {error}", .path.display())]
pub struct ImportFailure {
    pub path: PathBuf,
    #[source]
    pub error: DecodeError,
}

/// Configuration builder for import processors
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Longer-edge bound of the identity preview
    pub hot_dimension: u32,
    /// Longer-edge bound of the display preview
    pub cold_dimension: u32,
    /// Whether to render the display preview at all
    pub coldpreview: bool,
    /// JPEG quality for both previews
    pub quality: u8,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            hot_dimension: HOT_PREVIEW_DIMENSION,
            cold_dimension: COLD_PREVIEW_DIMENSION,
            coldpreview: true,
            quality: JPEG_QUALITY,
        }
    }
}

impl ImportConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the identity preview bound
    pub fn hot_dimension(mut self, dimension: u32) -> Self {
        self.hot_dimension = dimension;
        self
    }

    /// Set the display preview bound
    pub fn cold_dimension(mut self, dimension: u32) -> Self {
        self.cold_dimension = dimension;
        self
    }

    /// Enable or disable the display preview
    pub fn with_coldpreview(mut self, enabled: bool) -> Self {
        self.coldpreview = enabled;
        self
    }

    /// Set the JPEG quality
    pub fn quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    /// Build the processor
    pub fn build(self) -> ImportProcessor {
        ImportProcessor::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = ImportConfig::new();
        assert_eq!(config.hot_dimension, 150);
        assert_eq!(config.cold_dimension, 1200);
        assert!(config.coldpreview);
        assert_eq!(config.quality, 85);
    }

    #[test]
    fn config_builder_works() {
        let config = ImportConfig::new()
            .hot_dimension(200)
            .cold_dimension(800)
            .with_coldpreview(false)
            .quality(90);

        assert_eq!(config.hot_dimension, 200);
        assert_eq!(config.cold_dimension, 800);
        assert!(!config.coldpreview);
        assert_eq!(config.quality, 90);
    }

    #[test]
    fn failure_message_names_file() {
        let failure = ImportFailure {
            path: PathBuf::from("/photos/bad.jpg"),
            error: DecodeError::UnsupportedFormat {
                path: PathBuf::from("/photos/bad.jpg"),
            },
        };
        assert!(failure.to_string().starts_with("Failed to import /photos/bad.jpg"));
    }
}
