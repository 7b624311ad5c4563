//! # Metadata Module
//!
//! Best-effort extraction of EXIF metadata from photo files.
//!
//! ## Tiers
//! - **Core**: capture time, GPS position, camera make/model, pixel dimensions
//! - **Camera settings**: ISO, aperture, shutter, focal length, lens, flash,
//!   exposure program/mode/compensation, metering, white balance
//!
//! Extraction never fails. A file with no tag directory, or a directory with
//! malformed entries, yields a record whose affected fields are `None`.
//!
//! ## Supported Formats
//! Any container kamadak-exif reads (JPEG, TIFF, PNG, WebP, HEIF). Pixel
//! dimensions come from the image header, never from tags.

mod gps;
mod settings;
mod tags;
mod timestamp;

pub use gps::{decode_coordinate, dms_to_decimal, resolve_altitude, resolve_position, validate_pair, Axis};
pub use settings::{
    format_shutter_speed, CameraSettings, ColorSpace, ExposureMode, ExposureProgram, FlashState,
    MeteringMode, WhiteBalance,
};
pub use tags::{MetadataTag, TagDirectory};
pub use timestamp::{
    normalize_timestamp, parse_timestamp, resolve_captured_at, resolve_timestamp,
    TIMESTAMP_CANDIDATES,
};

#[cfg(test)]
pub(crate) use tags::test_support;

use image::ImageReader;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::Path;

/// Core metadata: when, where and with what a photo was taken
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoreMetadata {
    /// Capture time as `YYYY-MM-DDTHH:MM:SS`, no zone
    pub captured_at: Option<String>,
    /// Decimal degrees, present only together with `longitude`
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Metres above sea level; negative below
    pub altitude: Option<f64>,
    /// Camera make (e.g., "Apple", "Canon")
    pub camera_make: Option<String>,
    /// Camera model (e.g., "iPhone 15 Pro")
    pub camera_model: Option<String>,
    /// Image width in pixels, as stored (before orientation)
    pub width: Option<u32>,
    /// Image height in pixels, as stored (before orientation)
    pub height: Option<u32>,
}

impl CoreMetadata {
    /// Core fields held by a tag directory. Dimensions are left unset.
    pub fn from_directory(directory: &TagDirectory) -> Self {
        let position = resolve_position(directory);
        Self {
            captured_at: resolve_captured_at(directory),
            latitude: position.map(|(lat, _)| lat),
            longitude: position.map(|(_, lon)| lon),
            altitude: position.and_then(|_| resolve_altitude(directory)),
            camera_make: directory.ascii(MetadataTag::Make),
            camera_model: directory.ascii(MetadataTag::Model),
            width: None,
            height: None,
        }
    }

    /// Check if any metadata was extracted
    pub fn has_data(&self) -> bool {
        *self != Self::default()
    }

    /// Latitude/longitude pair when present
    pub fn position(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    /// Get a display string for the camera
    pub fn camera_display(&self) -> Option<String> {
        match (&self.camera_make, &self.camera_model) {
            (Some(make), Some(model)) => {
                // Avoid duplication like "Apple Apple iPhone"
                if model.starts_with(make.as_str()) {
                    Some(model.clone())
                } else {
                    Some(format!("{} {}", make, model))
                }
            }
            (None, Some(model)) => Some(model.clone()),
            (Some(make), None) => Some(make.clone()),
            (None, None) => None,
        }
    }

    /// Get dimensions as a formatted string
    pub fn dimensions_display(&self) -> Option<String> {
        match (self.width, self.height) {
            (Some(w), Some(h)) => Some(format!("{}x{}", w, h)),
            _ => None,
        }
    }

    /// Calculate megapixels
    pub fn megapixels(&self) -> Option<f64> {
        match (self.width, self.height) {
            (Some(w), Some(h)) => Some((w as f64 * h as f64) / 1_000_000.0),
            _ => None,
        }
    }
}

/// Both metadata tiers from one pass over a file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhotoMetadata {
    pub core: CoreMetadata,
    pub settings: CameraSettings,
}

impl PhotoMetadata {
    /// Both tiers from an already parsed directory
    pub fn from_directory(directory: &TagDirectory) -> Self {
        Self {
            core: CoreMetadata::from_directory(directory),
            settings: CameraSettings::from_directory(directory),
        }
    }

    pub fn has_data(&self) -> bool {
        self.core.has_data() || self.settings.has_data()
    }
}

/// Reads the tag directory once and fills both metadata tiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataExtractor;

impl MetadataExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract everything available from a file on disk.
    pub fn extract(&self, path: &Path) -> PhotoMetadata {
        let mut metadata = match TagDirectory::from_path(path) {
            Some(directory) => PhotoMetadata::from_directory(&directory),
            None => PhotoMetadata::default(),
        };

        if let Some((width, height)) = header_dimensions(path) {
            metadata.core.width = Some(width);
            metadata.core.height = Some(height);
        }

        tracing::debug!(
            path = %path.display(),
            captured_at = ?metadata.core.captured_at,
            has_gps = metadata.core.position().is_some(),
            "extracted metadata"
        );
        metadata
    }

    /// Extract everything available from in-memory container bytes.
    pub fn extract_bytes(&self, bytes: &[u8]) -> PhotoMetadata {
        let mut metadata = match TagDirectory::from_bytes(bytes) {
            Some(directory) => PhotoMetadata::from_directory(&directory),
            None => PhotoMetadata::default(),
        };

        let dimensions = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .ok()
            .and_then(|reader| reader.into_dimensions().ok());
        if let Some((width, height)) = dimensions {
            metadata.core.width = Some(width);
            metadata.core.height = Some(height);
        }
        metadata
    }
}

/// Core metadata of a file. Never fails.
pub fn extract_core(path: &Path) -> CoreMetadata {
    MetadataExtractor.extract(path).core
}

/// Camera settings of a file. Never fails.
pub fn extract_camera_settings(path: &Path) -> CameraSettings {
    MetadataExtractor.extract(path).settings
}

/// Pixel dimensions from the image header, without decoding pixels
fn header_dimensions(path: &Path) -> Option<(u32, u32)> {
    ImageReader::open(path)
        .ok()?
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}
