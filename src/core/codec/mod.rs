//! # Codec Module
//!
//! The narrow image capability the canonicalizer depends on:
//! decode bytes to pixels plus an orientation, and encode pixels to JPEG.
//!
//! ## Default Implementation
//! [`StandardCodec`] decodes JPEG with `zune-jpeg`, other formats with the
//! `image` crate, reads the orientation from the EXIF directory of the same
//! bytes, and encodes with the `image` crate's baseline JPEG encoder, which
//! writes no EXIF segment.
//!
//! Any other library can be substituted by implementing [`ImageCodec`].

mod decode;
mod orientation;
mod source;

pub use decode::{decode_pixels, SourceFormat};
pub use orientation::Orientation;
pub use source::{read_file_bytes, FileBytes};

use crate::core::metadata::{MetadataTag, TagDirectory};
use crate::error::DecodeError;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbImage};
use std::path::Path;

/// Decoded pixels together with the orientation the file asked for
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Pixels as stored in the file, not yet orientation-corrected
    pub pixels: DynamicImage,
    /// Orientation read from the file's tags (`Normal` when absent)
    pub orientation: Orientation,
}

impl DecodedImage {
    /// Apply the orientation and drop it, yielding upright pixels
    pub fn into_upright(self) -> DynamicImage {
        self.orientation.apply(self.pixels)
    }
}

/// Image decoding and encoding capability
pub trait ImageCodec: Send + Sync {
    /// Decode raw file bytes. `path` is only used for error context.
    fn decode(&self, bytes: &[u8], path: &Path) -> Result<DecodedImage, DecodeError>;

    /// Encode RGB pixels as a JPEG at the given quality (1-100).
    ///
    /// Must be deterministic: identical pixels and quality give identical bytes.
    fn encode_jpeg(&self, pixels: &RgbImage, quality: u8) -> Result<Vec<u8>, DecodeError>;
}

/// Default codec built on zune-jpeg, the image crate and kamadak-exif
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardCodec;

impl StandardCodec {
    /// Read the orientation tag from container bytes.
    ///
    /// A missing directory, missing tag or out-of-range code all mean `Normal`.
    pub fn read_orientation(bytes: &[u8]) -> Orientation {
        TagDirectory::from_bytes(bytes)
            .and_then(|dir| dir.unsigned(MetadataTag::Orientation))
            .and_then(Orientation::from_exif)
            .unwrap_or_default()
    }
}

impl ImageCodec for StandardCodec {
    fn decode(&self, bytes: &[u8], path: &Path) -> Result<DecodedImage, DecodeError> {
        let pixels = decode_pixels(bytes, path)?;
        let orientation = Self::read_orientation(bytes);
        Ok(DecodedImage {
            pixels,
            orientation,
        })
    }

    fn encode_jpeg(&self, pixels: &RgbImage, quality: u8) -> Result<Vec<u8>, DecodeError> {
        let mut out = Vec::new();
        JpegEncoder::new_with_quality(&mut out, quality)
            .write_image(
                pixels.as_raw(),
                pixels.width(),
                pixels.height(),
                ExtendedColorType::Rgb8,
            )
            .map_err(|e| DecodeError::Encode {
                reason: e.to_string(),
            })?;
        Ok(out)
    }
}
