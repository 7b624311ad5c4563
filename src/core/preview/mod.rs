//! # Preview Module
//!
//! Turns an image file into a canonical JPEG preview and its content
//! identifier (the hothash).
//!
//! ## How It Works
//! 1. Decode the file and read its orientation tag
//! 2. Rotate/flip to upright; the output carries no tags at all
//! 3. Downscale so the longer edge is at most `max_dimension` (Lanczos3)
//! 4. Encode a baseline JPEG at a fixed quality
//! 5. SHA-256 the exact encoded bytes
//!
//! The same file and dimension always produce identical bytes, so the hash
//! identifies the photo's visual content independently of its tags, file
//! name or modification time. Different dimensions give unrelated hashes.
//!
//! ## Identifier Stability
//! The hash covers re-encoded JPEG bytes, not decoded pixels. Changing the
//! encoder, its quality or chroma subsampling, the resize filter, or running
//! on a CPU whose SIMD kernels round differently can change every future
//! identifier. Pin the dependency versions of any deployment that persists
//! hothashes.
//!
//! ## Example
//! ```rust,ignore
//! use photo_import_core::core::preview::{CanonicalizerConfig, HOT_PREVIEW_DIMENSION};
//!
//! let canonicalizer = CanonicalizerConfig::new().quality(85).build();
//! let (preview, hothash) = canonicalizer.canonicalize(&path, HOT_PREVIEW_DIMENSION)?;
//! ```

mod hothash;
mod resize;

pub use hothash::{Hothash, HOTHASH_LEN};
pub use resize::{fit_within, PreviewResizer};

use crate::core::codec::{read_file_bytes, ImageCodec, StandardCodec};
use crate::error::DecodeError;
use std::path::Path;
use std::sync::Arc;

/// Longer-edge bound of the small thumbnail that defines a photo's identity
pub const HOT_PREVIEW_DIMENSION: u32 = 150;

/// Longer-edge bound of the larger display preview
pub const COLD_PREVIEW_DIMENSION: u32 = 1200;

/// Default JPEG quality for previews
pub const JPEG_QUALITY: u8 = 85;

/// An encoded, upright, tag-free JPEG preview.
///
/// Immutable; clones share the same bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalPreview {
    bytes: Arc<[u8]>,
    width: u32,
    height: u32,
}

impl CanonicalPreview {
    pub fn new(bytes: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            bytes: bytes.into(),
            width,
            height,
        }
    }

    /// Encoded JPEG bytes
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Encoded size in bytes
    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }

    /// Identifier of these bytes
    pub fn hothash(&self) -> Hothash {
        Hothash::of(&self.bytes)
    }
}

/// Configuration builder for canonicalizers
#[derive(Debug, Clone)]
pub struct CanonicalizerConfig {
    /// JPEG quality (1-100)
    quality: u8,
}

impl CanonicalizerConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self {
            quality: JPEG_QUALITY,
        }
    }

    /// Set the JPEG quality, clamped to 1-100.
    ///
    /// Every quality yields a different identifier space.
    pub fn quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, 100);
        self
    }

    /// Build a canonicalizer with the standard codec
    pub fn build(self) -> Canonicalizer {
        Canonicalizer::with_codec(StandardCodec, self)
    }
}

impl Default for CanonicalizerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Produces canonical previews and their hothashes.
///
/// Stateless apart from configuration; safe to share across threads.
#[derive(Debug, Clone)]
pub struct Canonicalizer<C: ImageCodec = StandardCodec> {
    codec: C,
    config: CanonicalizerConfig,
}

impl Canonicalizer<StandardCodec> {
    /// Canonicalizer with the standard codec and default quality
    pub fn new() -> Self {
        CanonicalizerConfig::new().build()
    }
}

impl Default for Canonicalizer<StandardCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: ImageCodec> Canonicalizer<C> {
    /// Canonicalizer over any codec implementation
    pub fn with_codec(codec: C, config: CanonicalizerConfig) -> Self {
        Self { codec, config }
    }

    pub fn quality(&self) -> u8 {
        self.config.quality
    }

    /// Canonical preview and hothash of a file.
    pub fn canonicalize(
        &self,
        path: &Path,
        max_dimension: u32,
    ) -> Result<(CanonicalPreview, Hothash), DecodeError> {
        check_dimension(max_dimension)?;
        let bytes = read_file_bytes(path)?;
        self.canonicalize_bytes(&bytes, path, max_dimension)
    }

    /// Canonical preview and hothash of in-memory file bytes.
    ///
    /// `path` only provides error context.
    pub fn canonicalize_bytes(
        &self,
        bytes: &[u8],
        path: &Path,
        max_dimension: u32,
    ) -> Result<(CanonicalPreview, Hothash), DecodeError> {
        let mut previews = self.render(bytes, path, &[max_dimension])?;
        previews.pop().ok_or(DecodeError::InvalidDimension {
            value: max_dimension,
        })
    }

    /// Several previews of one file from a single decode.
    ///
    /// Each dimension is resized from the full upright image, so the result for
    /// one dimension is identical to a separate [`canonicalize`](Self::canonicalize)
    /// call with that dimension.
    pub fn canonicalize_many(
        &self,
        path: &Path,
        dimensions: &[u32],
    ) -> Result<Vec<(CanonicalPreview, Hothash)>, DecodeError> {
        for dimension in dimensions {
            check_dimension(*dimension)?;
        }
        let bytes = read_file_bytes(path)?;
        self.render(&bytes, path, dimensions)
    }

    /// The 150px identity preview
    pub fn hotpreview(&self, path: &Path) -> Result<(CanonicalPreview, Hothash), DecodeError> {
        self.canonicalize(path, HOT_PREVIEW_DIMENSION)
    }

    /// The 1200px display preview
    pub fn coldpreview(&self, path: &Path) -> Result<(CanonicalPreview, Hothash), DecodeError> {
        self.canonicalize(path, COLD_PREVIEW_DIMENSION)
    }

    fn render(
        &self,
        bytes: &[u8],
        path: &Path,
        dimensions: &[u32],
    ) -> Result<Vec<(CanonicalPreview, Hothash)>, DecodeError> {
        for dimension in dimensions {
            check_dimension(*dimension)?;
        }

        let decoded = self.codec.decode(bytes, path)?;
        let orientation = decoded.orientation;
        let upright = decoded.into_upright().into_rgb8();

        tracing::debug!(
            path = %path.display(),
            width = upright.width(),
            height = upright.height(),
            ?orientation,
            "decoded source image"
        );

        let mut resizer = PreviewResizer::new();
        let mut previews = Vec::with_capacity(dimensions.len());

        for &max_dimension in dimensions {
            let (width, height) = fit_within(upright.width(), upright.height(), max_dimension);
            let pixels = if (width, height) == upright.dimensions() {
                None
            } else {
                Some(resizer.resize(&upright, width, height, path)?)
            };

            let encoded = self
                .codec
                .encode_jpeg(pixels.as_ref().unwrap_or(&upright), self.config.quality)?;
            let hothash = Hothash::of(&encoded);
            previews.push((CanonicalPreview::new(encoded, width, height), hothash));
        }

        Ok(previews)
    }
}

fn check_dimension(max_dimension: u32) -> Result<(), DecodeError> {
    if max_dimension == 0 {
        return Err(DecodeError::InvalidDimension {
            value: max_dimension,
        });
    }
    Ok(())
}
