//! Pixel decoding with format-specific fast paths.
//!
//! JPEG goes through zune-jpeg (1.5-2x faster than the image crate). zune pads
//! a missing entropy stream with grey even in strict mode, so the marker
//! structure is walked first and a stream that ends before its EOI marker is
//! rejected. Everything else goes through the image crate.

use crate::error::DecodeError;
use image::{DynamicImage, ImageBuffer, Luma, Rgb, Rgba};
use std::path::Path;
use zune_core::colorspace::ColorSpace;
use zune_core::options::DecoderOptions;
use zune_jpeg::JpegDecoder;

/// Source formats recognised from magic bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Jpeg,
    Png,
    Gif,
    WebP,
    Heic,
    Bmp,
    Tiff,
}

impl SourceFormat {
    /// Identify the format from the leading bytes of a file.
    ///
    /// Much cheaper than attempting a full decode, and independent of the
    /// file extension, which is often wrong for camera exports.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < 8 {
            return None;
        }

        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }
        if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }
        if bytes.starts_with(b"GIF8") {
            return Some(Self::Gif);
        }
        if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
            return Some(Self::WebP);
        }
        if bytes.len() >= 12 && &bytes[4..8] == b"ftyp" {
            let brand = &bytes[8..12];
            if brand == b"heic" || brand == b"heix" || brand == b"mif1" || brand == b"hevc" {
                return Some(Self::Heic);
            }
        }
        if bytes.starts_with(b"BM") {
            return Some(Self::Bmp);
        }
        if bytes.starts_with(&[0x49, 0x49, 0x2A, 0x00]) || bytes.starts_with(&[0x4D, 0x4D, 0x00, 0x2A])
        {
            return Some(Self::Tiff);
        }

        None
    }
}

/// Decode file bytes into pixels using the fastest decoder for the format.
pub fn decode_pixels(bytes: &[u8], path: &Path) -> Result<DynamicImage, DecodeError> {
    let image = match SourceFormat::sniff(bytes) {
        Some(SourceFormat::Jpeg) => decode_jpeg(bytes, path)?,
        Some(SourceFormat::Heic) => {
            return Err(DecodeError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
        Some(_) => decode_fallback(bytes, path)?,
        None => {
            return Err(DecodeError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
        }
    };

    if image.width() == 0 || image.height() == 0 {
        return Err(DecodeError::EmptyImage {
            path: path.to_path_buf(),
        });
    }

    Ok(image)
}

/// Fast JPEG decoding using zune-jpeg
fn decode_jpeg(bytes: &[u8], path: &Path) -> Result<DynamicImage, DecodeError> {
    let decode_error = |reason: String| DecodeError::Decode {
        path: path.to_path_buf(),
        reason,
    };

    if !has_end_of_image(bytes) {
        return Err(decode_error("truncated JPEG".to_string()));
    }

    let options = DecoderOptions::default()
        .set_strict_mode(true)
        .jpeg_set_out_colorspace(ColorSpace::RGB);
    let mut decoder = JpegDecoder::new_with_options(bytes, options);

    let pixels = decoder
        .decode()
        .map_err(|e| decode_error(format!("zune-jpeg decode failed: {:?}", e)))?;

    let info = decoder
        .info()
        .ok_or_else(|| decode_error("Failed to get image info".to_string()))?;

    let width = info.width as u32;
    let height = info.height as u32;

    let out_colorspace = decoder.get_output_colorspace().unwrap_or(ColorSpace::RGB);

    let image = match out_colorspace {
        ColorSpace::RGB => {
            let buffer: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_raw(width, height, pixels)
                .ok_or_else(|| decode_error("Truncated RGB pixel buffer".to_string()))?;
            DynamicImage::ImageRgb8(buffer)
        }
        ColorSpace::RGBA => {
            let buffer: ImageBuffer<Rgba<u8>, Vec<u8>> =
                ImageBuffer::from_raw(width, height, pixels)
                    .ok_or_else(|| decode_error("Truncated RGBA pixel buffer".to_string()))?;
            DynamicImage::ImageRgba8(buffer)
        }
        ColorSpace::Luma => {
            let buffer: ImageBuffer<Luma<u8>, Vec<u8>> =
                ImageBuffer::from_raw(width, height, pixels)
                    .ok_or_else(|| decode_error("Truncated Luma pixel buffer".to_string()))?;
            DynamicImage::ImageLuma8(buffer)
        }
        other => {
            tracing::warn!(path = %path.display(), colorspace = ?other, "zune-jpeg colorspace unsupported, falling back to image crate");
            return decode_fallback(bytes, path);
        }
    };

    tracing::debug!(path = %path.display(), width, height, "decoded JPEG with zune-jpeg");
    Ok(image)
}

/// Walk the JPEG marker segments and entropy-coded scans until EOI.
///
/// Returns false when the data runs out first. Anything after EOI is ignored.
fn has_end_of_image(bytes: &[u8]) -> bool {
    const EOI: u8 = 0xD9;
    const SOS: u8 = 0xDA;

    let mut pos = 0;
    loop {
        // Skip to the next marker prefix, then past any fill bytes
        while pos < bytes.len() && bytes[pos] != 0xFF {
            pos += 1;
        }
        while pos < bytes.len() && bytes[pos] == 0xFF {
            pos += 1;
        }
        let Some(&marker) = bytes.get(pos) else {
            return false;
        };
        pos += 1;

        match marker {
            EOI => return true,
            // Standalone markers: SOI, TEM, RST0-7
            0xD8 | 0x01 | 0xD0..=0xD7 => continue,
            _ => {}
        }

        let Some(length) = bytes.get(pos..pos + 2) else {
            return false;
        };
        pos += u16::from_be_bytes([length[0], length[1]]) as usize;
        if pos > bytes.len() {
            return false;
        }

        if marker == SOS {
            pos = skip_entropy_data(bytes, pos);
        }
    }
}

/// Position of the first marker that ends a scan, or the end of the data.
fn skip_entropy_data(bytes: &[u8], mut pos: usize) -> usize {
    while pos + 1 < bytes.len() {
        if bytes[pos] == 0xFF {
            match bytes[pos + 1] {
                // Stuffed zero, restart marker or fill byte stay inside the scan
                0x00 | 0xD0..=0xD7 | 0xFF => pos += 1,
                _ => return pos,
            }
        }
        pos += 1;
    }
    bytes.len()
}

/// Decode through the image crate, which guesses the format from the bytes
fn decode_fallback(bytes: &[u8], path: &Path) -> Result<DynamicImage, DecodeError> {
    image::load_from_memory(bytes).map_err(|e| DecodeError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
