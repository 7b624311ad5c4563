//! Fixture builders shared by the integration tests.
//!
//! Images are generated in-test: pixels are encoded with the `image` crate's
//! JPEG encoder and EXIF blocks are written with kamadak-exif, then spliced
//! in as an APP1 segment.

#![allow(dead_code)]

use exif::experimental::Writer;
use exif::{Field, In, Rational, Tag, Value};
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage};
use std::io::Cursor;

/// A JPEG with a smooth gradient; `seed` shifts the content.
pub fn jpeg(width: u32, height: u32, seed: u32) -> Vec<u8> {
    let pixels = RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            ((x * 255 / width.max(1) + seed) % 256) as u8,
            ((y * 255 / height.max(1)) % 256) as u8,
            (((x + y) / 8 + seed * 3) % 256) as u8,
        ])
    });
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, 92)
        .write_image(pixels.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    out
}

/// Insert an `Exif` APP1 segment right after the SOI marker.
pub fn with_exif(jpeg: &[u8], fields: &[Field]) -> Vec<u8> {
    let mut writer = Writer::new();
    for field in fields {
        writer.push_field(field);
    }
    let mut tiff = Cursor::new(Vec::new());
    writer.write(&mut tiff, false).unwrap();
    let tiff = tiff.into_inner();

    let length = (tiff.len() + 8) as u16;
    let mut out = Vec::with_capacity(jpeg.len() + tiff.len() + 10);
    out.extend_from_slice(&jpeg[..2]);
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&length.to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(&tiff);
    out.extend_from_slice(&jpeg[2..]);
    out
}

pub fn ascii(tag: Tag, text: &str) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Ascii(vec![text.as_bytes().to_vec()]),
    }
}

pub fn short(tag: Tag, value: u16) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Short(vec![value]),
    }
}

pub fn rationals(tag: Tag, parts: &[(u32, u32)]) -> Field {
    Field {
        tag,
        ifd_num: In::PRIMARY,
        value: Value::Rational(
            parts
                .iter()
                .map(|&(num, denom)| Rational { num, denom })
                .collect(),
        ),
    }
}

/// Capture time and a San Francisco position
pub fn capture_fields() -> Vec<Field> {
    vec![
        ascii(Tag::Make, "Canon"),
        ascii(Tag::Model, "Canon EOS R5"),
        ascii(Tag::DateTimeOriginal, "2024:10:21 14:30:45"),
        ascii(Tag::GPSLatitudeRef, "N"),
        rationals(Tag::GPSLatitude, &[(37, 1), (46, 1), (30, 1)]),
        ascii(Tag::GPSLongitudeRef, "W"),
        rationals(Tag::GPSLongitude, &[(122, 1), (25, 1), (9, 1)]),
    ]
}

/// A typical set of camera settings
pub fn settings_fields() -> Vec<Field> {
    vec![
        short(Tag::PhotographicSensitivity, 800),
        rationals(Tag::FNumber, &[(40, 10)]),
        rationals(Tag::ExposureTime, &[(1, 250)]),
        rationals(Tag::FocalLength, &[(35, 1)]),
        short(Tag::FocalLengthIn35mmFilm, 35),
        ascii(Tag::LensModel, "RF35mm F1.8 MACRO IS STM"),
        short(Tag::Flash, 0x10),
        short(Tag::ExposureProgram, 2),
        short(Tag::MeteringMode, 5),
        short(Tag::WhiteBalance, 0),
    ]
}
