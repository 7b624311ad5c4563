//! Typed access to the embedded EXIF tag directory.
//!
//! Every tag the extractor reads is named in [`MetadataTag`]; the mapping to
//! kamadak-exif tags lives in one exhaustive `match` so extraction code never
//! deals with raw tag numbers.

use exif::{Exif, In, Reader, Tag, Value};
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Seek};
use std::path::Path;

/// Semantic fields read from the tag directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataTag {
    DateTimeOriginal,
    DateTimeDigitized,
    DateTime,
    Make,
    Model,
    Orientation,
    GpsLatitude,
    GpsLatitudeRef,
    GpsLongitude,
    GpsLongitudeRef,
    GpsAltitude,
    GpsAltitudeRef,
    Iso,
    IsoSpeed,
    FNumber,
    ApertureValue,
    ExposureTime,
    ExposureBias,
    ExposureProgram,
    ExposureMode,
    FocalLength,
    FocalLength35mm,
    LensMake,
    LensModel,
    SerialNumber,
    ColorSpace,
    Flash,
    MeteringMode,
    WhiteBalance,
}

impl MetadataTag {
    /// The EXIF tag carrying this field
    pub fn exif_tag(self) -> Tag {
        match self {
            Self::DateTimeOriginal => Tag::DateTimeOriginal,
            Self::DateTimeDigitized => Tag::DateTimeDigitized,
            Self::DateTime => Tag::DateTime,
            Self::Make => Tag::Make,
            Self::Model => Tag::Model,
            Self::Orientation => Tag::Orientation,
            Self::GpsLatitude => Tag::GPSLatitude,
            Self::GpsLatitudeRef => Tag::GPSLatitudeRef,
            Self::GpsLongitude => Tag::GPSLongitude,
            Self::GpsLongitudeRef => Tag::GPSLongitudeRef,
            Self::GpsAltitude => Tag::GPSAltitude,
            Self::GpsAltitudeRef => Tag::GPSAltitudeRef,
            Self::Iso => Tag::PhotographicSensitivity,
            Self::IsoSpeed => Tag::ISOSpeed,
            Self::FNumber => Tag::FNumber,
            Self::ApertureValue => Tag::ApertureValue,
            Self::ExposureTime => Tag::ExposureTime,
            Self::ExposureBias => Tag::ExposureBiasValue,
            Self::ExposureProgram => Tag::ExposureProgram,
            Self::ExposureMode => Tag::ExposureMode,
            Self::FocalLength => Tag::FocalLength,
            Self::FocalLength35mm => Tag::FocalLengthIn35mmFilm,
            Self::LensMake => Tag::LensMake,
            Self::LensModel => Tag::LensModel,
            Self::SerialNumber => Tag::BodySerialNumber,
            Self::ColorSpace => Tag::ColorSpace,
            Self::Flash => Tag::Flash,
            Self::MeteringMode => Tag::MeteringMode,
            Self::WhiteBalance => Tag::WhiteBalance,
        }
    }
}

/// A parsed EXIF directory with typed, forgiving accessors.
///
/// Accessors return `None` for a missing tag and for a tag whose value has an
/// unexpected type or shape; they never fail.
pub struct TagDirectory {
    exif: Exif,
}

impl TagDirectory {
    /// Read the tag directory of an image file.
    pub fn from_path(path: &Path) -> Option<Self> {
        let file = File::open(path).ok()?;
        let mut reader = BufReader::new(file);
        Self::read(&mut reader)
    }

    /// Read the tag directory from in-memory container bytes (JPEG, TIFF, PNG, WebP, HEIF).
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        Self::read(&mut Cursor::new(bytes))
    }

    /// Parse a bare TIFF-structured EXIF block (the payload of a JPEG APP1 segment).
    pub fn from_raw(tiff: Vec<u8>) -> Option<Self> {
        let reader = Reader::new();
        match reader.read_raw(tiff) {
            Ok(exif) => Some(Self { exif }),
            Err(err) => {
                tracing::debug!(error = %err, "unreadable EXIF block");
                None
            }
        }
    }

    fn read<R: BufRead + Seek>(reader: &mut R) -> Option<Self> {
        // A malformed entry only costs that entry, not the whole directory
        let result = Reader::new()
            .continue_on_error(true)
            .read_from_container(reader)
            .or_else(|err| {
                err.distill_partial_result(|errors| {
                    tracing::debug!(errors = errors.len(), "EXIF directory partially readable");
                })
            });

        match result {
            Ok(exif) => Some(Self { exif }),
            Err(err) => {
                tracing::debug!(error = %err, "no readable EXIF directory");
                None
            }
        }
    }

    /// Raw value of a tag in the primary image
    pub fn value(&self, tag: MetadataTag) -> Option<&Value> {
        self.exif
            .get_field(tag.exif_tag(), In::PRIMARY)
            .map(|field| &field.value)
    }

    /// First ASCII string of a tag, with NULs and surrounding whitespace trimmed.
    ///
    /// Empty strings count as absent.
    pub fn ascii(&self, tag: MetadataTag) -> Option<String> {
        match self.value(tag)? {
            Value::Ascii(strings) => {
                let bytes = strings.first()?;
                let text = String::from_utf8_lossy(bytes);
                let trimmed = text.trim_matches(|c: char| c == '\0' || c.is_whitespace());
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            // Some encoders store text as UNDEFINED bytes
            Value::Undefined(bytes, _) => {
                let text = String::from_utf8_lossy(bytes);
                let trimmed = text.trim_matches(|c: char| c == '\0' || c.is_whitespace());
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            _ => None,
        }
    }

    /// First integer component of a tag
    pub fn unsigned(&self, tag: MetadataTag) -> Option<u32> {
        match self.value(tag)? {
            Value::Short(v) => v.first().map(|n| *n as u32),
            Value::Long(v) => v.first().copied(),
            Value::Byte(v) => v.first().map(|n| *n as u32),
            Value::SShort(v) => v.first().and_then(|n| u32::try_from(*n).ok()),
            Value::SLong(v) => v.first().and_then(|n| u32::try_from(*n).ok()),
            _ => None,
        }
    }

    /// First numeric component of a tag as a finite float
    pub fn number(&self, tag: MetadataTag) -> Option<f64> {
        self.numbers(tag)?.first().copied()
    }

    /// All numeric components of a tag as finite floats.
    ///
    /// Rationals with a zero denominator, and any non-finite component, make
    /// the whole value unusable. ASCII values holding a decimal number (written
    /// by some phone encoders for GPS) are accepted as a single component.
    pub fn numbers(&self, tag: MetadataTag) -> Option<Vec<f64>> {
        let components: Vec<f64> = match self.value(tag)? {
            Value::Rational(v) => v
                .iter()
                .map(|r| (r.denom != 0).then(|| r.to_f64()))
                .collect::<Option<_>>()?,
            Value::SRational(v) => v
                .iter()
                .map(|r| (r.denom != 0).then(|| r.to_f64()))
                .collect::<Option<_>>()?,
            Value::Short(v) => v.iter().map(|n| *n as f64).collect(),
            Value::Long(v) => v.iter().map(|n| *n as f64).collect(),
            Value::SShort(v) => v.iter().map(|n| *n as f64).collect(),
            Value::SLong(v) => v.iter().map(|n| *n as f64).collect(),
            Value::Float(v) => v.iter().map(|n| *n as f64).collect(),
            Value::Double(v) => v.clone(),
            Value::Ascii(_) => vec![self.ascii(tag)?.parse::<f64>().ok()?],
            _ => return None,
        };

        if components.is_empty() || components.iter().any(|c| !c.is_finite()) {
            return None;
        }
        Some(components)
    }

    /// First rational component as `(numerator, denominator)`.
    pub fn rational_parts(&self, tag: MetadataTag) -> Option<(i64, i64)> {
        match self.value(tag)? {
            Value::Rational(v) => v.first().map(|r| (r.num as i64, r.denom as i64)),
            Value::SRational(v) => v.first().map(|r| (r.num as i64, r.denom as i64)),
            _ => None,
        }
        .filter(|(_, denom)| *denom != 0)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use exif::{Field, SRational};

    #[test]
    fn ascii_is_trimmed() {
        let dir = directory(&[ascii(Tag::Make, "  Canon  ")]);
        assert_eq!(dir.ascii(MetadataTag::Make), Some("Canon".to_string()));
    }

    #[test]
    fn blank_ascii_is_absent() {
        let dir = directory(&[ascii(Tag::Model, "   ")]);
        assert_eq!(dir.ascii(MetadataTag::Model), None);
    }

    #[test]
    fn missing_tag_is_absent() {
        let dir = directory(&[ascii(Tag::Make, "Nikon")]);
        assert_eq!(dir.ascii(MetadataTag::Model), None);
        assert_eq!(dir.number(MetadataTag::FNumber), None);
    }

    #[test]
    fn rational_components_convert() {
        let dir = directory(&[rationals(Tag::GPSLatitude, &[(37, 1), (46, 1), (30, 1)])]);
        assert_eq!(
            dir.numbers(MetadataTag::GpsLatitude),
            Some(vec![37.0, 46.0, 30.0])
        );
    }

    #[test]
    fn zero_denominator_makes_value_unusable() {
        let dir = directory(&[rationals(Tag::FNumber, &[(28, 0)])]);
        assert_eq!(dir.number(MetadataTag::FNumber), None);
        assert_eq!(dir.rational_parts(MetadataTag::FNumber), None);
    }

    #[test]
    fn short_reads_as_unsigned() {
        let dir = directory(&[short(Tag::Orientation, 6)]);
        assert_eq!(dir.unsigned(MetadataTag::Orientation), Some(6));
    }

    #[test]
    fn signed_rational_parts() {
        let field = Field {
            tag: Tag::ExposureBiasValue,
            ifd_num: In::PRIMARY,
            value: Value::SRational(vec![SRational { num: -2, denom: 3 }]),
        };
        let dir = directory(&[field]);
        assert_eq!(dir.rational_parts(MetadataTag::ExposureBias), Some((-2, 3)));
    }

    #[test]
    fn garbage_bytes_have_no_directory() {
        assert!(TagDirectory::from_bytes(b"definitely not an image").is_none());
        assert!(TagDirectory::from_raw(vec![1, 2, 3]).is_none());
    }
}
