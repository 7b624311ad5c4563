//! Best-effort camera settings.
//!
//! Each field is read on its own; a missing or malformed tag only loses that
//! field.

use super::tags::{MetadataTag, TagDirectory};
use serde::{Deserialize, Serialize};

/// Whether the flash fired (bit 0 of the Flash tag)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlashState {
    Fired,
    NotFired,
}

impl FlashState {
    pub fn from_exif(code: u32) -> Self {
        if code & 0x01 == 1 {
            FlashState::Fired
        } else {
            FlashState::NotFired
        }
    }
}

/// Exposure program (EXIF ExposureProgram)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExposureProgram {
    NotDefined,
    Manual,
    Normal,
    AperturePriority,
    ShutterPriority,
    Creative,
    Action,
    Portrait,
    Landscape,
}

impl ExposureProgram {
    /// Unrecognised codes map to `NotDefined`
    pub fn from_exif(code: u32) -> Self {
        match code {
            1 => Self::Manual,
            2 => Self::Normal,
            3 => Self::AperturePriority,
            4 => Self::ShutterPriority,
            5 => Self::Creative,
            6 => Self::Action,
            7 => Self::Portrait,
            8 => Self::Landscape,
            _ => Self::NotDefined,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::NotDefined => "Not Defined",
            Self::Manual => "Manual",
            Self::Normal => "Normal program",
            Self::AperturePriority => "Aperture priority",
            Self::ShutterPriority => "Shutter priority",
            Self::Creative => "Creative program",
            Self::Action => "Action program",
            Self::Portrait => "Portrait mode",
            Self::Landscape => "Landscape mode",
        }
    }
}

/// Metering mode (EXIF MeteringMode)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeteringMode {
    Unknown,
    Average,
    CenterWeighted,
    Spot,
    MultiSpot,
    Pattern,
    Partial,
    Other,
}

impl MeteringMode {
    /// Unrecognised codes map to `Unknown`
    pub fn from_exif(code: u32) -> Self {
        match code {
            1 => Self::Average,
            2 => Self::CenterWeighted,
            3 => Self::Spot,
            4 => Self::MultiSpot,
            5 => Self::Pattern,
            6 => Self::Partial,
            255 => Self::Other,
            _ => Self::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Average => "Average",
            Self::CenterWeighted => "Center-weighted average",
            Self::Spot => "Spot",
            Self::MultiSpot => "Multi-spot",
            Self::Pattern => "Pattern",
            Self::Partial => "Partial",
            Self::Other => "Other",
        }
    }
}

/// White balance mode: 0 is auto, anything else manual
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WhiteBalance {
    Auto,
    Manual,
}

impl WhiteBalance {
    pub fn from_exif(code: u32) -> Self {
        if code == 0 {
            WhiteBalance::Auto
        } else {
            WhiteBalance::Manual
        }
    }
}

/// Exposure mode (EXIF ExposureMode)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExposureMode {
    Auto,
    Manual,
    AutoBracket,
    Unknown,
}

impl ExposureMode {
    pub fn from_exif(code: u32) -> Self {
        match code {
            0 => Self::Auto,
            1 => Self::Manual,
            2 => Self::AutoBracket,
            _ => Self::Unknown,
        }
    }
}

/// Color space (EXIF ColorSpace); uncalibrated and unknown codes are absent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorSpace {
    Srgb,
    AdobeRgb,
}

impl ColorSpace {
    pub fn from_exif(code: u32) -> Option<Self> {
        match code {
            1 => Some(Self::Srgb),
            2 => Some(Self::AdobeRgb),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Srgb => "sRGB",
            Self::AdobeRgb => "Adobe RGB",
        }
    }
}

/// Camera settings; every field independently optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraSettings {
    pub iso: Option<u32>,
    /// f-number, one decimal
    pub aperture: Option<f64>,
    /// `"1/250"` or a decimal number of seconds such as `"2.5"`
    pub shutter_speed: Option<String>,
    /// Millimetres, one decimal
    pub focal_length: Option<f64>,
    pub focal_length_35mm: Option<u32>,
    pub lens_make: Option<String>,
    pub lens_model: Option<String>,
    /// Camera body serial number
    pub serial_number: Option<String>,
    pub color_space: Option<ColorSpace>,
    pub flash: Option<FlashState>,
    pub exposure_program: Option<ExposureProgram>,
    pub exposure_mode: Option<ExposureMode>,
    /// EV, two decimals
    pub exposure_compensation: Option<f64>,
    pub metering_mode: Option<MeteringMode>,
    pub white_balance: Option<WhiteBalance>,
}

impl CameraSettings {
    /// Extract every setting the directory holds.
    pub fn from_directory(directory: &TagDirectory) -> Self {
        Self {
            iso: directory
                .unsigned(MetadataTag::Iso)
                .or_else(|| directory.unsigned(MetadataTag::IsoSpeed))
                .filter(|iso| *iso > 0),
            aperture: aperture(directory),
            shutter_speed: directory
                .rational_parts(MetadataTag::ExposureTime)
                .and_then(|(num, denom)| format_shutter_speed(num, denom)),
            focal_length: directory
                .number(MetadataTag::FocalLength)
                .filter(|mm| *mm > 0.0)
                .map(|mm| round_to(mm, 1)),
            focal_length_35mm: directory
                .unsigned(MetadataTag::FocalLength35mm)
                .filter(|mm| *mm > 0),
            lens_make: directory.ascii(MetadataTag::LensMake),
            lens_model: directory.ascii(MetadataTag::LensModel),
            serial_number: directory.ascii(MetadataTag::SerialNumber),
            color_space: directory
                .unsigned(MetadataTag::ColorSpace)
                .and_then(ColorSpace::from_exif),
            flash: directory.unsigned(MetadataTag::Flash).map(FlashState::from_exif),
            exposure_program: directory
                .unsigned(MetadataTag::ExposureProgram)
                .map(ExposureProgram::from_exif),
            exposure_mode: directory
                .unsigned(MetadataTag::ExposureMode)
                .map(ExposureMode::from_exif),
            exposure_compensation: directory
                .number(MetadataTag::ExposureBias)
                .map(|ev| round_to(ev, 2)),
            metering_mode: directory
                .unsigned(MetadataTag::MeteringMode)
                .map(MeteringMode::from_exif),
            white_balance: directory
                .unsigned(MetadataTag::WhiteBalance)
                .map(WhiteBalance::from_exif),
        }
    }

    /// Check if any setting was extracted
    pub fn has_data(&self) -> bool {
        *self != Self::default()
    }
}

/// f-number from FNumber, or from the APEX ApertureValue (f = 2^(Av/2))
fn aperture(directory: &TagDirectory) -> Option<f64> {
    directory
        .number(MetadataTag::FNumber)
        .filter(|f| *f > 0.0)
        .or_else(|| {
            directory
                .number(MetadataTag::ApertureValue)
                .map(|av| 2f64.powf(av / 2.0))
        })
        .map(|f| round_to(f, 1))
}

/// Format an exposure time rational.
///
/// A numerator of 1 gives `"1/N"`; anything else is the decimal value with at
/// most three fraction digits and no trailing zeros. Exposures too short to
/// show in three digits become the nearest `"1/N"` instead of `"0"`.
pub fn format_shutter_speed(numerator: i64, denominator: i64) -> Option<String> {
    if denominator <= 0 || numerator <= 0 {
        return None;
    }
    if numerator == 1 {
        return Some(format!("1/{}", denominator));
    }
    let seconds = numerator as f64 / denominator as f64;
    if seconds < 0.0005 {
        return Some(format!("1/{}", (1.0 / seconds).round() as i64));
    }
    let text = format!("{:.3}", seconds);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    Some(text.to_string())
}

/// Round to a fixed number of decimals
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
