//! GPS coordinate decoding.
//!
//! Each coordinate arrives as 1 component (decimal degrees), 2 (degrees and
//! decimal minutes) or 3 (degrees, minutes, seconds), plus a hemisphere
//! reference. A pair is only reported when both halves decode, both are in
//! range, and the pair is not the `(0, 0)` "no fix" sentinel.

use super::tags::{MetadataTag, TagDirectory};

/// Which axis a coordinate belongs to; determines range and negative hemisphere
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl Axis {
    fn limit(self) -> f64 {
        match self {
            Axis::Latitude => 90.0,
            Axis::Longitude => 180.0,
        }
    }

    fn negative_ref(self) -> char {
        match self {
            Axis::Latitude => 'S',
            Axis::Longitude => 'W',
        }
    }
}

/// Sum degree/minute/second components into decimal degrees.
///
/// Accepts 1, 2 or 3 components; missing minutes or seconds count as zero.
/// Any other arity, or a negative minute/second, is rejected.
pub fn dms_to_decimal(components: &[f64]) -> Option<f64> {
    let (degrees, minutes, seconds) = match *components {
        [d] => (d, 0.0, 0.0),
        [d, m] => (d, m, 0.0),
        [d, m, s] => (d, m, s),
        _ => return None,
    };
    if minutes < 0.0 || seconds < 0.0 {
        return None;
    }
    let decimal = degrees + minutes / 60.0 + seconds / 3600.0;
    decimal.is_finite().then_some(decimal)
}

/// Decode one coordinate and apply its hemisphere reference.
///
/// A missing reference leaves the value as written.
pub fn decode_coordinate(components: &[f64], reference: Option<&str>, axis: Axis) -> Option<f64> {
    let magnitude = dms_to_decimal(components)?;

    let negative = reference
        .and_then(|r| r.trim().chars().next())
        .map(|c| c.to_ascii_uppercase() == axis.negative_ref())
        .unwrap_or(false);

    let value = if negative { -magnitude.abs() } else { magnitude };

    if value.abs() > axis.limit() {
        return None;
    }
    Some(value)
}

/// Validate a decoded pair: both present, and not the `(0, 0)` sentinel.
pub fn validate_pair(latitude: Option<f64>, longitude: Option<f64>) -> Option<(f64, f64)> {
    match (latitude, longitude) {
        (Some(lat), Some(lon)) if lat == 0.0 && lon == 0.0 => None,
        (Some(lat), Some(lon)) => Some((lat, lon)),
        _ => None,
    }
}

/// Latitude and longitude from the GPS tag group, or `None` for the pair.
pub fn resolve_position(directory: &TagDirectory) -> Option<(f64, f64)> {
    let latitude = directory.numbers(MetadataTag::GpsLatitude).and_then(|c| {
        let reference = directory.ascii(MetadataTag::GpsLatitudeRef);
        decode_coordinate(&c, reference.as_deref(), Axis::Latitude)
    });
    let longitude = directory.numbers(MetadataTag::GpsLongitude).and_then(|c| {
        let reference = directory.ascii(MetadataTag::GpsLongitudeRef);
        decode_coordinate(&c, reference.as_deref(), Axis::Longitude)
    });

    validate_pair(latitude, longitude)
}

/// Altitude in metres; negative below sea level (reference 1)
pub fn resolve_altitude(directory: &TagDirectory) -> Option<f64> {
    let altitude = directory.number(MetadataTag::GpsAltitude)?;
    let below_sea_level = directory.unsigned(MetadataTag::GpsAltitudeRef) == Some(1);
    Some(if below_sea_level {
        -altitude.abs()
    } else {
        altitude
    })
}
