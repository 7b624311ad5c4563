//! Capture timestamp resolution.
//!
//! Encoders disagree on separators, fractional seconds and zone suffixes.
//! Candidates are tried in order and the first one that parses wins.

use super::tags::{MetadataTag, TagDirectory};
use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::OnceLock;

/// Tags that may hold the capture time, most trustworthy first
pub const TIMESTAMP_CANDIDATES: [MetadataTag; 3] = [
    MetadataTag::DateTimeOriginal,
    MetadataTag::DateTime,
    MetadataTag::DateTimeDigitized,
];

/// Output format: ISO-8601, naive, whole seconds
const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Accepted date-time layouts. `%.f` also matches a missing fraction.
const DATETIME_FORMATS: &[&str] = &[
    "%Y:%m:%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y:%m:%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y:%m:%d %H:%M",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Accepted date-only layouts, read as midnight
const DATE_FORMATS: &[&str] = &["%Y:%m:%d", "%Y-%m-%d", "%Y/%m/%d"];

/// Trailing `Z`, `+HH:MM`, `-HHMM` or `+HH` after a time of day
fn zone_suffix() -> &'static Regex {
    static ZONE: OnceLock<Regex> = OnceLock::new();
    ZONE.get_or_init(|| {
        Regex::new(r"(\d{2}:\d{2}(?::\d{2}(?:\.\d+)?)?)\s*(?:[Zz]|[+-]\d{2}(?::?\d{2})?)$")
            .expect("zone suffix pattern is valid")
    })
}

/// Parse a timestamp string in any accepted layout.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    if trimmed.is_empty() {
        return None;
    }
    let text = zone_suffix().replace(trimmed, "$1");

    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&text, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(&text, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Normalize a timestamp to `YYYY-MM-DDTHH:MM:SS`.
///
/// Unparsable input is returned unchanged.
pub fn normalize_timestamp(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(parsed) => parsed.format(ISO_FORMAT).to_string(),
        None => raw.to_string(),
    }
}

/// First candidate value that parses, as an ISO-8601 string.
pub fn resolve_timestamp<'a, I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    candidates
        .into_iter()
        .find_map(parse_timestamp)
        .map(|parsed| parsed.format(ISO_FORMAT).to_string())
}

/// Capture time from the tag directory, trying [`TIMESTAMP_CANDIDATES`] in order.
pub fn resolve_captured_at(directory: &TagDirectory) -> Option<String> {
    let values: Vec<String> = TIMESTAMP_CANDIDATES
        .iter()
        .filter_map(|tag| directory.ascii(*tag))
        .collect();
    resolve_timestamp(values.iter().map(String::as_str))
}
