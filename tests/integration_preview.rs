//! Integration tests for canonicalization and hothash identity.
//!
//! These tests verify:
//! - Determinism across calls and across files with the same pixels
//! - Independence from tags, file name and modification time
//! - Independence between preview dimensions
//! - The full camera-file scenario (rotated, tagged, geotagged)

mod common;

use assert_fs::prelude::*;
use assert_fs::TempDir;
use common::*;
use exif::Tag;
use photo_import_core::core::import::ImportProcessor;
use photo_import_core::core::preview::{
    Canonicalizer, Hothash, COLD_PREVIEW_DIMENSION, HOT_PREVIEW_DIMENSION,
};
use photo_import_core::error::DecodeError;
use predicates::prelude::*;
use std::fs::File;
use std::time::{Duration, SystemTime};

#[test]
fn hothash_is_lowercase_hex() {
    let dir = TempDir::new().unwrap();
    let photo = dir.child("photo.jpg");
    photo.write_binary(&jpeg(320, 240, 1)).unwrap();

    let (_, hothash) = Canonicalizer::new().hotpreview(photo.path()).unwrap();

    let hex = predicate::str::is_match("^[0-9a-f]{64}$").unwrap();
    assert!(hex.eval(hothash.as_str()));
    assert_eq!(Hothash::parse(hothash.as_str()).unwrap(), hothash);
}

#[test]
fn repeated_calls_are_byte_identical() {
    let dir = TempDir::new().unwrap();
    let photo = dir.child("photo.jpg");
    photo.write_binary(&jpeg(640, 480, 2)).unwrap();
    let canonicalizer = Canonicalizer::new();

    let (first, first_hash) = canonicalizer.hotpreview(photo.path()).unwrap();
    for _ in 0..3 {
        let (again, again_hash) = canonicalizer.hotpreview(photo.path()).unwrap();
        assert_eq!(again.bytes(), first.bytes());
        assert_eq!(again_hash, first_hash);
    }
}

#[test]
fn concurrent_calls_on_same_file_agree() {
    let dir = TempDir::new().unwrap();
    let photo = dir.child("photo.jpg");
    photo.write_binary(&jpeg(500, 400, 3)).unwrap();
    let canonicalizer = Canonicalizer::new();
    let path = photo.path().to_path_buf();

    let hashes: Vec<Hothash> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| canonicalizer.hotpreview(&path).unwrap().1))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(hashes.windows(2).all(|pair| pair[0] == pair[1]));
}

#[test]
fn tags_name_and_mtime_do_not_affect_identity() {
    let dir = TempDir::new().unwrap();
    let pixels = jpeg(600, 400, 4);

    let plain = dir.child("IMG_0001.jpg");
    plain.write_binary(&pixels).unwrap();

    let mut fields = capture_fields();
    fields.extend(settings_fields());
    let tagged = dir.child("renamed-and-tagged.jpeg");
    tagged.write_binary(&with_exif(&pixels, &fields)).unwrap();
    File::options()
        .write(true)
        .open(tagged.path())
        .unwrap()
        .set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000_000))
        .unwrap();

    let canonicalizer = Canonicalizer::new();
    let (_, plain_hash) = canonicalizer.hotpreview(plain.path()).unwrap();
    let (_, tagged_hash) = canonicalizer.hotpreview(tagged.path()).unwrap();

    assert_eq!(plain_hash, tagged_hash);
}

#[test]
fn different_content_gives_different_identity() {
    let dir = TempDir::new().unwrap();
    let a = dir.child("a.jpg");
    let b = dir.child("b.jpg");
    a.write_binary(&jpeg(300, 200, 5)).unwrap();
    b.write_binary(&jpeg(300, 200, 90)).unwrap();

    let canonicalizer = Canonicalizer::new();
    assert_ne!(
        canonicalizer.hotpreview(a.path()).unwrap().1,
        canonicalizer.hotpreview(b.path()).unwrap().1
    );
}

#[test]
fn hot_and_cold_are_independent_artifacts() {
    let dir = TempDir::new().unwrap();
    let photo = dir.child("photo.jpg");
    photo.write_binary(&jpeg(2000, 1500, 6)).unwrap();
    let canonicalizer = Canonicalizer::new();

    let (hot, hot_hash) = canonicalizer.canonicalize(photo.path(), HOT_PREVIEW_DIMENSION).unwrap();
    let (cold, cold_hash) = canonicalizer.canonicalize(photo.path(), COLD_PREVIEW_DIMENSION).unwrap();

    assert_ne!(hot_hash, cold_hash);
    assert_eq!((hot.width(), hot.height()), (150, 113));
    assert_eq!((cold.width(), cold.height()), (1200, 900));
}

#[test]
fn camera_file_end_to_end() {
    let dir = TempDir::new().unwrap();
    let mut fields = vec![short(Tag::Orientation, 6)];
    fields.extend(capture_fields());
    let photo = dir.child("DSC_4000.JPG");
    photo.write_binary(&with_exif(&jpeg(4000, 3000, 7), &fields)).unwrap();

    let record = ImportProcessor::default().process_file(photo.path()).unwrap();

    // Rotated upright, longer edge bounded
    assert_eq!((record.hotpreview.width(), record.hotpreview.height()), (113, 150));
    let cold = record.coldpreview.as_ref().unwrap();
    assert_eq!((cold.width(), cold.height()), (900, 1200));

    // Previews carry no tags
    assert!(!record.hotpreview.bytes().windows(6).any(|w| w == b"Exif\0\0"));
    assert!(!cold.bytes().windows(6).any(|w| w == b"Exif\0\0"));

    // Identity is the hash of the hot preview bytes
    assert_eq!(record.hothash, Hothash::of(record.hotpreview.bytes()));

    // Dimensions are the stored, unrotated ones
    let core = &record.metadata.core;
    assert_eq!((core.width, core.height), (Some(4000), Some(3000)));
    assert_eq!(core.captured_at.as_deref(), Some("2024-10-21T14:30:45"));
    let (lat, lon) = core.position().unwrap();
    assert!((lat - 37.775).abs() < 1e-6);
    assert!((lon + 122.419_166).abs() < 1e-5);
    assert_eq!(core.camera_display().as_deref(), Some("Canon EOS R5"));
}

#[test]
fn corrupt_inputs_fail_without_fallback() {
    let dir = TempDir::new().unwrap();
    let canonicalizer = Canonicalizer::new();

    let text = dir.child("notes.jpg");
    text.write_str("definitely not pixels").unwrap();
    assert!(matches!(
        canonicalizer.hotpreview(text.path()),
        Err(DecodeError::UnsupportedFormat { .. })
    ));

    let empty = dir.child("empty.jpg");
    empty.touch().unwrap();
    assert!(matches!(
        canonicalizer.hotpreview(empty.path()),
        Err(DecodeError::EmptyImage { .. })
    ));

    let source = jpeg(400, 400, 8);
    let truncated = dir.child("truncated.jpg");
    truncated.write_binary(&source[..source.len() / 3]).unwrap();
    assert!(canonicalizer.hotpreview(truncated.path()).is_err());

    let nearly_whole = dir.child("nearly_whole.jpg");
    nearly_whole.write_binary(&source[..source.len() - 2]).unwrap();
    assert!(matches!(
        canonicalizer.hotpreview(nearly_whole.path()),
        Err(DecodeError::Decode { .. })
    ));

    assert!(matches!(
        canonicalizer.hotpreview(&dir.path().join("missing.jpg")),
        Err(DecodeError::Io { .. })
    ));
}

#[test]
fn error_messages_name_the_file() {
    let dir = TempDir::new().unwrap();
    let text = dir.child("notes.jpg");
    text.write_str("definitely not pixels").unwrap();

    let error = Canonicalizer::new().hotpreview(text.path()).unwrap_err();
    assert!(predicate::str::contains("notes.jpg").eval(&error.to_string()));
}
