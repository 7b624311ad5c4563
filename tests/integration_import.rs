//! Integration tests for batch imports.
//!
//! These tests verify:
//! - Corrupt files are reported without aborting the batch
//! - Results keep input order
//! - Cancellation stops new files from starting
//! - Imported previews land in a shared cache

mod common;

use assert_fs::prelude::*;
use assert_fs::TempDir;
use common::*;
use photo_import_core::core::cache::PreviewCache;
use photo_import_core::core::import::{CancellationToken, ImportConfig, ImportProcessor};
use photo_import_core::events::{null_sender, BatchEvent, Event, EventChannel, FileEvent};
use predicates::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

fn write_photos(dir: &TempDir, count: u32) -> Vec<PathBuf> {
    (0..count)
        .map(|i| {
            let child = dir.child(format!("IMG_{:04}.jpg", i));
            child.write_binary(&jpeg(160 + i * 8, 120, i * 17)).unwrap();
            child.path().to_path_buf()
        })
        .collect()
}

#[test]
fn batch_reports_corrupt_files_and_continues() {
    let dir = TempDir::new().unwrap();
    let mut paths = write_photos(&dir, 3);
    let corrupt = dir.child("corrupt.jpg");
    corrupt.write_str("this is not a valid image file").unwrap();
    paths.insert(1, corrupt.path().to_path_buf());

    let (sender, receiver) = EventChannel::new();
    let result = ImportProcessor::default().process_batch(&paths, &sender, &CancellationToken::new());
    drop(sender);

    assert_eq!(result.records.len(), 3);
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].path, corrupt.path());
    assert!(predicate::str::contains("corrupt.jpg").eval(&result.failures[0].to_string()));

    let imported: Vec<&PathBuf> = result.records.iter().map(|r| &r.path).collect();
    assert_eq!(imported, vec![&paths[0], &paths[2], &paths[3]]);

    let events: Vec<Event> = receiver.iter().collect();
    assert!(matches!(
        events.first(),
        Some(Event::Batch(BatchEvent::Started { total_files: 4 }))
    ));
    let progress = events
        .iter()
        .filter(|e| matches!(e, Event::Batch(BatchEvent::Progress(_))))
        .count();
    assert_eq!(progress, 4);
    let failed = events
        .iter()
        .filter(|e| matches!(e, Event::File(FileEvent::Failed { .. })))
        .count();
    assert_eq!(failed, 1);
}

#[test]
fn identical_content_shares_a_hothash() {
    let dir = TempDir::new().unwrap();
    let bytes = jpeg(300, 200, 5);
    let first = dir.child("first.jpg");
    let copy = dir.child("nested/copy.jpg");
    first.write_binary(&bytes).unwrap();
    copy.write_binary(&bytes).unwrap();

    let result = ImportConfig::new()
        .with_coldpreview(false)
        .build()
        .process_batch(
            &[first.path().to_path_buf(), copy.path().to_path_buf()],
            &null_sender(),
            &CancellationToken::new(),
        );

    assert_eq!(result.records.len(), 2);
    assert_eq!(result.records[0].hothash, result.records[1].hothash);
    assert!(result.records.iter().all(|r| r.coldpreview.is_none()));
}

#[test]
fn cancellation_stops_new_files() {
    let dir = TempDir::new().unwrap();
    let paths = write_photos(&dir, 6);
    let processor = ImportProcessor::default();
    let token = CancellationToken::new();

    // A rendezvous channel: every send waits for the listener, so the
    // listener's cancel lands before the worker can pick another file.
    let (sender, receiver) = EventChannel::bounded(0);
    let listener_token = token.clone();
    let listener = thread::spawn(move || {
        for event in receiver.iter() {
            if let Event::File(FileEvent::Imported { .. }) = event {
                listener_token.cancel();
            }
        }
    });

    let pool = rayon::ThreadPoolBuilder::new().num_threads(1).build().unwrap();
    let result = pool.install(|| processor.process_batch(&paths, &sender, &token));
    drop(sender);
    listener.join().unwrap();

    assert!(result.cancelled);
    assert_eq!(result.records.len(), 1);
    assert!(result.failures.is_empty());
    assert_eq!(result.skipped, 5);
    assert_eq!(result.summary().total_files, 6);
}

#[test]
fn imported_previews_are_cached() {
    let dir = TempDir::new().unwrap();
    let paths = write_photos(&dir, 4);
    let cache = Arc::new(PreviewCache::new(8 * 1024 * 1024));
    let processor = ImportProcessor::default().with_cache(Arc::clone(&cache));

    let result = processor.process_batch(&paths, &null_sender(), &CancellationToken::new());

    assert_eq!(cache.len(), 4);
    for record in &result.records {
        let (image, metadata) = cache.get(&record.hothash);
        assert_eq!(image.unwrap().bytes(), record.hotpreview.bytes());
        assert_eq!(metadata.unwrap().core.width, record.metadata.core.width);
    }
    let total: usize = result.records.iter().map(|r| r.hotpreview.size_bytes()).sum();
    assert_eq!(cache.stats().total_image_bytes, total);
}
