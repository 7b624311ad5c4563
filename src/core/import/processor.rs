//! Per-file and batch import execution.

use super::{BackendClient, BackendFailure, ImportConfig, ImportFailure, ImportRecord};
use crate::core::cache::PreviewCache;
use crate::core::metadata::MetadataExtractor;
use crate::core::preview::{Canonicalizer, CanonicalizerConfig};
use crate::error::DecodeError;
use crate::events::{
    BatchEvent, BatchProgress, BatchSummary, Event, EventSender, FileEvent,
};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Cooperative cancellation flag shared between a batch and its controller.
///
/// Cancelling stops new files from starting; files already in progress finish.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Result of a batch, in input order
#[derive(Debug)]
pub struct BatchResult {
    /// Successfully imported files
    pub records: Vec<ImportRecord>,
    /// Files that failed, with the reason
    pub failures: Vec<ImportFailure>,
    /// Files never started because the batch was cancelled
    pub skipped: usize,
    /// Whether cancellation was requested during the batch
    pub cancelled: bool,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl BatchResult {
    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            total_files: self.records.len() + self.failures.len() + self.skipped,
            imported: self.records.len(),
            failed: self.failures.len(),
            skipped: self.skipped,
            duration_ms: self.duration_ms,
        }
    }
}

enum Outcome {
    Imported(ImportRecord),
    Failed(ImportFailure),
    Skipped,
}

/// Turns files into import records.
pub struct ImportProcessor {
    config: ImportConfig,
    canonicalizer: Canonicalizer,
    extractor: MetadataExtractor,
    cache: Option<Arc<PreviewCache>>,
}

impl ImportProcessor {
    pub fn new(config: ImportConfig) -> Self {
        let canonicalizer = CanonicalizerConfig::new().quality(config.quality).build();
        Self {
            config,
            canonicalizer,
            extractor: MetadataExtractor::new(),
            cache: None,
        }
    }

    /// Also store each hot preview and its metadata in a shared cache.
    pub fn with_cache(mut self, cache: Arc<PreviewCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Import a single file.
    pub fn process_file(&self, path: &Path) -> Result<ImportRecord, ImportFailure> {
        self.build_record(path).map_err(|error| ImportFailure {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Import files in parallel.
    ///
    /// Every file is attempted unless the token is cancelled, in which case no
    /// further files start. Failures are collected, never propagated.
    pub fn process_batch(
        &self,
        paths: &[PathBuf],
        events: &EventSender,
        cancel: &CancellationToken,
    ) -> BatchResult {
        let start_time = Instant::now();
        let total = paths.len();
        let completed = AtomicUsize::new(0);

        events.send(Event::Batch(BatchEvent::Started { total_files: total }));

        let outcomes: Vec<Outcome> = paths
            .par_iter()
            .map(|path| {
                if cancel.is_cancelled() {
                    return Outcome::Skipped;
                }

                let outcome = match self.process_file(path) {
                    Ok(record) => {
                        events.send(Event::File(FileEvent::Imported {
                            path: path.clone(),
                            hothash: record.hothash.clone(),
                        }));
                        Outcome::Imported(record)
                    }
                    Err(failure) => {
                        tracing::warn!(path = %path.display(), error = %failure.error, "import failed");
                        events.send(Event::File(FileEvent::Failed {
                            path: path.clone(),
                            message: failure.error.to_string(),
                        }));
                        Outcome::Failed(failure)
                    }
                };

                let current_completed = completed.fetch_add(1, Ordering::SeqCst) + 1;
                events.send(Event::Batch(BatchEvent::Progress(BatchProgress {
                    completed: current_completed,
                    total,
                    current_path: path.clone(),
                })));

                outcome
            })
            .collect();

        let mut result = BatchResult {
            records: Vec::new(),
            failures: Vec::new(),
            skipped: 0,
            cancelled: cancel.is_cancelled(),
            duration_ms: 0,
        };
        for outcome in outcomes {
            match outcome {
                Outcome::Imported(record) => result.records.push(record),
                Outcome::Failed(failure) => result.failures.push(failure),
                Outcome::Skipped => result.skipped += 1,
            }
        }
        result.duration_ms = start_time.elapsed().as_millis() as u64;

        if result.cancelled {
            events.send(Event::Batch(BatchEvent::Cancelled));
        }
        events.send(Event::Batch(BatchEvent::Completed {
            summary: result.summary(),
        }));

        tracing::info!(
            imported = result.records.len(),
            failed = result.failures.len(),
            skipped = result.skipped,
            duration_ms = result.duration_ms,
            "import batch finished"
        );
        result
    }

    /// Submit records to a backend one by one; returns the rejected ones.
    pub fn forward(
        &self,
        records: &[ImportRecord],
        backend: &dyn BackendClient,
    ) -> Vec<BackendFailure> {
        records
            .iter()
            .filter_map(|record| match backend.submit(record) {
                Ok(()) => None,
                Err(error) => {
                    tracing::warn!(hothash = %record.hothash, %error, "backend rejected record");
                    Some(BackendFailure {
                        hothash: record.hothash.clone(),
                        error,
                    })
                }
            })
            .collect()
    }

    fn build_record(&self, path: &Path) -> Result<ImportRecord, DecodeError> {
        let file_size = std::fs::metadata(path)
            .map_err(|source| DecodeError::Io {
                path: path.to_path_buf(),
                source,
            })?
            .len();

        let mut dimensions = vec![self.config.hot_dimension];
        if self.config.coldpreview {
            dimensions.push(self.config.cold_dimension);
        }
        let mut previews = self
            .canonicalizer
            .canonicalize_many(path, &dimensions)?
            .into_iter();

        let (hotpreview, hothash) = previews.next().ok_or(DecodeError::InvalidDimension {
            value: self.config.hot_dimension,
        })?;
        let coldpreview = previews.next().map(|(preview, _)| preview);
        let metadata = self.extractor.extract(path);

        if let Some(cache) = &self.cache {
            cache.put(hothash.clone(), Some(hotpreview.clone()), Some(metadata.clone()));
        }

        tracing::debug!(path = %path.display(), %hothash, "imported");

        Ok(ImportRecord {
            path: path.to_path_buf(),
            file_size,
            hothash,
            hotpreview,
            coldpreview,
            metadata,
        })
    }
}

impl Default for ImportProcessor {
    fn default() -> Self {
        Self::new(ImportConfig::default())
    }
}
