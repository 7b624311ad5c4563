//! Event type definitions for progress reporting.

use crate::core::preview::Hothash;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted while importing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Batch-level events
    Batch(BatchEvent),
    /// Per-file outcomes
    File(FileEvent),
}

/// Events for a whole import batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BatchEvent {
    /// The batch has started
    Started { total_files: usize },
    /// Progress update after each file
    Progress(BatchProgress),
    /// Every file was attempted
    Completed { summary: BatchSummary },
    /// The batch was cancelled; files already started still finish
    Cancelled,
}

/// Progress information during a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchProgress {
    /// Files finished so far, successful or not
    pub completed: usize,
    /// Total number of files in the batch
    pub total: usize,
    /// File that just finished
    pub current_path: PathBuf,
}

/// Outcome of a single file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FileEvent {
    /// Previews and metadata were produced
    Imported { path: PathBuf, hothash: Hothash },
    /// The file could not be canonicalized; the batch continues
    Failed { path: PathBuf, message: String },
}

/// Summary of batch results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Files in the batch
    pub total_files: usize,
    /// Files turned into records
    pub imported: usize,
    /// Files that failed
    pub failed: usize,
    /// Files never started because of cancellation
    pub skipped: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}
