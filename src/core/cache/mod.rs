//! # Cache Module
//!
//! Keeps recently used previews and their metadata in memory, keyed by
//! hothash, within a byte budget.
//!
//! ## Eviction
//! - The budget covers image payloads only, measured by [`ImagePayload::size_estimate`]
//! - Least recently used images go first; their metadata goes with them
//! - Entries holding only metadata are never evicted
//! - A single image larger than the whole budget is admitted and immediately
//!   evicted on its own; nothing else is touched
//!
//! ## Sharing
//! There is no global instance. Construct one `PreviewCache`, wrap it in an
//! `Arc`, and hand it to whoever needs it. Every operation, including the
//! read-then-write of `put_image` and `put_metadata`, runs under one mutex.

use crate::core::metadata::PhotoMetadata;
use crate::core::preview::{CanonicalPreview, Hothash};
use image::DynamicImage;
use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Default budget: enough for a few thousand hot previews
pub const DEFAULT_CAPACITY_BYTES: usize = 64 * 1024 * 1024;

/// How much of the byte budget an image payload uses
pub trait ImagePayload: Send + Sync {
    fn size_estimate(&self) -> usize;
}

impl ImagePayload for CanonicalPreview {
    /// Encoded JPEG length
    fn size_estimate(&self) -> usize {
        self.size_bytes()
    }
}

impl ImagePayload for DynamicImage {
    /// Decoded pixel buffer: width x height x bytes per pixel
    fn size_estimate(&self) -> usize {
        self.width() as usize * self.height() as usize * self.color().bytes_per_pixel() as usize
    }
}

impl ImagePayload for Vec<u8> {
    fn size_estimate(&self) -> usize {
        self.len()
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Entries currently held, with or without an image
    pub entry_count: usize,
    /// Sum of the size estimates of held images
    pub total_image_bytes: usize,
    /// The byte budget
    pub capacity_bytes: usize,
}

struct ImageEntry<I, M> {
    image: Arc<I>,
    metadata: Option<Arc<M>>,
    image_bytes: usize,
}

/// A key lives in exactly one of the two maps.
struct CacheState<I, M> {
    /// Entries with an image, most recently used first
    images: LruCache<Hothash, ImageEntry<I, M>>,
    /// Entries with metadata only; outside eviction
    metadata_only: HashMap<Hothash, Arc<M>>,
    total_image_bytes: usize,
}

impl<I, M> CacheState<I, M> {
    fn new() -> Self {
        Self {
            images: LruCache::unbounded(),
            metadata_only: HashMap::new(),
            total_image_bytes: 0,
        }
    }

    fn take(&mut self, key: &Hothash) -> bool {
        if let Some(entry) = self.images.pop(key) {
            self.total_image_bytes -= entry.image_bytes;
            return true;
        }
        self.metadata_only.remove(key).is_some()
    }

    fn image(&self, key: &Hothash) -> Option<Arc<I>> {
        self.images.peek(key).map(|e| Arc::clone(&e.image))
    }

    fn metadata(&self, key: &Hothash) -> Option<Arc<M>> {
        match self.images.peek(key) {
            Some(entry) => entry.metadata.clone(),
            None => self.metadata_only.get(key).cloned(),
        }
    }

    fn len(&self) -> usize {
        self.images.len() + self.metadata_only.len()
    }
}

/// Byte-budgeted LRU cache of previews and metadata.
///
/// `I` is the image payload, `M` the metadata payload. Payloads are stored
/// behind `Arc` and never mutated; `put` replaces an entry wholesale.
pub struct PreviewCache<I: ImagePayload = CanonicalPreview, M = PhotoMetadata> {
    capacity_bytes: usize,
    state: Mutex<CacheState<I, M>>,
}

impl<I: ImagePayload, M> PreviewCache<I, M> {
    /// Create a cache holding at most `capacity_bytes` of image payloads.
    pub fn new(capacity_bytes: usize) -> Self {
        Self {
            capacity_bytes,
            state: Mutex::new(CacheState::new()),
        }
    }

    /// Look up an entry. A hit marks it most recently used; a miss changes nothing.
    pub fn get(&self, key: &Hothash) -> (Option<Arc<I>>, Option<Arc<M>>) {
        let mut state = self.lock();
        if let Some(entry) = state.images.get(key) {
            return (Some(Arc::clone(&entry.image)), entry.metadata.clone());
        }
        (None, state.metadata_only.get(key).cloned())
    }

    /// Insert or replace an entry, then evict down to the budget.
    ///
    /// Storing neither payload removes the entry.
    pub fn put(&self, key: Hothash, image: Option<I>, metadata: Option<M>) {
        let mut state = self.lock();
        self.store(&mut state, key, image.map(Arc::new), metadata.map(Arc::new));
    }

    /// Set the image of an entry, keeping any metadata already stored.
    pub fn put_image(&self, key: Hothash, image: I) {
        let mut state = self.lock();
        let metadata = state.metadata(&key);
        self.store(&mut state, key, Some(Arc::new(image)), metadata);
    }

    /// Set the metadata of an entry, keeping any image already stored.
    pub fn put_metadata(&self, key: Hothash, metadata: M) {
        let mut state = self.lock();
        let image = state.image(&key);
        self.store(&mut state, key, image, Some(Arc::new(metadata)));
    }

    /// Remove an entry; returns whether it existed.
    pub fn remove(&self, key: &Hothash) -> bool {
        self.lock().take(key)
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        state.images.clear();
        state.metadata_only.clear();
        state.total_image_bytes = 0;
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.lock();
        CacheStats {
            entry_count: state.len(),
            total_image_bytes: state.total_image_bytes,
            capacity_bytes: self.capacity_bytes,
        }
    }

    /// Whether an entry exists. Does not affect recency.
    pub fn contains(&self, key: &Hothash) -> bool {
        let state = self.lock();
        state.images.contains(key) || state.metadata_only.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity_bytes(&self) -> usize {
        self.capacity_bytes
    }

    fn store(
        &self,
        state: &mut CacheState<I, M>,
        key: Hothash,
        image: Option<Arc<I>>,
        metadata: Option<Arc<M>>,
    ) {
        state.take(&key);

        let Some(image) = image else {
            if let Some(metadata) = metadata {
                state.metadata_only.insert(key, metadata);
            }
            return;
        };

        let image_bytes = image.size_estimate();
        if image_bytes > self.capacity_bytes {
            tracing::debug!(
                hothash = %key,
                size = image_bytes,
                capacity = self.capacity_bytes,
                "evicted oversized preview on insert"
            );
            return;
        }

        state.total_image_bytes += image_bytes;
        state.images.put(
            key,
            ImageEntry {
                image,
                metadata,
                image_bytes,
            },
        );
        self.evict(state);
    }

    fn evict(&self, state: &mut CacheState<I, M>) {
        while state.total_image_bytes > self.capacity_bytes {
            let Some((key, entry)) = state.images.pop_lru() else {
                break;
            };
            state.total_image_bytes -= entry.image_bytes;
            tracing::debug!(
                hothash = %key,
                size = entry.image_bytes,
                total = state.total_image_bytes,
                "evicted least recently used preview"
            );
        }
    }

    /// A panic while holding the lock cannot leave the maps and the byte
    /// counter out of step, so a poisoned lock is safe to reuse.
    fn lock(&self) -> MutexGuard<'_, CacheState<I, M>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<I: ImagePayload, M> Default for PreviewCache<I, M> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY_BYTES)
    }
}

impl<I: ImagePayload, M> std::fmt::Debug for PreviewCache<I, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewCache")
            .field("stats", &self.stats())
            .finish()
    }
}
