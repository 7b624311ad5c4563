//! # Core Module
//!
//! The GUI-agnostic import engine.
//!
//! ## Modules
//! - `codec` - Decodes source images and encodes JPEG previews
//! - `preview` - Canonical previews and their hothash identifiers
//! - `metadata` - Extracts EXIF metadata from photos
//! - `cache` - Byte-budgeted LRU cache of previews and metadata
//! - `import` - Orchestrates per-file and batch imports

pub mod cache;
pub mod codec;
pub mod import;
pub mod metadata;
pub mod preview;

// Re-export commonly used types
pub use cache::{CacheStats, PreviewCache};
pub use import::{ImportConfig, ImportProcessor, ImportRecord};
pub use metadata::{CameraSettings, CoreMetadata, MetadataExtractor, PhotoMetadata};
pub use preview::{CanonicalPreview, Canonicalizer, Hothash};
