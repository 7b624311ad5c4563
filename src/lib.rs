//! # Photo Import Core
//!
//! Content identification for photo imports: every photo gets a canonical
//! JPEG preview and a hothash (the SHA-256 of that preview), plus best-effort
//! EXIF metadata, and previews can be kept in a bounded in-memory cache.
//!
//! ## Core Philosophy
//! - **Identity from pixels** - Renaming, retagging or touching a file never changes its hothash
//! - **Never fail on metadata** - Broken tags cost a field, not the photo
//! - **Never abort a batch** - One corrupt file is reported, the rest import
//!
//! ## Architecture
//! - `core` - Codec, canonicalizer, metadata extractor, cache, import driver
//! - `events` - Event-driven progress reporting
//! - `error` - Typed error taxonomy
//! - `cli` - Command-line interface (binary only)

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{ImportError, Result};

/// Initialize tracing for the library
///
/// This should be called by the application entry point (CLI or GUI).
/// Filtering follows `RUST_LOG`.
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}
