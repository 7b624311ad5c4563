//! Reading source files for decoding.
//!
//! Large files are memory-mapped to avoid the kernel-to-user copy; small
//! files go through a plain `fs::read`, which is cheaper below the threshold.

use crate::error::DecodeError;
use memmap2::Mmap;
use std::fs::File;
use std::path::Path;

/// Minimum file size to use memory-mapped I/O (1MB)
const MMAP_THRESHOLD: u64 = 1024 * 1024;

/// Read a whole source file, memory-mapping it when it is large.
pub fn read_file_bytes(path: &Path) -> Result<FileBytes, DecodeError> {
    let io_error = |source| DecodeError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_error)?;
    let len = file.metadata().map_err(io_error)?.len();

    if len == 0 {
        return Err(DecodeError::EmptyImage {
            path: path.to_path_buf(),
        });
    }

    if len >= MMAP_THRESHOLD {
        // SAFETY: the map is read-only and owns the file handle for its lifetime.
        // A concurrent truncation by another process is outside our control;
        // the decoder then sees a truncated image and reports a DecodeError.
        let mmap = unsafe { Mmap::map(&file) }.map_err(io_error)?;
        Ok(FileBytes::Mmap(mmap))
    } else {
        let bytes = std::fs::read(path).map_err(io_error)?;
        Ok(FileBytes::Vec(bytes))
    }
}

/// File bytes that may be either owned or memory-mapped.
pub enum FileBytes {
    /// Standard heap-allocated bytes
    Vec(Vec<u8>),
    /// Memory-mapped bytes (zero-copy from disk)
    Mmap(Mmap),
}

impl AsRef<[u8]> for FileBytes {
    fn as_ref(&self) -> &[u8] {
        match self {
            FileBytes::Vec(v) => v,
            FileBytes::Mmap(m) => m,
        }
    }
}

impl std::ops::Deref for FileBytes {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.as_ref()
    }
}
