//! Error types for the snapshot storage layer

use thiserror::Error;

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur while reading or writing a field snapshot
#[derive(Error, Debug)]
pub enum StorageError {
    /// Underlying I/O failure (file open, read, write)
    #[error("I/O error: {source}")]
    Io {
        #[from]
        /// Source I/O error
        source: std::io::Error,
    },

    /// Fewer bytes were available than the fixed layout requires
    #[error("short read: expected {expected} bytes, got {actual}")]
    ShortRead {
        /// Bytes the layout requires
        expected: usize,
        /// Bytes actually available
        actual: usize,
    },

    /// The neuron array length implied by width*height did not match the
    /// number of records actually present in the stream
    #[error("neuron count mismatch: header implies {expected}, stream has {actual}")]
    SizeMismatch {
        /// width * height from the header
        expected: usize,
        /// Records actually read
        actual: usize,
    },
}

impl StorageError {
    /// Build a [`StorageError::ShortRead`]
    pub fn short_read(expected: usize, actual: usize) -> Self {
        Self::ShortRead { expected, actual }
    }

    /// Build a [`StorageError::SizeMismatch`]
    pub fn size_mismatch(expected: usize, actual: usize) -> Self {
        Self::SizeMismatch { expected, actual }
    }
}
