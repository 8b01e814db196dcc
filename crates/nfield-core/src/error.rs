//! Error types for the field simulation layer

use thiserror::Error;

/// Result type for field operations
pub type Result<T> = std::result::Result<T, FieldError>;

/// Errors that can occur while constructing or persisting a field
#[derive(Error, Debug)]
pub enum FieldError {
    /// `width` or `height` was zero
    #[error("invalid dimensions: width={width}, height={height} (both must be nonzero)")]
    InvalidDimensions {
        /// Requested width
        width: u16,
        /// Requested height
        height: u16,
    },

    /// Neighborhood radius was outside the supported domain
    #[error("invalid neighborhood radius: {radius} (must be 1 or 2)")]
    InvalidRadius {
        /// Requested radius
        radius: u8,
    },

    /// A snapshot could not be read or written
    #[error("storage error: {0}")]
    Storage(#[from] nfield_storage::StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FieldError::InvalidRadius { radius: 9 };
        assert!(format!("{err}").contains("must be 1 or 2"));
    }
}
