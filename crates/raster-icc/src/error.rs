//! ICC error types.

use thiserror::Error;

/// Result type for ICC operations.
pub type IccResult<T> = Result<T, IccError>;

/// Errors that can occur during ICC operations.
#[derive(Debug, Error)]
pub enum IccError {
    /// Failed to create a profile.
    #[error("failed to create profile: {0}")]
    CreateFailed(String),

    /// Failed to create a transform between two profiles.
    #[error("failed to create transform: {0}")]
    TransformFailed(String),

    /// Invalid embedded profile data.
    #[error("invalid profile data: {0}")]
    InvalidProfile(String),

    /// The buffer layout cannot be converted.
    #[error("unsupported buffer layout: {0}")]
    Unsupported(String),

    /// Buffer length does not match the declared layout.
    #[error("buffer length mismatch: expected {expected} bytes, got {got}")]
    LayoutMismatch {
        /// Bytes the layout describes.
        expected: usize,
        /// Bytes actually provided.
        got: usize,
    },
}
