//! Error types for the raster engine.
//!
//! A single taxonomy covers every fallible operation in the engine:
//! container construction, format transforms, colour conversion and
//! resampling. Collaborator crates keep their own error types and are
//! folded into [`Error::ColorConversionFailed`] at the boundary.
//!
//! # Usage
//!
//! ```rust
//! use raster_core::{Error, Result};
//!
//! fn check_components(count: usize) -> Result<()> {
//!     if !(1..=4).contains(&count) {
//!         return Err(Error::invalid_argument(format!(
//!             "component count {count} outside 1..=4"
//!         )));
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during raster engine operations.
///
/// # Categories
///
/// - **Argument errors**: [`InvalidArgument`](Error::InvalidArgument) —
///   bad component counts, bad channel indices, mismatched image sizes.
/// - **Allocation errors**: [`AllocationFailed`](Error::AllocationFailed) —
///   a buffer allocation or reallocation was refused.
/// - **Loader errors**: [`UnsupportedBitDepth`](Error::UnsupportedBitDepth) —
///   a decoder reported a bit depth the engine cannot ingest.
/// - **Colour errors**: [`ColorConversionFailed`](Error::ColorConversionFailed).
/// - **Control flow**: [`Cancelled`](Error::Cancelled) — a progress callback
///   requested cancellation.
#[derive(Debug, Error)]
pub enum Error {
    /// An argument was outside the accepted domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Memory allocation failed.
    ///
    /// Returned when the system cannot allocate enough memory for a pixel
    /// buffer. This typically happens with very large images.
    #[error("failed to allocate {requested} bytes")]
    AllocationFailed {
        /// Bytes requested.
        requested: usize,
    },

    /// A loader reported a bit depth with no storage representation.
    #[error("unsupported bit depth: {bits}")]
    UnsupportedBitDepth {
        /// Bits per component as reported by the loader.
        bits: u32,
    },

    /// The colour-management collaborator reported a failure.
    #[error("colour conversion failed: {0}")]
    ColorConversionFailed(String),

    /// A progress callback requested cancellation.
    #[error("operation cancelled")]
    Cancelled,

    /// Generic error with a custom message.
    ///
    /// Catch-all for failures that do not fit another category.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Creates an [`Error::InvalidArgument`] error.
    #[inline]
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Creates an [`Error::AllocationFailed`] error.
    #[inline]
    pub fn allocation_failed(requested: usize) -> Self {
        Self::AllocationFailed { requested }
    }

    /// Creates an [`Error::Other`] error.
    #[inline]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Returns `true` if this is an argument-domain error.
    #[inline]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Returns `true` if this is an allocation error.
    #[inline]
    pub fn is_allocation_error(&self) -> bool {
        matches!(self, Self::AllocationFailed { .. })
    }

    /// Returns `true` if the operation was cancelled by its caller.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<raster_icc::IccError> for Error {
    fn from(err: raster_icc::IccError) -> Self {
        Self::ColorConversionFailed(err.to_string())
    }
}
