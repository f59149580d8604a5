//! # raster-core
//!
//! Core types for the raster image engine.
//!
//! This crate provides the foundational pieces every other raster-rs crate
//! builds on:
//!
//! - [`PixelFormat`] / [`ComponentType`] - how pixels are stored
//! - [`PixelVec`] / [`HalfVec`] - transient interchange values
//! - [`PixelBuffer`] - aligned, fallibly-allocated raw storage
//! - [`Image`] - the 2D/3D container with typed pixel access, colour tags
//!   and channel surgery
//! - [`ImageCollection`] - a small bounded sequence of shared images
//! - [`Error`] - the engine-wide error taxonomy
//!
//! ## Crate structure
//!
//! ```text
//! raster-icc  (colour profiles, lcms2)
//!    ^
//!    |
//! raster-core (this crate)
//!    ^
//!    |
//!    +-- raster-transfer (sRGB transfer functions + u8 table)
//!    +-- raster-ops      (parallel loops, format transforms, resampling)
//! ```
//!
//! ## Access semantics
//!
//! Reads clamp coordinates to the image bounds (edge extension); writes
//! outside the bounds are silently dropped. Both directions convert
//! through [`PixelVec`], with monomorphised fast paths per component type
//! and count. See [`access`] for the details.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod access;
pub mod buffer;
pub mod collection;
pub mod error;
pub mod format;
pub mod image;
pub mod pixel;

pub use access::Extent;
pub use buffer::PixelBuffer;
pub use collection::{ImageCollection, MAX_IMAGES};
pub use error::{Error, Result};
pub use format::{ComponentType, PixelFormat};
pub use image::Image;
pub use pixel::{HalfVec, PixelVec, Texel};

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```
/// use raster_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::access::Extent;
    pub use crate::buffer::PixelBuffer;
    pub use crate::collection::ImageCollection;
    pub use crate::error::{Error, Result};
    pub use crate::format::{ComponentType, PixelFormat};
    pub use crate::image::Image;
    pub use crate::pixel::{HalfVec, PixelVec, Texel};
}
