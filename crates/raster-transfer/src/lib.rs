//! # raster-transfer
//!
//! Transfer functions for the raster image engine.
//!
//! This crate provides the sRGB piecewise transfer function in both
//! directions plus the precomputed 8-bit conversion table used by the
//! `u8` fast paths:
//!
//! - [`srgb::eotf`] / [`srgb::oetf`] - scalar sRGB decode/encode
//! - [`srgb_u8_table`] - 256-entry lookup table for byte images
//!
//! # Example
//!
//! ```rust
//! use raster_transfer::{srgb, srgb_u8_table};
//!
//! // Scalar conversion
//! let linear = srgb::eotf(188.0 / 255.0);
//!
//! // Table lookup gives the quantized result directly
//! assert_eq!(srgb_u8_table()[188].linear, (linear * 255.0).round() as u8);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod srgb;
pub mod table;

pub use table::{srgb_u8_table, SrgbTableEntry};
