//! # raster-icc
//!
//! ICC colour management for the raster image engine, backed by Little CMS.
//!
//! This crate is the engine's colour collaborator:
//!
//! - [`ColorProfile`] - shared profile handles (standard spaces or embedded
//!   ICC data) with `is_srgb` / `is_linear` classification and linear
//!   sibling derivation
//! - [`apply_conversion`] - in-place conversion of a borrowed interleaved
//!   pixel buffer between two profiles
//!
//! Handles are plain data and freely shareable across threads; Little CMS
//! objects only exist for the duration of a conversion.
//!
//! # Example
//!
//! ```rust
//! use raster_icc::ColorProfile;
//!
//! let srgb = ColorProfile::srgb();
//! let linear = srgb.linear_sibling().unwrap();
//! assert!(linear.is_linear());
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod convert;
mod error;
mod profile;

pub use convert::{apply_conversion, BufferLayout};
pub use error::{IccError, IccResult};
pub use profile::ColorProfile;
