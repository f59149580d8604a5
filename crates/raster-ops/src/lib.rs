//! # raster-ops
//!
//! Editing operations for the raster image engine.
//!
//! Everything that mutates pixels lives here:
//!
//! - [`parallel_for`] - the concurrent index loop driving the inner loops
//! - [`convert_component_type`] / [`create_promoted`] - storage type change
//! - [`convert_profile`], [`srgb_to_linear`], [`linear_to_srgb`] - the
//!   colour pipeline
//! - [`resample`] and friends - separable Lanczos resampling in linear
//!   light
//! - [`Editor`] - the editing-session façade
//!
//! # Example
//!
//! ```rust
//! use raster_core::{ComponentType, Image};
//! use raster_ops::{
//!     convert_component_type, progress_ignored, resample, ResampleAlgorithm,
//! };
//!
//! let mut img = Image::rgba8(16, 16).unwrap();
//! convert_component_type(&mut img, ComponentType::F16).unwrap();
//! resample(
//!     &mut img,
//!     ResampleAlgorithm::Lanczos,
//!     2.0,
//!     32,
//!     32,
//!     1,
//!     false,
//!     progress_ignored(),
//! )
//! .unwrap();
//! assert_eq!((img.width(), img.height()), (32, 32));
//! ```
//!
//! # Concurrency
//!
//! Operations take `&mut Image` and therefore cannot race with anything
//! else touching the same image. Internally they fan rows out over
//! [`parallel_for`]; between passes there is a strict happens-before.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod color;
mod editor;
mod parallel;
mod progress;
mod promote;
mod resample;

pub use color::{convert_profile, linear_to_srgb, srgb_to_linear};
pub use editor::Editor;
pub use parallel::{parallel_for, MAX_WORKERS};
pub use progress::progress_ignored;
pub use promote::{convert_component_type, create_promoted};
pub use resample::{
    create_downsampled, create_resampled, lanczos, resample, ResampleAlgorithm,
};

// The engine-wide error taxonomy is defined in raster-core; operations in
// this crate return it directly.
pub use raster_core::{Error, Result};
