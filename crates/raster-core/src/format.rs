//! Pixel format descriptors.
//!
//! This module provides the runtime description of how a pixel is stored:
//!
//! - [`ComponentType`] - Numeric representation of a single component
//!   (U8, F16, F32)
//! - [`PixelFormat`] - Component type + component count + alpha flag
//!
//! # Usage
//!
//! ```rust
//! use raster_core::{ComponentType, PixelFormat};
//!
//! let fmt = PixelFormat::new(ComponentType::F16, 4).unwrap();
//! assert_eq!(fmt.pixel_size(), 8); // 4 components * 2 bytes
//! assert!(fmt.has_alpha());        // 4 components imply alpha
//!
//! // The canonical 8-bit RGBA format
//! assert_eq!(PixelFormat::RGBA8.pixel_size(), 4);
//! ```

use crate::{Error, Result};

/// Numeric representation of a single pixel component.
///
/// Integer components are normalised on access (`U8` maps `[0, 255]` to
/// `[0.0, 1.0]`); float components carry their numeric value unchanged.
/// Signed integer channels are not representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ComponentType {
    /// 8-bit unsigned integer, normalised to `[0, 1]`.
    #[default]
    U8,
    /// 16-bit half-precision IEEE 754 float.
    F16,
    /// 32-bit single-precision IEEE 754 float.
    F32,
}

impl ComponentType {
    /// Size of one component in bytes.
    #[inline]
    pub const fn size(&self) -> usize {
        match self {
            Self::U8 => 1,
            Self::F16 => 2,
            Self::F32 => 4,
        }
    }

    /// Number of bits per component.
    #[inline]
    pub const fn bits(&self) -> u32 {
        (self.size() as u32) * 8
    }

    /// Whether this is a floating-point representation.
    #[inline]
    pub const fn is_float(&self) -> bool {
        matches!(self, Self::F16 | Self::F32)
    }
}

/// Immutable description of a pixel: component type, component count and
/// alpha flag.
///
/// Components of one pixel are interleaved in memory and share a single
/// [`ComponentType`]. The alpha flag records whether the last component is
/// coverage rather than colour; by default a format has alpha iff it has
/// 2 or 4 components (luminance+alpha, RGBA).
///
/// # Example
///
/// ```rust
/// use raster_core::{ComponentType, PixelFormat};
///
/// let rgb = PixelFormat::new(ComponentType::F32, 3).unwrap();
/// assert!(!rgb.has_alpha());
/// assert_eq!(rgb.pixel_size(), 12);
///
/// let la = PixelFormat::with_alpha(ComponentType::U8, 2, true).unwrap();
/// assert!(la.has_alpha());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelFormat {
    component_type: ComponentType,
    num_components: usize,
    has_alpha: bool,
}

impl PixelFormat {
    /// The canonical 8-bit RGBA format.
    pub const RGBA8: PixelFormat = PixelFormat {
        component_type: ComponentType::U8,
        num_components: 4,
        has_alpha: true,
    };

    /// Creates a pixel format with the default alpha rule
    /// (alpha iff 2 or 4 components).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] when `num_components` is outside
    /// `1..=4`.
    pub fn new(component_type: ComponentType, num_components: usize) -> Result<Self> {
        Self::with_alpha(
            component_type,
            num_components,
            matches!(num_components, 2 | 4),
        )
    }

    /// Creates a pixel format with an explicit alpha flag.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] when `num_components` is outside
    /// `1..=4`.
    pub fn with_alpha(
        component_type: ComponentType,
        num_components: usize,
        has_alpha: bool,
    ) -> Result<Self> {
        if !(1..=4).contains(&num_components) {
            return Err(Error::invalid_argument(format!(
                "pixel format component count {num_components} outside 1..=4"
            )));
        }
        Ok(Self {
            component_type,
            num_components,
            has_alpha,
        })
    }

    /// Maps a loader-reported bit depth to a storage format.
    ///
    /// 8-bit data is stored as [`ComponentType::U8`], 16-bit as
    /// [`ComponentType::F16`] and 32-bit as [`ComponentType::F32`]; this is
    /// the contract decoders use to hand buffers to the engine.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedBitDepth`] for any other depth.
    ///
    /// # Example
    ///
    /// ```rust
    /// use raster_core::{ComponentType, PixelFormat};
    ///
    /// let fmt = PixelFormat::from_bit_depth(16, 3).unwrap();
    /// assert_eq!(fmt.component_type(), ComponentType::F16);
    /// assert!(PixelFormat::from_bit_depth(12, 3).is_err());
    /// ```
    pub fn from_bit_depth(bits: u32, num_components: usize) -> Result<Self> {
        let component_type = match bits {
            8 => ComponentType::U8,
            16 => ComponentType::F16,
            32 => ComponentType::F32,
            _ => return Err(Error::UnsupportedBitDepth { bits }),
        };
        Self::new(component_type, num_components)
    }

    /// Returns the component representation.
    #[inline]
    pub const fn component_type(&self) -> ComponentType {
        self.component_type
    }

    /// Returns the number of interleaved components per pixel.
    #[inline]
    pub const fn num_components(&self) -> usize {
        self.num_components
    }

    /// Returns whether the last component is an alpha channel.
    #[inline]
    pub const fn has_alpha(&self) -> bool {
        self.has_alpha
    }

    /// Size of one component in bytes.
    #[inline]
    pub const fn component_size(&self) -> usize {
        self.component_type.size()
    }

    /// Size of one pixel in bytes.
    #[inline]
    pub const fn pixel_size(&self) -> usize {
        self.component_size() * self.num_components
    }

    /// Returns a copy of this format with a different component type.
    #[inline]
    pub const fn with_component_type(&self, component_type: ComponentType) -> Self {
        Self {
            component_type,
            num_components: self.num_components,
            has_alpha: self.has_alpha,
        }
    }

    /// Returns a copy of this format with a different component count,
    /// re-deriving the alpha flag from the default rule.
    pub fn with_num_components(&self, num_components: usize) -> Result<Self> {
        Self::new(self.component_type, num_components)
    }
}

impl Default for PixelFormat {
    fn default() -> Self {
        Self::RGBA8
    }
}
