//! The image container.
//!
//! [`Image`] owns a contiguous pixel buffer together with the metadata the
//! engine needs to interpret it: a [`PixelFormat`], three dimensions, an
//! optional colour-profile handle and the colour tags (`srgb`, `linear`,
//! `hdr`) describing the data currently in the buffer.
//!
//! # Memory layout
//!
//! Pixels are interleaved, row-major within a plane, planes stacked along
//! Z. The element at `(x, y, z)` begins at byte offset
//! `(z*width*height + y*width + x) * pixel_size`. There is no row padding:
//! `row_bytes == width * pixel_size` exactly.
//!
//! # Colour tags
//!
//! When a profile handle is present the tags mirror it
//! (`srgb == profile.is_srgb()`, `linear == profile.is_linear()`); every
//! assignment re-derives them. Fast-path transfer conversions drop the
//! handle and set the tags explicitly — the data then no longer obeys any
//! concrete profile. `hdr` marks data that may exceed `[0, 1]` and is only
//! valid for float formats.
//!
//! # Ownership
//!
//! The buffer is exclusively owned by the image; mutation requires `&mut`.
//! Share settled images as `Arc<Image>` (see
//! [`ImageCollection`](crate::ImageCollection)); cloning is a deep copy of
//! the pixels with a shared profile handle.
//!
//! # Usage
//!
//! ```rust
//! use raster_core::{ComponentType, Image, PixelFormat, PixelVec};
//!
//! let fmt = PixelFormat::new(ComponentType::F32, 3).unwrap();
//! let mut img = Image::new(fmt, 16, 16, 1);
//! img.set_pixel(PixelVec::new(1.0, 0.5, 0.25, 0.0), 3, 4, 0);
//! let p = img.get_pixel(3, 4, 0);
//! assert_eq!(p.r, 1.0);
//!
//! // Reads clamp to the nearest in-bounds pixel
//! assert_eq!(img.get_pixel(-5, 4, 0).r, img.get_pixel(0, 4, 0).r);
//! ```

use crate::access::{self, Extent};
use crate::{ComponentType, Error, PixelBuffer, PixelFormat, PixelVec, Result};
use raster_icc::ColorProfile;

/// A 2D or 3D raster image with format-aware pixel access.
///
/// See the [module documentation](self) for layout and ownership rules.
#[derive(Clone)]
pub struct Image {
    format: PixelFormat,
    width: usize,
    height: usize,
    depth: usize,
    contents: PixelBuffer,
    profile: Option<ColorProfile>,
    srgb: bool,
    linear: bool,
    hdr: bool,
}

impl Image {
    /// Creates a zero-filled image.
    ///
    /// Dimensions below 1 are clamped to 1.
    ///
    /// # Panics
    ///
    /// Panics if allocation fails (extremely large images); use
    /// [`try_new`](Self::try_new) to handle that as an error.
    pub fn new(format: PixelFormat, width: usize, height: usize, depth: usize) -> Self {
        Self::try_new(format, width, height, depth)
            .unwrap_or_else(|_| panic!("image allocation failed"))
    }

    /// Creates a zero-filled image, reporting allocation failure.
    ///
    /// Dimensions below 1 are clamped to 1.
    pub fn try_new(
        format: PixelFormat,
        width: usize,
        height: usize,
        depth: usize,
    ) -> Result<Self> {
        let width = width.max(1);
        let height = height.max(1);
        let depth = depth.max(1);
        let contents = PixelBuffer::try_zeroed(width * height * depth * format.pixel_size())?;
        Ok(Self {
            format,
            width,
            height,
            depth,
            contents,
            profile: None,
            srgb: false,
            linear: false,
            hdr: false,
        })
    }

    /// Creates a white-filled 8-bit RGBA image with depth 1.
    ///
    /// The blank canvas constructor: contents are `0xFF` everywhere and the
    /// data is tagged linear.
    ///
    /// # Example
    ///
    /// ```rust
    /// use raster_core::Image;
    ///
    /// let img = Image::rgba8(4, 4).unwrap();
    /// assert_eq!(img.get_pixel(0, 0, 0).a, 1.0);
    /// assert!(img.is_linear());
    /// ```
    pub fn rgba8(width: usize, height: usize) -> Result<Self> {
        let width = width.max(1);
        let height = height.max(1);
        let format = PixelFormat::RGBA8;
        let contents = PixelBuffer::try_filled(width * height * format.pixel_size(), 0xFF)?;
        Ok(Self {
            format,
            width,
            height,
            depth: 1,
            contents,
            profile: None,
            srgb: false,
            linear: true,
            hdr: false,
        })
    }

    /// Creates an image from a raw decoded buffer.
    ///
    /// This is the contract loaders use to hand pixels to the engine: the
    /// bytes are copied into engine-owned storage, and the colour state is
    /// taken from the embedded profile when one is present, otherwise from
    /// the `srgb`/`linear` hints.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `contents` is not exactly
    ///   `width * height * depth * pixel_size` bytes, or if `hdr` is
    ///   requested for an integer format.
    /// - [`Error::AllocationFailed`] if the copy cannot be allocated.
    #[allow(clippy::too_many_arguments)]
    pub fn from_raw(
        contents: &[u8],
        format: PixelFormat,
        width: usize,
        height: usize,
        depth: usize,
        profile: Option<ColorProfile>,
        srgb: bool,
        linear: bool,
        hdr: bool,
    ) -> Result<Self> {
        let width = width.max(1);
        let height = height.max(1);
        let depth = depth.max(1);
        let expected = width * height * depth * format.pixel_size();
        if contents.len() != expected {
            return Err(Error::invalid_argument(format!(
                "raw buffer holds {} bytes, expected {expected}",
                contents.len()
            )));
        }
        if hdr && !format.component_type().is_float() {
            return Err(Error::invalid_argument(
                "hdr contents require a float component type",
            ));
        }
        let mut image = Self {
            format,
            width,
            height,
            depth,
            contents: PixelBuffer::from_bytes(contents)?,
            profile: None,
            srgb,
            linear,
            hdr,
        };
        if let Some(profile) = profile {
            image.assign_profile(profile);
        }
        Ok(image)
    }

    /// Returns the pixel format.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Returns the width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the depth in planes (1 for 2D images).
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns the dimensions as an [`Extent`].
    #[inline]
    pub fn extent(&self) -> Extent {
        Extent::new(self.width, self.height, self.depth)
    }

    /// Total number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width * self.height * self.depth
    }

    /// Size of the pixel buffer in bytes.
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.contents.len()
    }

    /// Borrows the raw contents.
    #[inline]
    pub fn data(&self) -> &[u8] {
        self.contents.as_bytes()
    }

    /// Mutably borrows the raw contents.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        self.contents.as_bytes_mut()
    }

    /// Borrows the underlying buffer for typed views.
    #[inline]
    pub fn buffer(&self) -> &PixelBuffer {
        &self.contents
    }

    /// Mutably borrows the underlying buffer for typed views.
    #[inline]
    pub fn buffer_mut(&mut self) -> &mut PixelBuffer {
        &mut self.contents
    }

    /// Returns the colour-profile handle, if any.
    #[inline]
    pub fn profile(&self) -> Option<&ColorProfile> {
        self.profile.as_ref()
    }

    /// Returns `true` if the contents are tagged as sRGB-encoded.
    #[inline]
    pub fn is_srgb(&self) -> bool {
        self.srgb
    }

    /// Returns `true` if the contents are tagged as linear light.
    #[inline]
    pub fn is_linear(&self) -> bool {
        self.linear
    }

    /// Returns `true` if the contents may exceed `[0, 1]`.
    #[inline]
    pub fn is_hdr(&self) -> bool {
        self.hdr
    }

    /// Marks the contents as high dynamic range.
    ///
    /// Ignored for integer formats, which cannot hold out-of-range values.
    pub fn set_hdr(&mut self, hdr: bool) {
        self.hdr = hdr && self.format.component_type().is_float();
    }

    /// Assigns a colour profile and re-derives the `srgb`/`linear` tags
    /// from it. No pixel data is touched.
    pub fn assign_profile(&mut self, profile: ColorProfile) {
        self.srgb = profile.is_srgb();
        self.linear = profile.is_linear();
        self.profile = Some(profile);
    }

    /// Parses embedded ICC data and assigns the resulting profile.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ColorConversionFailed`] when the data is not a
    /// valid profile.
    pub fn set_icc_profile_data(&mut self, icc: &[u8]) -> Result<()> {
        let profile = ColorProfile::from_icc(icc)?;
        self.assign_profile(profile);
        Ok(())
    }

    /// Removes the profile handle, leaving the colour tags as they are.
    ///
    /// Used by conversion code that remembers the handle to restore later.
    pub fn take_profile(&mut self) -> Option<ColorProfile> {
        self.profile.take()
    }

    /// Drops the profile handle and sets the transfer tags explicitly.
    ///
    /// This is the exit state of the fast-path transfer conversions: after
    /// an sRGB → linear pass the data no longer obeys a concrete profile.
    pub fn set_transfer_state(&mut self, srgb: bool, linear: bool) {
        self.profile = None;
        self.srgb = srgb;
        self.linear = linear;
    }

    /// Reads the pixel at `(x, y, z)`.
    ///
    /// Coordinates are clamped to the image bounds; see
    /// [`access`](crate::access) for the conversion rules.
    #[inline]
    pub fn get_pixel(&self, x: i64, y: i64, z: i64) -> PixelVec {
        access::read_pixel(&self.contents, self.format, self.extent(), x, y, z)
    }

    /// Writes the pixel at `(x, y, z)`. Out-of-bounds writes are ignored.
    #[inline]
    pub fn set_pixel(&mut self, p: PixelVec, x: i64, y: i64, z: i64) {
        let format = self.format;
        let extent = self.extent();
        access::write_pixel(&mut self.contents, format, extent, p, x, y, z);
    }

    /// Reads a pixel interpreting the buffer with an explicit shape.
    ///
    /// Used by in-place transforms while the stored format is in flux.
    #[inline]
    pub fn get_pixel_as(
        &self,
        num_components: usize,
        component_type: ComponentType,
        x: i64,
        y: i64,
        z: i64,
    ) -> PixelVec {
        let format = override_format(component_type, num_components);
        access::read_pixel(&self.contents, format, self.extent(), x, y, z)
    }

    /// Writes a pixel interpreting the buffer with an explicit shape.
    #[inline]
    pub fn set_pixel_as(
        &mut self,
        p: PixelVec,
        num_components: usize,
        component_type: ComponentType,
        x: i64,
        y: i64,
        z: i64,
    ) {
        let format = override_format(component_type, num_components);
        let extent = self.extent();
        access::write_pixel(&mut self.contents, format, extent, p, x, y, z);
    }

    /// Replaces storage and geometry in one invariant-checked step.
    ///
    /// Used by operations that build a replacement buffer (component-type
    /// change, resampling). Returns the previous buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if any dimension is zero or the
    /// buffer length does not match the new geometry; the image is
    /// unchanged in that case.
    pub fn adopt(
        &mut self,
        format: PixelFormat,
        width: usize,
        height: usize,
        depth: usize,
        contents: PixelBuffer,
    ) -> Result<PixelBuffer> {
        if width == 0 || height == 0 || depth == 0 {
            return Err(Error::invalid_argument("image dimensions must be >= 1"));
        }
        let expected = width * height * depth * format.pixel_size();
        if contents.len() != expected {
            return Err(Error::invalid_argument(format!(
                "adopted buffer holds {} bytes, expected {expected}",
                contents.len()
            )));
        }
        self.format = format;
        self.width = width;
        self.height = height;
        self.depth = depth;
        Ok(std::mem::replace(&mut self.contents, contents))
    }

    /// Changes the number of components per pixel in place.
    ///
    /// Growing reallocates first and rewrites pixels in reverse `(z, y, x)`
    /// order so reads and writes of the same pixel never alias; new
    /// channels receive `fill`. Shrinking rewrites forward and truncates
    /// afterwards. The alpha flag is re-derived from the default rule.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `num_components` is outside `1..=4`.
    /// - [`Error::AllocationFailed`] if growth is refused.
    pub fn set_channel_count(&mut self, num_components: usize, fill: f32) -> Result<()> {
        let old_n = self.format.num_components();
        let new_format = self.format.with_num_components(num_components)?;
        if num_components == old_n {
            return Ok(());
        }
        let ty = self.format.component_type();
        let count = self.pixel_count();
        let new_len = count * new_format.pixel_size();

        if num_components > old_n {
            self.contents.resize(new_len, 0)?;
            self.format = new_format;
            for z in (0..self.depth).rev() {
                for y in (0..self.height).rev() {
                    for x in (0..self.width).rev() {
                        let (xi, yi, zi) = (x as i64, y as i64, z as i64);
                        let mut p = self.get_pixel_as(old_n, ty, xi, yi, zi);
                        for c in old_n..num_components {
                            p.set_component(c, fill);
                        }
                        self.set_pixel_as(p, num_components, ty, xi, yi, zi);
                    }
                }
            }
        } else {
            for z in 0..self.depth {
                for y in 0..self.height {
                    for x in 0..self.width {
                        let (xi, yi, zi) = (x as i64, y as i64, z as i64);
                        let p = self.get_pixel_as(old_n, ty, xi, yi, zi);
                        self.set_pixel_as(p, num_components, ty, xi, yi, zi);
                    }
                }
            }
            self.contents.truncate(new_len);
            self.format = new_format;
        }
        Ok(())
    }

    /// Copies one channel from another, identically-sized image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] on dimension mismatch or a
    /// channel index outside either format.
    pub fn set_channel(
        &mut self,
        dst_channel: usize,
        src: &Image,
        src_channel: usize,
    ) -> Result<()> {
        if (self.width, self.height, self.depth) != (src.width, src.height, src.depth) {
            return Err(Error::invalid_argument(format!(
                "channel copy between {}x{}x{} and {}x{}x{}",
                self.width, self.height, self.depth, src.width, src.height, src.depth
            )));
        }
        check_channel(dst_channel, self.format)?;
        check_channel(src_channel, src.format)?;
        for z in 0..self.depth as i64 {
            for y in 0..self.height as i64 {
                for x in 0..self.width as i64 {
                    let v = src.get_pixel(x, y, z).component(src_channel);
                    let mut p = self.get_pixel(x, y, z);
                    p.set_component(dst_channel, v);
                    self.set_pixel(p, x, y, z);
                }
            }
        }
        Ok(())
    }

    /// Copies one channel onto another within this image.
    ///
    /// Copying a channel onto itself is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for a channel index outside the
    /// format.
    pub fn copy_channel(&mut self, dst_channel: usize, src_channel: usize) -> Result<()> {
        check_channel(dst_channel, self.format)?;
        check_channel(src_channel, self.format)?;
        if dst_channel == src_channel {
            return Ok(());
        }
        for z in 0..self.depth as i64 {
            for y in 0..self.height as i64 {
                for x in 0..self.width as i64 {
                    let mut p = self.get_pixel(x, y, z);
                    let v = p.component(src_channel);
                    p.set_component(dst_channel, v);
                    self.set_pixel(p, x, y, z);
                }
            }
        }
        Ok(())
    }
}

#[inline]
fn override_format(component_type: ComponentType, num_components: usize) -> PixelFormat {
    PixelFormat::new(component_type, num_components)
        .unwrap_or_else(|_| PixelFormat::new(component_type, 4).expect("valid count"))
}

#[inline]
fn check_channel(index: usize, format: PixelFormat) -> Result<()> {
    if index >= format.num_components() {
        return Err(Error::invalid_argument(format!(
            "channel index {index} outside format with {} components",
            format.num_components()
        )));
    }
    Ok(())
}

impl std::fmt::Debug for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("depth", &self.depth)
            .field("format", &self.format)
            .field("srgb", &self.srgb)
            .field("linear", &self.linear)
            .field("hdr", &self.hdr)
            .field("profile", &self.profile.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgba_2x2() -> Image {
        // {red, green, blue, white}
        let bytes = [
            255, 0, 0, 255, //
            0, 255, 0, 255, //
            0, 0, 255, 255, //
            255, 255, 255, 255,
        ];
        Image::from_raw(&bytes, PixelFormat::RGBA8, 2, 2, 1, None, true, false, false).unwrap()
    }

    #[test]
    fn test_new_clamps_dimensions() {
        let fmt = PixelFormat::new(ComponentType::U8, 3).unwrap();
        let img = Image::new(fmt, 0, 5, 0);
        assert_eq!((img.width(), img.height(), img.depth()), (1, 5, 1));
        assert_eq!(img.byte_len(), 5 * 3);
    }

    #[test]
    fn test_from_raw_size_check() {
        let bytes = [0u8; 10];
        let result = Image::from_raw(
            &bytes,
            PixelFormat::RGBA8,
            2,
            2,
            1,
            None,
            false,
            false,
            false,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_hdr_requires_float() {
        let bytes = [0u8; 16];
        let result = Image::from_raw(
            &bytes,
            PixelFormat::RGBA8,
            2,
            2,
            1,
            None,
            false,
            false,
            true,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_get_pixel_values_and_clamp() {
        let img = rgba_2x2();
        assert_eq!(img.get_pixel(1, 1, 0), PixelVec::new(1.0, 1.0, 1.0, 1.0));
        // (-1, 0) clamps to (0, 0): red
        assert_eq!(img.get_pixel(-1, 0, 0), PixelVec::new(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_set_pixel_out_of_bounds_is_noop() {
        let mut img = rgba_2x2();
        let before = img.data().to_vec();
        img.set_pixel(PixelVec::new(0.0, 0.0, 0.0, 0.0), 5, 5, 0);
        img.set_pixel(PixelVec::new(0.0, 0.0, 0.0, 0.0), -1, 0, 0);
        assert_eq!(img.data(), &before[..]);
    }

    #[test]
    fn test_rgba8_blank() {
        let img = Image::rgba8(3, 2).unwrap();
        assert!(img.data().iter().all(|&b| b == 0xFF));
        assert!(img.is_linear());
        assert!(!img.is_srgb());
    }

    #[test]
    fn test_set_hdr_integer_rejected() {
        let mut img = rgba_2x2();
        img.set_hdr(true);
        assert!(!img.is_hdr());
    }

    #[test]
    fn test_profile_roundtrip() {
        let mut img = rgba_2x2();
        img.assign_profile(ColorProfile::srgb());
        assert!(img.is_srgb());
        assert!(!img.is_linear());
        let taken = img.take_profile();
        assert!(taken.is_some());
        // Tags survive a bare take; explicit transfer state clears them.
        assert!(img.is_srgb());
        img.set_transfer_state(false, true);
        assert!(img.is_linear());
        assert!(img.profile().is_none());
    }

    #[test]
    fn test_channel_grow_and_shrink() {
        let fmt = PixelFormat::new(ComponentType::U8, 3).unwrap();
        let bytes = [
            10, 20, 30, //
            40, 50, 60, //
            70, 80, 90, //
            100, 110, 120,
        ];
        let mut img =
            Image::from_raw(&bytes, fmt, 2, 2, 1, None, false, false, false).unwrap();

        img.set_channel_count(4, 1.0).unwrap();
        assert_eq!(img.format().num_components(), 4);
        assert_eq!(img.byte_len(), 16);
        let p = img.get_pixel(1, 1, 0);
        assert!((p.r - 100.0 / 255.0).abs() < 1e-6);
        assert_eq!(p.a, 1.0);

        img.set_channel_count(3, 0.0).unwrap();
        assert_eq!(img.data(), &bytes[..]);
    }

    #[test]
    fn test_channel_count_validation() {
        let mut img = rgba_2x2();
        assert!(img.set_channel_count(0, 0.0).is_err());
        assert!(img.set_channel_count(5, 0.0).is_err());
        // Equal count is a no-op
        let before = img.data().to_vec();
        img.set_channel_count(4, 0.5).unwrap();
        assert_eq!(img.data(), &before[..]);
    }

    #[test]
    fn test_set_channel_cross_image() {
        let mut dst = rgba_2x2();
        let src = rgba_2x2();
        dst.set_channel(3, &src, 0).unwrap();
        // Alpha now mirrors the source red channel
        assert_eq!(dst.get_pixel(0, 0, 0).a, 1.0);
        assert_eq!(dst.get_pixel(1, 0, 0).a, 0.0);
        // Other channels untouched
        assert_eq!(dst.get_pixel(1, 0, 0).g, 1.0);
    }

    #[test]
    fn test_set_channel_size_mismatch() {
        let mut dst = rgba_2x2();
        let src = Image::rgba8(3, 3).unwrap();
        assert!(dst.set_channel(0, &src, 0).is_err());
        assert!(dst.set_channel(7, &rgba_2x2(), 0).is_err());
    }

    #[test]
    fn test_copy_channel_same_index_noop() {
        let mut img = rgba_2x2();
        let before = img.data().to_vec();
        img.copy_channel(2, 2).unwrap();
        assert_eq!(img.data(), &before[..]);
        img.copy_channel(1, 0).unwrap();
        assert_eq!(img.get_pixel(0, 0, 0).g, 1.0);
    }

    #[test]
    fn test_adopt_validates() {
        let mut img = rgba_2x2();
        let bad = PixelBuffer::try_zeroed(7).unwrap();
        assert!(img.adopt(PixelFormat::RGBA8, 2, 2, 1, bad).is_err());
        let good = PixelBuffer::try_zeroed(4).unwrap();
        let old = img.adopt(PixelFormat::RGBA8, 1, 1, 1, good).unwrap();
        assert_eq!(old.len(), 16);
        assert_eq!(img.pixel_count(), 1);
    }

    #[test]
    fn test_clone_is_deep() {
        let img = rgba_2x2();
        let mut copy = img.clone();
        copy.set_pixel(PixelVec::new(0.0, 0.0, 0.0, 0.0), 0, 0, 0);
        assert_eq!(img.get_pixel(0, 0, 0).r, 1.0);
        assert_eq!(copy.get_pixel(0, 0, 0).r, 0.0);
    }

    #[test]
    fn test_layout_invariant() {
        let fmt = PixelFormat::new(ComponentType::U8, 2).unwrap();
        let mut img = Image::new(fmt, 3, 2, 2);
        img.set_pixel(PixelVec::new(1.0, 0.0, 0.0, 0.0), 2, 1, 1);
        let offset = ((1 * 2 + 1) * 3 + 2) * fmt.pixel_size();
        assert_eq!(img.data()[offset], 255);
    }
}
