//! In-place colour conversion of borrowed pixel buffers.
//!
//! The engine hands a raw interleaved buffer plus its layout to
//! [`apply_conversion`]; the conversion stages one scanline at a time
//! through `f32` RGB triplets, runs the Little CMS transform on them and
//! writes the result back. Alpha (and any component past the third) passes
//! through untouched.

use crate::{ColorProfile, IccError, IccResult};
use half::f16;
use lcms2::{Intent, PixelFormat, Transform};
use tracing::debug;

/// Layout of a borrowed pixel buffer handed to the colour engine.
#[derive(Debug, Clone, Copy)]
pub struct BufferLayout {
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels (times depth for 3D images).
    pub height: usize,
    /// Interleaved components per pixel.
    pub components: usize,
    /// Bytes per component (1, 2 or 4).
    pub component_size: usize,
    /// Whether values outside `[0, 1]` must survive the conversion.
    pub hdr: bool,
}

impl BufferLayout {
    /// Total buffer size the layout describes, in bytes.
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.width * self.height * self.components * self.component_size
    }
}

/// Converts a borrowed buffer from `source` to `dest` in place.
///
/// # Errors
///
/// - [`IccError::Unsupported`] for fewer than three components or an
///   unknown component size (profile conversion is an RGB operation).
/// - [`IccError::LayoutMismatch`] when the buffer length does not match
///   the layout.
/// - [`IccError::TransformFailed`] when Little CMS refuses the transform.
///
/// # Example
///
/// ```rust
/// use raster_icc::{apply_conversion, BufferLayout, ColorProfile};
///
/// let mut bytes: Vec<u8> = [0.5f32, 0.5, 0.5]
///     .iter()
///     .flat_map(|v| v.to_ne_bytes())
///     .collect();
/// let layout = BufferLayout {
///     width: 1,
///     height: 1,
///     components: 3,
///     component_size: 4,
///     hdr: false,
/// };
/// apply_conversion(
///     &mut bytes,
///     &layout,
///     &ColorProfile::srgb(),
///     &ColorProfile::linear_srgb(),
/// )
/// .unwrap();
/// let red = f32::from_ne_bytes(bytes[0..4].try_into().unwrap());
/// assert!(red < 0.5); // gamma removed
/// ```
pub fn apply_conversion(
    buffer: &mut [u8],
    layout: &BufferLayout,
    source: &ColorProfile,
    dest: &ColorProfile,
) -> IccResult<()> {
    if layout.components < 3 {
        return Err(IccError::Unsupported(format!(
            "profile conversion needs at least 3 components, got {}",
            layout.components
        )));
    }
    if !matches!(layout.component_size, 1 | 2 | 4) {
        return Err(IccError::Unsupported(format!(
            "component size {} bytes",
            layout.component_size
        )));
    }
    if buffer.len() != layout.byte_len() {
        return Err(IccError::LayoutMismatch {
            expected: layout.byte_len(),
            got: buffer.len(),
        });
    }

    let src_profile = source.to_lcms()?;
    let dst_profile = dest.to_lcms()?;
    let transform: Transform<[f32; 3], [f32; 3]> = Transform::new(
        &src_profile,
        PixelFormat::RGB_FLT,
        &dst_profile,
        PixelFormat::RGB_FLT,
        Intent::Perceptual,
    )
    .map_err(|e| IccError::TransformFailed(e.to_string()))?;

    debug!(
        width = layout.width,
        height = layout.height,
        from = source.description(),
        to = dest.description(),
        "applying ICC conversion in place"
    );

    let clamp = !layout.hdr;
    let pixel_bytes = layout.components * layout.component_size;
    let row_bytes = layout.width * pixel_bytes;
    let mut scanline = vec![[0.0f32; 3]; layout.width];

    for row in buffer.chunks_exact_mut(row_bytes) {
        for (px, staged) in row.chunks_exact(pixel_bytes).zip(scanline.iter_mut()) {
            *staged = decode_rgb(px, layout.component_size);
        }
        transform.transform_in_place(&mut scanline);
        for (px, staged) in row.chunks_exact_mut(pixel_bytes).zip(scanline.iter()) {
            encode_rgb(px, layout.component_size, *staged, clamp);
        }
    }
    Ok(())
}

#[inline]
fn decode_rgb(pixel: &[u8], component_size: usize) -> [f32; 3] {
    let mut rgb = [0.0f32; 3];
    for (c, v) in rgb.iter_mut().enumerate() {
        let off = c * component_size;
        *v = match component_size {
            1 => pixel[off] as f32 / 255.0,
            2 => f16::from_ne_bytes([pixel[off], pixel[off + 1]]).to_f32(),
            _ => f32::from_ne_bytes([
                pixel[off],
                pixel[off + 1],
                pixel[off + 2],
                pixel[off + 3],
            ]),
        };
    }
    rgb
}

#[inline]
fn encode_rgb(pixel: &mut [u8], component_size: usize, rgb: [f32; 3], clamp: bool) {
    for (c, v) in rgb.iter().enumerate() {
        let v = if clamp { v.clamp(0.0, 1.0) } else { *v };
        let off = c * component_size;
        match component_size {
            1 => pixel[off] = (v * 255.0).round().clamp(0.0, 255.0) as u8,
            2 => pixel[off..off + 2].copy_from_slice(&f16::from_f32(v).to_ne_bytes()),
            _ => pixel[off..off + 4].copy_from_slice(&v.to_ne_bytes()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(width: usize, components: usize, component_size: usize) -> BufferLayout {
        BufferLayout {
            width,
            height: 1,
            components,
            component_size,
            hdr: false,
        }
    }

    fn f32_at(bytes: &[u8], index: usize) -> f32 {
        f32::from_ne_bytes(bytes[index * 4..index * 4 + 4].try_into().unwrap())
    }

    #[test]
    fn test_srgb_to_linear_f32() {
        let mut bytes: Vec<u8> = [0.5f32, 0.5, 0.5, 1.0]
            .iter()
            .flat_map(|v| v.to_ne_bytes())
            .collect();
        apply_conversion(
            &mut bytes,
            &layout(1, 4, 4),
            &ColorProfile::srgb(),
            &ColorProfile::linear_srgb(),
        )
        .unwrap();
        assert!(f32_at(&bytes, 0) < 0.5);
        // Alpha untouched
        assert_eq!(f32_at(&bytes, 3), 1.0);
    }

    #[test]
    fn test_identity_close() {
        let original = [128u8, 64, 32];
        let mut pixels = original;
        apply_conversion(
            &mut pixels,
            &layout(1, 3, 1),
            &ColorProfile::srgb(),
            &ColorProfile::srgb(),
        )
        .unwrap();
        for (a, b) in pixels.iter().zip(original.iter()) {
            assert!((*a as i32 - *b as i32).abs() <= 1);
        }
    }

    #[test]
    fn test_rejects_gray() {
        let mut pixels = [0u8; 4];
        let err = apply_conversion(
            &mut pixels,
            &layout(2, 2, 1),
            &ColorProfile::srgb(),
            &ColorProfile::linear_srgb(),
        )
        .unwrap_err();
        assert!(matches!(err, IccError::Unsupported(_)));
    }

    #[test]
    fn test_rejects_length_mismatch() {
        let mut pixels = [0u8; 5];
        let err = apply_conversion(
            &mut pixels,
            &layout(1, 3, 1),
            &ColorProfile::srgb(),
            &ColorProfile::linear_srgb(),
        )
        .unwrap_err();
        assert!(matches!(err, IccError::LayoutMismatch { .. }));
    }
}
