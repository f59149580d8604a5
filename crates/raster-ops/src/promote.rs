//! Component-type conversion.
//!
//! Changes how components are stored (`U8`, `F16`, `F32`) without touching
//! the component count or the pixel values' meaning. A fresh destination
//! buffer is filled by per-scanline workers and adopted on success, so a
//! failed conversion leaves the image untouched.
//!
//! Every ordered source/target pair converts directly: byte promotion uses
//! the precomputed `i / 255` entries of the sRGB table (no division on the
//! hot path), float pairs narrow or widen, identical types short-circuit.

use crate::parallel::{parallel_for, SharedSlice};
use half::f16;
use raster_core::{ComponentType, Image, PixelBuffer, Result, Texel};
use raster_transfer::srgb_u8_table;
use tracing::debug;

/// Converts the stored component type in place.
///
/// Colour tags and the profile handle are preserved; `hdr` is cleared when
/// the target cannot represent out-of-range values.
///
/// # Errors
///
/// Returns [`raster_core::Error::AllocationFailed`] when the destination
/// buffer cannot be allocated; the image is unchanged in that case.
///
/// # Example
///
/// ```rust
/// use raster_core::{ComponentType, Image};
/// use raster_ops::convert_component_type;
///
/// let mut img = Image::rgba8(4, 4).unwrap();
/// convert_component_type(&mut img, ComponentType::F16).unwrap();
/// assert_eq!(img.format().component_type(), ComponentType::F16);
/// assert_eq!(img.get_pixel(0, 0, 0).r, 1.0);
/// ```
pub fn convert_component_type(image: &mut Image, target: ComponentType) -> Result<()> {
    let source = image.format().component_type();
    if source == target {
        return Ok(());
    }
    let format = image.format().with_component_type(target);
    let extent = image.extent();
    let rows = extent.height * extent.depth;
    let row_texels = extent.width * format.num_components();
    let mut dst = PixelBuffer::try_zeroed(extent.pixel_count() * format.pixel_size())?;

    debug!(?source, ?target, rows, "converting component type");

    let table = srgb_u8_table();
    match (source, target) {
        (ComponentType::U8, ComponentType::F16) => {
            convert_rows::<u8, f16, _>(image.buffer().as_slice(), &mut dst, rows, row_texels, |v| {
                table[v as usize].f16_value
            });
        }
        (ComponentType::U8, ComponentType::F32) => {
            convert_rows::<u8, f32, _>(image.buffer().as_slice(), &mut dst, rows, row_texels, |v| {
                table[v as usize].f32_value
            });
        }
        (ComponentType::F16, ComponentType::F32) => {
            convert_rows::<f16, f32, _>(image.buffer().as_slice(), &mut dst, rows, row_texels, |v| {
                v.to_f32()
            });
        }
        (ComponentType::F32, ComponentType::F16) => {
            convert_rows::<f32, f16, _>(
                image.buffer().as_slice(),
                &mut dst,
                rows,
                row_texels,
                f16::from_f32,
            );
        }
        (ComponentType::F16, ComponentType::U8) => {
            convert_rows::<f16, u8, _>(image.buffer().as_slice(), &mut dst, rows, row_texels, |v| {
                u8::from_f32(v.to_f32())
            });
        }
        (ComponentType::F32, ComponentType::U8) => {
            convert_rows::<f32, u8, _>(
                image.buffer().as_slice(),
                &mut dst,
                rows,
                row_texels,
                u8::from_f32,
            );
        }
        // Identical pairs short-circuit above.
        _ => unreachable!("identical component types already handled"),
    }

    let (w, h, d) = (extent.width, extent.height, extent.depth);
    image.adopt(format, w, h, d, dst)?;
    if !target.is_float() {
        image.set_hdr(false);
    }
    Ok(())
}

/// Returns a copy of the image with a different component type.
///
/// # Errors
///
/// Propagates allocation failure from the copy or the conversion.
pub fn create_promoted(image: &Image, target: ComponentType) -> Result<Image> {
    let mut promoted = image.clone();
    convert_component_type(&mut promoted, target)?;
    Ok(promoted)
}

fn convert_rows<S, D, F>(src: &[S], dst: &mut PixelBuffer, rows: usize, row_texels: usize, map: F)
where
    S: Texel,
    D: Texel,
    F: Fn(S) -> D + Sync,
{
    let shared = SharedSlice::new(dst.as_slice_mut::<D>());
    parallel_for(0, rows, |row| {
        // Rows are disjoint by construction.
        let out = unsafe { shared.slice_mut(row * row_texels, row_texels) };
        let inp = &src[row * row_texels..(row + 1) * row_texels];
        for (o, i) in out.iter_mut().zip(inp) {
            *o = map(*i);
        }
    });
}
