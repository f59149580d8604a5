//! Colour pipeline operations.
//!
//! Two ways of changing the colour encoding of an image:
//!
//! - [`convert_profile`] hands the buffer to the ICC collaborator for a
//!   full profile-to-profile conversion.
//! - [`srgb_to_linear`] / [`linear_to_srgb`] apply the sRGB transfer
//!   function directly — for `u8` images that is one table lookup per
//!   component, no floating point at all.
//!
//! The fast paths drop the profile handle on entry: once the data has been
//! re-encoded by hand it no longer obeys any concrete profile, only the
//! `srgb`/`linear` tags.

use crate::parallel::{parallel_for, SharedSlice};
use half::f16;
use raster_core::{ComponentType, Image, PixelBuffer, Result, Texel};
use raster_icc::{apply_conversion, BufferLayout, ColorProfile};
use raster_transfer::{srgb, srgb_u8_table};
use tracing::debug;

/// Converts the image to another colour profile via the ICC collaborator.
///
/// Converting to the profile already assigned is a successful no-op. An
/// image without a profile handle is assumed to be sRGB, matching the
/// loader contract for untagged files.
///
/// # Errors
///
/// Returns [`raster_core::Error::ColorConversionFailed`] when the
/// collaborator rejects the buffer or the transform; the pixels are only
/// mutated on success.
pub fn convert_profile(image: &mut Image, target: &ColorProfile) -> Result<()> {
    if let Some(current) = image.profile() {
        if current.same(target) {
            return Ok(());
        }
    }
    let source = image
        .profile()
        .cloned()
        .unwrap_or_else(ColorProfile::srgb);
    let layout = BufferLayout {
        width: image.width(),
        height: image.height() * image.depth(),
        components: image.format().num_components(),
        component_size: image.format().component_size(),
        hdr: image.is_hdr(),
    };
    debug!(from = source.description(), to = target.description(), "profile conversion");
    apply_conversion(image.data_mut(), &layout, &source, target)?;
    image.assign_profile(target.clone());
    Ok(())
}

/// Decodes sRGB-encoded contents to linear light in place.
///
/// With `preserve_alpha` and a 4-component image the fourth component is
/// left untouched; otherwise every component is decoded. Callers that do
/// not care should pass `true` — alpha is coverage, not colour.
///
/// On exit the profile handle is dropped and the tags read
/// `srgb = false, linear = true`.
///
/// # Example
///
/// ```rust
/// use raster_core::{ComponentType, Image, PixelFormat};
/// use raster_ops::srgb_to_linear;
///
/// let bytes = [188u8, 188, 188];
/// let fmt = PixelFormat::new(ComponentType::U8, 3).unwrap();
/// let mut img = Image::from_raw(&bytes, fmt, 1, 1, 1, None, true, false, false).unwrap();
/// srgb_to_linear(&mut img, true);
/// assert!((img.data()[0] as i32 - 128).abs() <= 1);
/// assert!(img.is_linear());
/// ```
pub fn srgb_to_linear(image: &mut Image, preserve_alpha: bool) {
    let table = srgb_u8_table();
    transfer_in_place(
        image,
        preserve_alpha,
        |b| table[b as usize].linear,
        srgb::eotf,
    );
    image.set_transfer_state(false, true);
}

/// Encodes linear-light contents to sRGB in place.
///
/// The counterpart of [`srgb_to_linear`]; the same alpha rule applies. On
/// exit the tags read `srgb = true, linear = false`.
pub fn linear_to_srgb(image: &mut Image, preserve_alpha: bool) {
    let table = srgb_u8_table();
    transfer_in_place(
        image,
        preserve_alpha,
        |b| table[b as usize].srgb,
        srgb::oetf,
    );
    image.set_transfer_state(true, false);
}

/// Applies a transfer map to every colour component, specialised per
/// component type.
fn transfer_in_place(
    image: &mut Image,
    preserve_alpha: bool,
    map_u8: impl Fn(u8) -> u8 + Sync,
    map_f32: impl Fn(f32) -> f32 + Sync,
) {
    let format = image.format();
    let extent = image.extent();
    let n = format.num_components();
    let rows = extent.height * extent.depth;
    let row_texels = extent.width * n;
    let skip_alpha = preserve_alpha && n == 4;

    match format.component_type() {
        ComponentType::U8 => {
            transfer_rows::<u8, _>(image.buffer_mut(), rows, row_texels, n, skip_alpha, map_u8);
        }
        ComponentType::F16 => {
            transfer_rows::<f16, _>(image.buffer_mut(), rows, row_texels, n, skip_alpha, |v| {
                f16::from_f32(map_f32(v.to_f32()))
            });
        }
        ComponentType::F32 => {
            transfer_rows::<f32, _>(image.buffer_mut(), rows, row_texels, n, skip_alpha, map_f32);
        }
    }
}

fn transfer_rows<T: Texel, F: Fn(T) -> T + Sync>(
    buf: &mut PixelBuffer,
    rows: usize,
    row_texels: usize,
    num_components: usize,
    skip_alpha: bool,
    map: F,
) {
    let shared = SharedSlice::new(buf.as_slice_mut::<T>());
    parallel_for(0, rows, |row| {
        // Rows are disjoint by construction.
        let out = unsafe { shared.slice_mut(row * row_texels, row_texels) };
        if skip_alpha {
            for px in out.chunks_exact_mut(num_components) {
                for v in &mut px[..num_components - 1] {
                    *v = map(*v);
                }
            }
        } else {
            for v in out.iter_mut() {
                *v = map(*v);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use raster_core::{PixelFormat, PixelVec};

    fn grey_u8(value: u8, components: usize) -> Image {
        let fmt = PixelFormat::new(ComponentType::U8, components).unwrap();
        let bytes = vec![value; components];
        Image::from_raw(&bytes, fmt, 1, 1, 1, None, true, false, false).unwrap()
    }

    #[test]
    fn test_u8_grey_roundtrip() {
        let mut img = grey_u8(188, 3);
        srgb_to_linear(&mut img, true);
        assert!((img.data()[0] as i32 - 128).abs() <= 1);
        assert!(img.is_linear());
        assert!(!img.is_srgb());

        linear_to_srgb(&mut img, true);
        assert!((img.data()[0] as i32 - 188).abs() <= 1);
        assert!(img.is_srgb());
    }

    #[test]
    fn test_idempotence_within_one_step() {
        // Quantised linear bytes cannot separate the darkest sRGB codes
        // (several of them share linear byte 0 or 1), so the one-step
        // guarantee starts above that collision range.
        for value in 49..=255u8 {
            let mut img = grey_u8(value, 1);
            srgb_to_linear(&mut img, true);
            linear_to_srgb(&mut img, true);
            assert!(
                (img.data()[0] as i32 - value as i32).abs() <= 1,
                "value {value} drifted to {}",
                img.data()[0]
            );
        }
        // The opposite direction expands dark values and stays within one
        // step across the whole range.
        for value in 0..=255u8 {
            let mut img = grey_u8(value, 1);
            img.set_transfer_state(false, true);
            linear_to_srgb(&mut img, true);
            srgb_to_linear(&mut img, true);
            assert!(
                (img.data()[0] as i32 - value as i32).abs() <= 1,
                "linear value {value} drifted to {}",
                img.data()[0]
            );
        }
    }

    #[test]
    fn test_preserve_alpha() {
        let mut img = grey_u8(100, 4);
        srgb_to_linear(&mut img, true);
        // Colour components decoded, alpha untouched
        assert_ne!(img.data()[0], 100);
        assert_eq!(img.data()[3], 100);

        let mut img = grey_u8(100, 4);
        srgb_to_linear(&mut img, false);
        assert_ne!(img.data()[3], 100);
    }

    #[test]
    fn test_f32_matches_transfer_function() {
        let fmt = PixelFormat::new(ComponentType::F32, 1).unwrap();
        let mut img = Image::new(fmt, 1, 1, 1);
        img.set_pixel(PixelVec::new(0.5, 0.0, 0.0, 0.0), 0, 0, 0);
        srgb_to_linear(&mut img, true);
        assert!((img.get_pixel(0, 0, 0).r - srgb::eotf(0.5)).abs() < 1e-6);
    }

    #[test]
    fn test_f16_path() {
        let fmt = PixelFormat::new(ComponentType::F16, 4).unwrap();
        let mut img = Image::new(fmt, 2, 2, 1);
        for y in 0..2 {
            for x in 0..2 {
                img.set_pixel(PixelVec::new(0.5, 0.25, 0.75, 1.0), x, y, 0);
            }
        }
        srgb_to_linear(&mut img, true);
        let p = img.get_pixel(1, 1, 0);
        assert!((p.r - srgb::eotf(0.5)).abs() < 2e-3);
        assert_eq!(p.a, 1.0);
    }

    #[test]
    fn test_fast_path_drops_profile() {
        let mut img = grey_u8(120, 3);
        img.assign_profile(ColorProfile::srgb());
        srgb_to_linear(&mut img, true);
        assert!(img.profile().is_none());
        assert!(img.is_linear());
    }

    #[test]
    fn test_convert_profile_identity_noop() {
        let mut img = grey_u8(77, 3);
        img.assign_profile(ColorProfile::srgb());
        let before = img.data().to_vec();
        convert_profile(&mut img, &ColorProfile::srgb()).unwrap();
        assert_eq!(img.data(), &before[..]);
    }

    #[test]
    fn test_convert_profile_to_linear() {
        let mut img = grey_u8(188, 3);
        img.assign_profile(ColorProfile::srgb());
        convert_profile(&mut img, &ColorProfile::linear_srgb()).unwrap();
        assert!(img.is_linear());
        // Little CMS should land close to the analytic value
        assert!((img.data()[0] as i32 - 128).abs() <= 2);
    }

    #[test]
    fn test_convert_profile_rejects_gray() {
        let mut img = grey_u8(50, 2);
        img.assign_profile(ColorProfile::srgb());
        assert!(convert_profile(&mut img, &ColorProfile::linear_srgb()).is_err());
    }
}
