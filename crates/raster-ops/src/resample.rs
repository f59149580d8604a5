//! Separable Lanczos resampling.
//!
//! Resizes an image along X, then Y, then Z with one-dimensional Lanczos
//! convolutions, operating in linear light:
//!
//! 1. If the contents are not linear, they are linearised first — through
//!    the ICC collaborator when a profile handle is present (converting to
//!    the profile's linear sibling), or through the sRGB fast path when
//!    only the tags say sRGB. The original encoding is restored afterwards.
//! 2. Each axis pass maps output coordinate `c` to source centre
//!    `(c + 0.5) * scale - 0.5`, clamped into the source range, and
//!    accumulates the windowed-sinc weighted neighbourhood with edge
//!    clamping. Weights are normalised by their sum.
//! 3. Passes ping-pong between two scratch buffers; the image's own buffer
//!    is only replaced by the final adopt, so failure and cancellation
//!    leave the image unchanged.
//!
//! Per-axis RGB renormalisation (`renormalize`) keeps direction-encoding
//! pixels (normal maps) at unit length through the filter.
//!
//! Inner loops are specialised per `(F16 | F32, 1..=4)` and read storage
//! directly; other shapes (notably `U8`) run through the generic typed
//! accessors.

use crate::color::{convert_profile, linear_to_srgb, srgb_to_linear};
use crate::parallel::{parallel_for, SharedSlice};
use crate::progress::ProgressTracker;
use half::f16;
use raster_core::access;
use raster_core::{
    ComponentType, Error, Extent, Image, PixelBuffer, PixelFormat, PixelVec, Result, Texel,
};
use raster_icc::ColorProfile;
use tracing::debug;

/// Resampling algorithm selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResampleAlgorithm {
    /// Windowed-sinc (Lanczos) reconstruction.
    #[default]
    Lanczos,
}

/// Lanczos kernel `sinc(x) * sinc(x / a)` with half-width `a`.
///
/// # Example
///
/// ```rust
/// use raster_ops::lanczos;
///
/// assert_eq!(lanczos(0.0, 2.0), 1.0);
/// assert!(lanczos(1.0, 2.0).abs() < 1e-6); // zero at integers
/// assert_eq!(lanczos(2.0, 2.0), 0.0);      // outside the window
/// ```
#[inline]
pub fn lanczos(x: f32, a: f32) -> f32 {
    let ax = x.abs();
    if ax < 1e-8 {
        return 1.0;
    }
    if ax >= a {
        return 0.0;
    }
    let pi_x = std::f32::consts::PI * ax;
    let pi_x_a = pi_x / a;
    (pi_x.sin() / pi_x) * (pi_x_a.sin() / pi_x_a)
}

/// Resamples the image to `width * height * depth` in place.
///
/// `quality` is the kernel half-width (2 or 3 are the usual choices).
/// `renormalize` re-normalises the RGB vector of every output sample after
/// each axis. Target dimensions below 1 are clamped to 1; resampling to
/// the current dimensions reports completion and returns without touching
/// the buffer.
///
/// `progress` receives fractions in `[0, 1]` from worker threads and
/// returns `true` to request cancellation; see
/// [`progress_ignored`](crate::progress_ignored) for the indifferent
/// default. A cancelled resample restores the original encoding, keeps the
/// original dimensions and returns [`Error::Cancelled`].
///
/// # Errors
///
/// - [`Error::InvalidArgument`] for a kernel half-width below 1.
/// - [`Error::AllocationFailed`] when scratch buffers cannot be allocated.
/// - [`Error::ColorConversionFailed`] when linearisation through the ICC
///   collaborator fails.
/// - [`Error::Cancelled`] when the progress callback requested it.
#[allow(clippy::too_many_arguments)]
pub fn resample(
    image: &mut Image,
    algorithm: ResampleAlgorithm,
    quality: f32,
    width: usize,
    height: usize,
    depth: usize,
    renormalize: bool,
    progress: impl Fn(f32) -> bool + Sync,
) -> Result<()> {
    let ResampleAlgorithm::Lanczos = algorithm;
    if !quality.is_finite() || quality < 1.0 {
        return Err(Error::invalid_argument(format!(
            "kernel half-width {quality} must be a finite value >= 1"
        )));
    }
    let source = image.extent();
    let target = Extent::new(width.max(1), height.max(1), depth.max(1));
    if source == target {
        let _ = progress(1.0);
        return Ok(());
    }
    debug!(
        from = ?(source.width, source.height, source.depth),
        to = ?(target.width, target.height, target.depth),
        quality,
        renormalize,
        "lanczos resample"
    );

    let restore = linearize(image)?;
    let passes = run_passes(image, quality, target, renormalize, &progress);
    // Restoration runs for success and cancellation alike, so the caller
    // always gets the image back in its original encoding.
    let restored = delinearize(image, restore);
    passes?;
    restored?;
    let _ = progress(1.0);
    Ok(())
}

/// Returns a resampled copy, leaving this image untouched.
#[allow(clippy::too_many_arguments)]
pub fn create_resampled(
    image: &Image,
    algorithm: ResampleAlgorithm,
    quality: f32,
    width: usize,
    height: usize,
    depth: usize,
    renormalize: bool,
    progress: impl Fn(f32) -> bool + Sync,
) -> Result<Image> {
    let mut resampled = image.clone();
    resample(
        &mut resampled,
        algorithm,
        quality,
        width,
        height,
        depth,
        renormalize,
        progress,
    )?;
    Ok(resampled)
}

/// Returns a copy at half resolution along every axis (minimum 1).
///
/// The next mip level, essentially.
pub fn create_downsampled(
    image: &Image,
    algorithm: ResampleAlgorithm,
    quality: f32,
    progress: impl Fn(f32) -> bool + Sync,
) -> Result<Image> {
    create_resampled(
        image,
        algorithm,
        quality,
        (image.width() / 2).max(1),
        (image.height() / 2).max(1),
        (image.depth() / 2).max(1),
        false,
        progress,
    )
}

enum Restore {
    Untouched,
    Profile(ColorProfile),
    Tags,
}

fn linearize(image: &mut Image) -> Result<Restore> {
    if image.is_linear() {
        return Ok(Restore::Untouched);
    }
    if let Some(profile) = image.profile().cloned() {
        if let Some(sibling) = profile.linear_sibling() {
            convert_profile(image, &sibling)?;
            return Ok(Restore::Profile(profile));
        }
    }
    if image.is_srgb() {
        srgb_to_linear(image, true);
        return Ok(Restore::Tags);
    }
    // Untagged (including hdr-only) data is filtered as-is.
    Ok(Restore::Untouched)
}

fn delinearize(image: &mut Image, restore: Restore) -> Result<()> {
    match restore {
        Restore::Untouched => Ok(()),
        Restore::Profile(profile) => convert_profile(image, &profile),
        Restore::Tags => {
            linear_to_srgb(image, true);
            Ok(())
        }
    }
}

fn run_passes(
    image: &mut Image,
    a: f32,
    target: Extent,
    renormalize: bool,
    progress: &(dyn Fn(f32) -> bool + Sync),
) -> Result<()> {
    let format = image.format();
    let pixel_size = format.pixel_size();
    let source = image.extent();
    let after_x = Extent::new(target.width, source.height, source.depth);
    let after_y = Extent::new(target.width, target.height, source.depth);
    let run_depth = source.depth != target.depth;

    let total = source.height * source.depth
        + target.height * source.depth
        + if run_depth { target.height * target.depth } else { 0 };
    let tracker = ProgressTracker::new(progress, total);

    // Two scratch buffers ping-pong across the passes; the image's own
    // buffer is the first source and is only swapped out by the adopt.
    let mut intermediate = PixelBuffer::try_zeroed(after_x.pixel_count() * pixel_size)?;
    run_pass(
        format,
        image.buffer(),
        source,
        &mut intermediate,
        after_x,
        Axis::X,
        a,
        renormalize,
        &tracker,
    );
    if tracker.is_cancelled() {
        return Err(Error::Cancelled);
    }

    let mut temporary = PixelBuffer::try_zeroed(after_y.pixel_count() * pixel_size)?;
    run_pass(
        format,
        &intermediate,
        after_x,
        &mut temporary,
        after_y,
        Axis::Y,
        a,
        renormalize,
        &tracker,
    );
    if tracker.is_cancelled() {
        return Err(Error::Cancelled);
    }

    let final_buffer = if run_depth {
        intermediate.resize(target.pixel_count() * pixel_size, 0)?;
        run_pass(
            format,
            &temporary,
            after_y,
            &mut intermediate,
            target,
            Axis::Z,
            a,
            renormalize,
            &tracker,
        );
        if tracker.is_cancelled() {
            return Err(Error::Cancelled);
        }
        intermediate
    } else {
        temporary
    };

    image.adopt(format, target.width, target.height, target.depth, final_buffer)?;
    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    X,
    Y,
    Z,
}

/// Axis length and source/target scale factor for one pass.
#[inline]
fn axis_geometry(axis: Axis, src: Extent, dst: Extent) -> (usize, f32) {
    match axis {
        Axis::X => (src.width, src.width as f32 / dst.width as f32),
        Axis::Y => (src.height, src.height as f32 / dst.height as f32),
        Axis::Z => (src.depth, src.depth as f32 / dst.depth as f32),
    }
}

/// Maps an output coordinate to its source-space centre, clamped into the
/// source range so border samples reproduce border pixels.
#[inline]
fn source_center(c: usize, scale: f32, len: usize) -> f32 {
    ((c as f32 + 0.5) * scale - 0.5).clamp(0.0, (len - 1) as f32)
}

/// One-dimensional Lanczos accumulation with edge clamping.
#[inline]
fn sample_axis(
    center: f32,
    a: f32,
    len: usize,
    fetch: impl Fn(usize) -> PixelVec,
) -> PixelVec {
    let start = (center - a + 1.0).floor() as i64;
    let end = (center + a).floor() as i64;
    let mut acc = PixelVec::ZERO;
    let mut weight_sum = 0.0f32;
    for i in start..=end {
        let w = lanczos(center - i as f32, a);
        if w == 0.0 {
            continue;
        }
        let clamped = i.clamp(0, len as i64 - 1) as usize;
        acc += fetch(clamped) * w;
        weight_sum += w;
    }
    if weight_sum != 0.0 {
        acc /= weight_sum;
    }
    acc
}

#[inline]
fn read_lanes<T: Texel, const N: usize>(src: &[T], pixel_index: usize) -> PixelVec {
    let base = pixel_index * N;
    let mut p = PixelVec::ZERO;
    for c in 0..N {
        p.set_component(c, src[base + c].to_f32());
    }
    p
}

#[inline]
fn write_lanes<T: Texel, const N: usize>(row: &mut [T], base: usize, p: PixelVec) {
    for c in 0..N {
        row[base + c] = T::from_f32(p.component(c));
    }
}

#[allow(clippy::too_many_arguments)]
fn run_pass(
    format: PixelFormat,
    src: &PixelBuffer,
    s: Extent,
    dst: &mut PixelBuffer,
    d: Extent,
    axis: Axis,
    a: f32,
    renorm: bool,
    tracker: &ProgressTracker<'_>,
) {
    match (format.component_type(), format.num_components()) {
        (ComponentType::F16, 1) => {
            lanczos_pass::<f16, 1>(src.as_slice(), s, dst, d, axis, a, renorm, tracker)
        }
        (ComponentType::F16, 2) => {
            lanczos_pass::<f16, 2>(src.as_slice(), s, dst, d, axis, a, renorm, tracker)
        }
        (ComponentType::F16, 3) => {
            lanczos_pass::<f16, 3>(src.as_slice(), s, dst, d, axis, a, renorm, tracker)
        }
        (ComponentType::F16, 4) => {
            lanczos_pass::<f16, 4>(src.as_slice(), s, dst, d, axis, a, renorm, tracker)
        }
        (ComponentType::F32, 1) => {
            lanczos_pass::<f32, 1>(src.as_slice(), s, dst, d, axis, a, renorm, tracker)
        }
        (ComponentType::F32, 2) => {
            lanczos_pass::<f32, 2>(src.as_slice(), s, dst, d, axis, a, renorm, tracker)
        }
        (ComponentType::F32, 3) => {
            lanczos_pass::<f32, 3>(src.as_slice(), s, dst, d, axis, a, renorm, tracker)
        }
        (ComponentType::F32, 4) => {
            lanczos_pass::<f32, 4>(src.as_slice(), s, dst, d, axis, a, renorm, tracker)
        }
        // U8 and unexpected shapes go through the typed accessors.
        _ => lanczos_pass_dyn(src, format, s, dst, d, axis, a, renorm, tracker),
    }
}

#[allow(clippy::too_many_arguments)]
fn lanczos_pass<T: Texel, const N: usize>(
    src: &[T],
    s: Extent,
    dst: &mut PixelBuffer,
    d: Extent,
    axis: Axis,
    a: f32,
    renorm: bool,
    tracker: &ProgressTracker<'_>,
) {
    let (len, scale) = axis_geometry(axis, s, d);
    let shared = SharedSlice::new(dst.as_slice_mut::<T>());
    parallel_for(0, d.depth * d.height, |r| {
        if tracker.is_cancelled() {
            return;
        }
        let z = r / d.height;
        let y = r % d.height;
        // Each claimed index owns exactly one output row.
        let row = unsafe { shared.slice_mut((z * d.height + y) * d.width * N, d.width * N) };
        for x in 0..d.width {
            let center = match axis {
                Axis::X => source_center(x, scale, len),
                Axis::Y => source_center(y, scale, len),
                Axis::Z => source_center(z, scale, len),
            };
            let p = match axis {
                Axis::X => sample_axis(center, a, len, |i| {
                    read_lanes::<T, N>(src, (z * s.height + y) * s.width + i)
                }),
                Axis::Y => sample_axis(center, a, len, |i| {
                    read_lanes::<T, N>(src, (z * s.height + i) * s.width + x)
                }),
                Axis::Z => sample_axis(center, a, len, |i| {
                    read_lanes::<T, N>(src, (i * s.height + y) * s.width + x)
                }),
            };
            let p = if renorm && N >= 3 { p.normalized() } else { p };
            write_lanes::<T, N>(row, x * N, p);
        }
        tracker.step();
    });
}

#[allow(clippy::too_many_arguments)]
fn lanczos_pass_dyn(
    src: &PixelBuffer,
    format: PixelFormat,
    s: Extent,
    dst: &mut PixelBuffer,
    d: Extent,
    axis: Axis,
    a: f32,
    renorm: bool,
    tracker: &ProgressTracker<'_>,
) {
    let n = format.num_components();
    let pixel_size = format.pixel_size();
    let (len, scale) = axis_geometry(axis, s, d);
    let shared = SharedSlice::new(dst.as_bytes_mut());
    parallel_for(0, d.depth * d.height, |r| {
        if tracker.is_cancelled() {
            return;
        }
        let z = r / d.height;
        let y = r % d.height;
        let row =
            unsafe { shared.slice_mut((z * d.height + y) * d.width * pixel_size, d.width * pixel_size) };
        for x in 0..d.width {
            let center = match axis {
                Axis::X => source_center(x, scale, len),
                Axis::Y => source_center(y, scale, len),
                Axis::Z => source_center(z, scale, len),
            };
            let p = sample_axis(center, a, len, |i| match axis {
                Axis::X => access::read_pixel(src, format, s, i as i64, y as i64, z as i64),
                Axis::Y => access::read_pixel(src, format, s, x as i64, i as i64, z as i64),
                Axis::Z => access::read_pixel(src, format, s, x as i64, y as i64, i as i64),
            });
            let p = if renorm && n >= 3 { p.normalized() } else { p };
            encode_dyn(&mut row[x * pixel_size..(x + 1) * pixel_size], format, p);
        }
        tracker.step();
    });
}

#[inline]
fn encode_dyn(pixel: &mut [u8], format: PixelFormat, p: PixelVec) {
    let size = format.component_size();
    for c in 0..format.num_components() {
        let off = c * size;
        match format.component_type() {
            ComponentType::U8 => pixel[off] = u8::from_f32(p.component(c)),
            ComponentType::F16 => pixel[off..off + 2]
                .copy_from_slice(&f16::from_f32(p.component(c)).to_ne_bytes()),
            ComponentType::F32 => {
                pixel[off..off + 4].copy_from_slice(&p.component(c).to_ne_bytes())
            }
        }
    }
}
