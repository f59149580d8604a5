//! Precomputed 8-bit sRGB conversion table.
//!
//! A process-wide, immutable 256-entry table that makes `sRGB <-> linear`
//! conversion of `u8` images a pure lookup — one table access per
//! component, no floating point on the hot path. The float fields also
//! give promotion code the exact `f16`/`f32` value of `i / 255` for free.
//!
//! The table is built once on first use and never mutated; any thread may
//! read it.

use crate::srgb::{eotf, oetf};
use half::f16;
use std::sync::LazyLock;

/// One entry of the 8-bit sRGB table, indexed by the source byte value.
///
/// Reading `linear`/`f16_linear`/`f32_linear` treats the index as an sRGB
/// encoded value; reading `srgb`/`f16_srgb`/`f32_srgb` treats it as linear
/// light. `f16_value`/`f32_value` are the plain `index / 255` identity.
#[derive(Debug, Clone, Copy)]
pub struct SrgbTableEntry {
    /// Linear byte re-encoded as sRGB.
    pub srgb: u8,
    /// sRGB byte decoded to linear.
    pub linear: u8,
    /// `oetf(index / 255)` as `f16`.
    pub f16_srgb: f16,
    /// `eotf(index / 255)` as `f16`.
    pub f16_linear: f16,
    /// `oetf(index / 255)`.
    pub f32_srgb: f32,
    /// `eotf(index / 255)`.
    pub f32_linear: f32,
    /// `index / 255` as `f16`.
    pub f16_value: f16,
    /// `index / 255`.
    pub f32_value: f32,
}

static UINT8_TABLE: LazyLock<[SrgbTableEntry; 256]> = LazyLock::new(|| {
    std::array::from_fn(|i| {
        let value = i as f32 / 255.0;
        let linear = eotf(value);
        let srgb = oetf(value);
        SrgbTableEntry {
            srgb: quantize(srgb),
            linear: quantize(linear),
            f16_srgb: f16::from_f32(srgb),
            f16_linear: f16::from_f32(linear),
            f32_srgb: srgb,
            f32_linear: linear,
            f16_value: f16::from_f32(value),
            f32_value: value,
        }
    })
});

#[inline]
fn quantize(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Returns the process-wide 8-bit sRGB table.
///
/// # Example
///
/// ```rust
/// use raster_transfer::{srgb_u8_table, srgb::eotf};
///
/// let table = srgb_u8_table();
/// let i = 188usize;
/// assert_eq!(
///     table[i].linear,
///     (eotf(i as f32 / 255.0) * 255.0).round() as u8
/// );
/// ```
#[inline]
pub fn srgb_u8_table() -> &'static [SrgbTableEntry; 256] {
    &UINT8_TABLE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_matches_closed_form() {
        let table = srgb_u8_table();
        for i in 0..256usize {
            let value = i as f32 / 255.0;
            assert_eq!(table[i].linear, quantize(eotf(value)), "linear[{i}]");
            assert_eq!(table[i].srgb, quantize(oetf(value)), "srgb[{i}]");
            assert_eq!(table[i].f32_value, value);
            assert_eq!(table[i].f16_value, f16::from_f32(value));
        }
    }

    #[test]
    fn test_endpoints_fixed() {
        let table = srgb_u8_table();
        assert_eq!(table[0].linear, 0);
        assert_eq!(table[0].srgb, 0);
        assert_eq!(table[255].linear, 255);
        assert_eq!(table[255].srgb, 255);
    }

    #[test]
    fn test_roundtrip_within_one_step() {
        let table = srgb_u8_table();
        // linear -> srgb -> linear separates every code well enough to
        // stay within one quantisation step across the whole range.
        for i in 0..256usize {
            let there = table[i].srgb as usize;
            let back = table[there].linear as i32;
            assert!((back - i as i32).abs() <= 1, "i={i} back={back}");
        }
        // The darkest sRGB codes share a linear byte, so the opposite
        // direction only tightens to one step above that range.
        for i in 49..256usize {
            let there = table[i].linear as usize;
            let back = table[there].srgb as i32;
            assert!((back - i as i32).abs() <= 1, "i={i} back={back}");
        }
    }

    #[test]
    fn test_mid_grey() {
        // 188 sRGB is close to 128 linear (the classic 18%-ish check)
        let table = srgb_u8_table();
        assert!((table[188].linear as i32 - 128).abs() <= 1);
    }
}
