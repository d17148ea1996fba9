//! Table-driven sRGB conversions for 8-bit pixels.
//!
//! The `powf` curves in [`crate::srgb`] cost far too much to run four times
//! per pixel, so blending in linear light goes through two tables:
//!
//! | Table | Entries | Direction | Error vs `powf` |
//! |-------|---------|-----------|-----------------|
//! | decode | 256 | byte -> linear `f32` | <= 1e-4 |
//! | encode | 4096 | linear `f32` -> byte | <= 1 byte |
//!
//! Both tables are built on first use and never change afterwards, so reads
//! from any thread need no synchronization beyond the one-time init.
//!
//! # Example
//!
//! ```rust
//! use blit_transfer::lut::{linear_to_srgb_fast, srgb_to_linear_fast};
//!
//! let lin = srgb_to_linear_fast(128);
//! assert!((lin - 0.2158).abs() < 1e-3);
//! assert_eq!(linear_to_srgb_fast(lin), 128);
//! ```

use std::sync::OnceLock;

use crate::srgb;

/// Entries in the linear-to-sRGB table.
pub const ENCODE_SIZE: usize = 4096;

static DECODE: OnceLock<[f32; 256]> = OnceLock::new();
static ENCODE: OnceLock<Box<[u8; ENCODE_SIZE]>> = OnceLock::new();

fn decode_table() -> &'static [f32; 256] {
    DECODE.get_or_init(|| {
        let mut t = [0.0f32; 256];
        for (i, v) in t.iter_mut().enumerate() {
            *v = srgb::eotf(i as f32 / 255.0);
        }
        t
    })
}

fn encode_table() -> &'static [u8; ENCODE_SIZE] {
    ENCODE.get_or_init(|| {
        let mut t = Box::new([0u8; ENCODE_SIZE]);
        let max = (ENCODE_SIZE - 1) as f32;
        for (i, v) in t.iter_mut().enumerate() {
            *v = (srgb::oetf(i as f32 / max) * 255.0 + 0.5) as u8;
        }
        t
    })
}

/// Decodes an sRGB byte to linear light.
#[inline]
pub fn srgb_to_linear_fast(v: u8) -> f32 {
    decode_table()[v as usize]
}

/// Encodes linear light to an sRGB byte. Input is clamped to [0, 1];
/// NaN maps to 0.
#[inline]
pub fn linear_to_srgb_fast(l: f32) -> u8 {
    let max = (ENCODE_SIZE - 1) as f32;
    let idx = (l.clamp(0.0, 1.0) * max + 0.5) as usize;
    encode_table()[idx.min(ENCODE_SIZE - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_bound() {
        for i in 0..=255u8 {
            let reference = srgb::eotf(i as f32 / 255.0);
            let fast = srgb_to_linear_fast(i);
            assert!((fast - reference).abs() <= 1e-4, "i={i}");
        }
    }

    #[test]
    fn test_encode_error_bound() {
        for i in 0..=10_000 {
            let l = i as f32 / 10_000.0;
            let reference = (srgb::oetf(l) * 255.0 + 0.5) as i32;
            let fast = linear_to_srgb_fast(l) as i32;
            assert!((fast - reference).abs() <= 1, "l={l}: {fast} vs {reference}");
        }
    }

    #[test]
    fn test_encode_clamps() {
        assert_eq!(linear_to_srgb_fast(-1.0), 0);
        assert_eq!(linear_to_srgb_fast(2.0), 255);
        assert_eq!(linear_to_srgb_fast(f32::NAN), 0);
    }

    #[test]
    fn test_byte_roundtrip() {
        for i in 0..=255u8 {
            assert_eq!(linear_to_srgb_fast(srgb_to_linear_fast(i)), i, "i={i}");
        }
    }
}
