//! Blending in linear light.
//!
//! Blending sRGB-encoded bytes directly darkens mid-tone mixtures. The
//! wrapper here moves both operands to linear light before calling the
//! scalar function and re-encodes the result:
//!
//! ```text
//! bytes -> unit -> unpremultiply -> sRGB decode (RGB) -> premultiply -> bytes
//!       -> blend
//!       -> unit -> unpremultiply -> sRGB encode (RGB) -> premultiply -> bytes
//! ```
//!
//! Alpha never passes through the transfer function, so the output alpha
//! matches the plain blend exactly.
//!
//! # Example
//!
//! ```rust
//! use blit_ops::{blend_func_linear, BlendMode};
//!
//! let gray = [128, 128, 128, 255];
//! let plain = blend_func_linear(BlendMode::Multiply, false).apply(gray, gray);
//! let linear = blend_func_linear(BlendMode::Multiply, true).apply(gray, gray);
//! assert_eq!(plain[3], linear[3]);
//! assert!(linear[0] < plain[0]);
//! ```

use blit_math::F32x8;
use blit_math::lanes::{pixels_from_unit, premultiply_x8, unit_from_pixels, unpremultiply_x8};
use blit_transfer::{linear_to_srgb_fast, srgb_to_linear_fast};

use crate::BlendMode;
use crate::scalar::{BlendFn, Rgba8, blend_func};

/// A scalar blend function, optionally evaluated in linear light.
#[derive(Debug, Clone, Copy)]
pub struct LinearBlend {
    func: BlendFn,
    linear: bool,
}

impl LinearBlend {
    /// Wraps `func`; `linear` selects linear-light evaluation.
    pub fn new(func: BlendFn, linear: bool) -> Self {
        Self { func, linear }
    }

    /// Returns `true` if blending happens in linear light.
    #[inline]
    pub fn is_linear(&self) -> bool {
        self.linear
    }

    /// The wrapped scalar function.
    #[inline]
    pub fn func(&self) -> BlendFn {
        self.func
    }

    /// Blends one premultiplied pixel pair.
    #[inline]
    pub fn apply(&self, src: Rgba8, dst: Rgba8) -> Rgba8 {
        if self.linear {
            blend_linear(self.func, src, dst)
        } else {
            (self.func)(src, dst)
        }
    }
}

/// Resolves a mode, optionally wrapped for linear-light blending.
pub fn blend_func_linear(mode: BlendMode, use_linear: bool) -> LinearBlend {
    LinearBlend::new(blend_func(mode), use_linear)
}

/// Replaces the RGB lanes of both pixels, leaving alpha lanes alone.
#[inline]
fn map_rgb(v: F32x8, f: impl Fn(f32) -> f32) -> F32x8 {
    let mut a = v.to_array();
    for i in [0, 1, 2, 4, 5, 6] {
        a[i] = f(a[i]);
    }
    F32x8::from(a)
}

/// Premultiplied sRGB pair to premultiplied linear pair.
fn decode_pair(src: Rgba8, dst: Rgba8) -> (Rgba8, Rgba8) {
    let (s, d) = pixels_from_unit(unpremultiply_x8(unit_from_pixels(src, dst)));
    let linear = map_rgb(unit_from_pixels(s, d), |v| {
        srgb_to_linear_fast((v * 255.0 + 0.5) as u8)
    });
    pixels_from_unit(premultiply_x8(linear))
}

/// Premultiplied linear pixel back to premultiplied sRGB.
fn encode(px: Rgba8) -> Rgba8 {
    let straight = unpremultiply_x8(unit_from_pixels(px, [0; 4]));
    let encoded = map_rgb(straight, |v| linear_to_srgb_fast(v) as f32 / 255.0);
    pixels_from_unit(premultiply_x8(encoded)).0
}

/// Applies `f` to the operands converted to linear light.
pub fn blend_linear(f: BlendFn, src: Rgba8, dst: Rgba8) -> Rgba8 {
    let (s, d) = decode_pair(src, dst);
    encode(f(s, d))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixtures() -> Vec<Rgba8> {
        vec![
            [0, 0, 0, 0],
            [255, 255, 255, 255],
            [128, 128, 128, 255],
            [200, 40, 10, 255],
            [64, 32, 16, 128],
            [1, 1, 1, 1],
            [10, 90, 30, 90],
        ]
    }

    #[test]
    fn test_alpha_matches_plain_for_every_mode() {
        for mode in BlendMode::ALL {
            let plain = blend_func_linear(mode, false);
            let linear = blend_func_linear(mode, true);
            for s in fixtures() {
                for d in fixtures() {
                    assert_eq!(
                        plain.apply(s, d)[3],
                        linear.apply(s, d)[3],
                        "{mode} s={s:?} d={d:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_plain_is_scalar() {
        let f = blend_func_linear(BlendMode::Screen, false);
        assert!(!f.is_linear());
        let (s, d) = ([10, 20, 30, 40], [50, 60, 70, 80]);
        assert_eq!(f.apply(s, d), blend_func(BlendMode::Screen)(s, d));
    }

    #[test]
    fn test_gray_multiply_is_darker_in_linear() {
        let gray = [128, 128, 128, 255];
        let plain = blend_func_linear(BlendMode::Multiply, false).apply(gray, gray);
        let linear = blend_func_linear(BlendMode::Multiply, true).apply(gray, gray);
        assert_eq!(plain, [64, 64, 64, 255]);
        assert!((58..=63).contains(&linear[0]), "{linear:?}");
        assert_eq!(linear[0], linear[1]);
        assert_eq!(linear[3], 255);
    }

    #[test]
    fn test_opaque_endpoints_survive() {
        let f = blend_func_linear(BlendMode::Source, true);
        for px in [[0, 0, 0, 255], [255, 255, 255, 255], [255, 0, 128, 255]] {
            assert_eq!(f.apply(px, [9, 9, 9, 255]), px);
        }
    }

    #[test]
    fn test_transparent_pixels() {
        let f = blend_func_linear(BlendMode::SourceOver, true);
        assert_eq!(f.apply([0, 0, 0, 0], [0, 0, 0, 0]), [0, 0, 0, 0]);
    }
}
