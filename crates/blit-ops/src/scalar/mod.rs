//! Per-pixel blend algebra on premultiplied RGBA8.
//!
//! - [`porter_duff`] - 14 compositing operators
//! - [`separable`] - 11 per-channel modes
//! - [`non_separable`] - 4 HSL-derived modes
//!
//! [`blend_func`] is the single place a [`BlendMode`] is turned into a
//! function. The match is exhaustive, so a new mode does not compile until
//! it is wired here.
//!
//! # Example
//!
//! ```rust
//! use blit_ops::{blend_func, BlendMode};
//!
//! let f = blend_func(BlendMode::Multiply);
//! let out = f([128, 128, 128, 255], [255, 0, 255, 255]);
//! assert_eq!(out, [128, 0, 128, 255]);
//! ```

pub mod non_separable;
pub mod porter_duff;
pub mod separable;

use crate::BlendMode;

/// One premultiplied RGBA8 pixel.
pub type Rgba8 = [u8; 4];

/// Scalar blend function: `(src, dst) -> result`, all premultiplied.
pub type BlendFn = fn(src: Rgba8, dst: Rgba8) -> Rgba8;

/// Resolves a blend mode to its scalar function.
pub fn blend_func(mode: BlendMode) -> BlendFn {
    use non_separable as ns;
    use porter_duff as pd;
    use separable as sep;

    match mode {
        BlendMode::Clear => pd::clear,
        BlendMode::Source => pd::source,
        BlendMode::Destination => pd::destination,
        BlendMode::SourceOver => pd::source_over,
        BlendMode::DestinationOver => pd::destination_over,
        BlendMode::SourceIn => pd::source_in,
        BlendMode::DestinationIn => pd::destination_in,
        BlendMode::SourceOut => pd::source_out,
        BlendMode::DestinationOut => pd::destination_out,
        BlendMode::SourceAtop => pd::source_atop,
        BlendMode::DestinationAtop => pd::destination_atop,
        BlendMode::Xor => pd::xor,
        BlendMode::Plus => pd::plus,
        BlendMode::Modulate => pd::modulate,
        BlendMode::Multiply => sep::multiply,
        BlendMode::Screen => sep::screen,
        BlendMode::Overlay => sep::overlay,
        BlendMode::Darken => sep::darken,
        BlendMode::Lighten => sep::lighten,
        BlendMode::ColorDodge => sep::color_dodge,
        BlendMode::ColorBurn => sep::color_burn,
        BlendMode::HardLight => sep::hard_light,
        BlendMode::SoftLight => sep::soft_light,
        BlendMode::Difference => sep::difference,
        BlendMode::Exclusion => sep::exclusion,
        BlendMode::Hue => ns::hue,
        BlendMode::Saturation => ns::saturation,
        BlendMode::Color => ns::color,
        BlendMode::Luminosity => ns::luminosity,
    }
}

/// Resolves a raw mode ordinal; out-of-range values get source-over.
#[inline]
pub fn blend_func_by_index(index: u8) -> BlendFn {
    blend_func(BlendMode::from_index(index))
}

/// Modes whose result is not the destination when the source is fully
/// transparent.
pub const CLEARS_ON_TRANSPARENT_SOURCE: [BlendMode; 7] = [
    BlendMode::Clear,
    BlendMode::Source,
    BlendMode::SourceIn,
    BlendMode::DestinationIn,
    BlendMode::SourceOut,
    BlendMode::DestinationAtop,
    BlendMode::Modulate,
];

#[cfg(test)]
mod tests {
    use super::*;

    fn fixtures() -> Vec<Rgba8> {
        let mut out = vec![[0, 0, 0, 0], [255, 255, 255, 255], [0, 0, 0, 255]];
        for a in [1u8, 64, 128, 200, 255] {
            for c in [0u8, 1, 77, 180, 255] {
                let c = c.min(a);
                out.push([c, a / 2, a.saturating_sub(c), a]);
            }
        }
        out
    }

    #[test]
    fn test_transparent_source_keeps_destination() {
        let clear = [0, 0, 0, 0];
        for mode in BlendMode::ALL {
            if CLEARS_ON_TRANSPARENT_SOURCE.contains(&mode) {
                continue;
            }
            let f = blend_func(mode);
            for dst in fixtures() {
                assert_eq!(f(clear, dst), dst, "{mode} dst={dst:?}");
            }
        }
    }

    #[test]
    fn test_index_dispatch_defaults() {
        let by_index = blend_func_by_index(99);
        let over = blend_func(BlendMode::SourceOver);
        let (s, d) = ([10, 20, 30, 40], [200, 100, 50, 255]);
        assert_eq!(by_index(s, d), over(s, d));
    }

    #[test]
    fn test_every_mode_is_total() {
        // Non-premultiplied input is allowed and must not panic.
        for mode in BlendMode::ALL {
            let f = blend_func(mode);
            for s in [[255, 255, 255, 1], [0, 0, 0, 0], [200, 10, 90, 30]] {
                for d in [[255, 0, 255, 2], [0, 0, 0, 255], [90, 90, 90, 90]] {
                    let _ = f(s, d);
                }
            }
        }
    }

    #[test]
    fn test_opaque_output_alpha() {
        let s = [30, 60, 90, 255];
        let d = [200, 150, 100, 255];
        for mode in BlendMode::ALL {
            let out = blend_func(mode)(s, d);
            match mode {
                BlendMode::Clear => assert_eq!(out[3], 0),
                BlendMode::SourceOut | BlendMode::DestinationOut | BlendMode::Xor => {
                    assert_eq!(out[3], 0, "{mode}")
                }
                _ => assert_eq!(out[3], 255, "{mode}"),
            }
        }
    }
}
