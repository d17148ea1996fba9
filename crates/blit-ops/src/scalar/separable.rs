//! Separable blend modes.
//!
//! A separable mode is a per-channel function `B(s, d)` defined on
//! unpremultiplied color. [`separable_blend`] lifts it to premultiplied
//! pixels with the compositing identity
//!
//! ```text
//! C  = (1 - Sa) D + (1 - Da) S + Sa Da B(s, d)
//! Ca = Sa + Da (1 - Sa)
//! ```
//!
//! where `S`, `D` are premultiplied and `s`, `d` are unpremultiplied.

use blit_math::{add_div255, div255, inv255, mul_div255};

use super::Rgba8;

/// Per-channel blend function on unpremultiplied bytes.
pub type ChannelFn = fn(s: u8, d: u8) -> u8;

/// Channel divided by its alpha, 0 when alpha is 0.
#[inline(always)]
pub(crate) fn unpremultiply_channel(c: u8, a: u8) -> u8 {
    if a == 0 {
        return 0;
    }
    (c as u16 * 255 / a as u16).min(255) as u8
}

/// Applies a per-channel function through the compositing identity.
///
/// A fully transparent operand leaves the other one untouched: `Sa = 0`
/// returns `dst`, `Da = 0` returns `src`.
#[inline]
pub fn separable_blend(src: Rgba8, dst: Rgba8, b: ChannelFn) -> Rgba8 {
    let (sa, da) = (src[3], dst[3]);
    if sa == 0 {
        return dst;
    }
    if da == 0 {
        return src;
    }

    let isa = inv255(sa);
    let ida = inv255(da);
    let both = mul_div255(sa, da);

    let mut out = [0u8; 4];
    for i in 0..3 {
        let s = unpremultiply_channel(src[i], sa);
        let d = unpremultiply_channel(dst[i], da);
        let keep = add_div255(mul_div255(isa, dst[i]), mul_div255(ida, src[i]));
        out[i] = add_div255(keep, mul_div255(both, b(s, d)));
    }
    out[3] = add_div255(sa, mul_div255(da, isa));
    out
}

/// Per-channel functions `B(s, d)`.
pub mod channel {
    use super::*;

    /// `s * d`
    #[inline]
    pub fn multiply(s: u8, d: u8) -> u8 {
        mul_div255(s, d)
    }

    /// `1 - (1 - s)(1 - d)`
    #[inline]
    pub fn screen(s: u8, d: u8) -> u8 {
        255 - mul_div255(255 - s, 255 - d)
    }

    /// Hard light with operands swapped.
    #[inline]
    pub fn overlay(s: u8, d: u8) -> u8 {
        hard_light(d, s)
    }

    /// `min(s, d)`
    #[inline]
    pub fn darken(s: u8, d: u8) -> u8 {
        s.min(d)
    }

    /// `max(s, d)`
    #[inline]
    pub fn lighten(s: u8, d: u8) -> u8 {
        s.max(d)
    }

    /// `d / (1 - s)`, saturating.
    #[inline]
    pub fn color_dodge(s: u8, d: u8) -> u8 {
        if d == 0 {
            0
        } else if s == 255 {
            255
        } else {
            (d as u32 * 255 / (255 - s) as u32).min(255) as u8
        }
    }

    /// `1 - (1 - d) / s`, saturating.
    #[inline]
    pub fn color_burn(s: u8, d: u8) -> u8 {
        if d == 255 {
            255
        } else if s == 0 {
            0
        } else {
            255 - ((255 - d) as u32 * 255 / s as u32).min(255) as u8
        }
    }

    /// Multiply for dark source, screen for light source.
    #[inline]
    pub fn hard_light(s: u8, d: u8) -> u8 {
        if s <= 128 {
            div255(2 * s as u16 * d as u16) as u8
        } else {
            screen((2 * s as u16 - 255) as u8, d)
        }
    }

    /// W3C soft light.
    ///
    /// ```text
    /// s <= 0.5: d - (1 - 2s) d (1 - d)
    /// s >  0.5: d + (2s - 1)(D(d) - d)
    ///           D(d) = ((16d - 12) d + 4) d   if d <= 0.25
    ///                  sqrt(d)                otherwise
    /// ```
    #[inline]
    pub fn soft_light(s: u8, d: u8) -> u8 {
        let s = s as f32 / 255.0;
        let d = d as f32 / 255.0;
        let r = if s <= 0.5 {
            d - (1.0 - 2.0 * s) * d * (1.0 - d)
        } else {
            let dd = if d <= 0.25 {
                ((16.0 * d - 12.0) * d + 4.0) * d
            } else {
                d.sqrt()
            };
            d + (2.0 * s - 1.0) * (dd - d)
        };
        (r * 255.0 + 0.5) as u8
    }

    /// `|s - d|`
    #[inline]
    pub fn difference(s: u8, d: u8) -> u8 {
        s.abs_diff(d)
    }

    /// `s + d - 2 s d`
    #[inline]
    pub fn exclusion(s: u8, d: u8) -> u8 {
        let v = s as i32 + d as i32 - 2 * mul_div255(s, d) as i32;
        v.clamp(0, 255) as u8
    }
}

macro_rules! separable_modes {
    ($($(#[$doc:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            #[inline]
            pub fn $name(src: Rgba8, dst: Rgba8) -> Rgba8 {
                separable_blend(src, dst, channel::$name)
            }
        )*
    };
}

separable_modes!(
    /// Multiply blend mode.
    multiply,
    /// Screen blend mode.
    screen,
    /// Overlay blend mode.
    overlay,
    /// Darken blend mode.
    darken,
    /// Lighten blend mode.
    lighten,
    /// Color dodge blend mode.
    color_dodge,
    /// Color burn blend mode.
    color_burn,
    /// Hard light blend mode.
    hard_light,
    /// Soft light blend mode.
    soft_light,
    /// Difference blend mode.
    difference,
    /// Exclusion blend mode.
    exclusion,
);
