//! Non-separable blend modes (Hue, Saturation, Color, Luminosity).
//!
//! These work on whole RGB triples in unit range, built from four
//! primitives:
//!
//! ```text
//! Lum(C)        = 0.30 R + 0.59 G + 0.11 B
//! Sat(C)        = max(C) - min(C)
//! SetLum(C, l)  = ClipColor(C + (l - Lum(C)))
//! SetSat(C, s)  = min -> 0, mid -> (mid - min) s / (max - min), max -> s
//!
//! Hue        = SetLum(SetSat(Cs, Sat(Cd)), Lum(Cd))
//! Saturation = SetLum(SetSat(Cd, Sat(Cs)), Lum(Cd))
//! Color      = SetLum(Cs, Lum(Cd))
//! Luminosity = SetLum(Cd, Lum(Cs))
//! ```

use blit_math::{add_div255, inv255, mul_div255};

use super::Rgba8;

/// RGB triple in unit range.
pub type Rgb = [f32; 3];

/// Whole-color blend function on unpremultiplied unit RGB.
pub type ColorFn = fn(src: Rgb, dst: Rgb) -> Rgb;

const EPSILON: f32 = 1e-6;

/// Luminance with the 0.30 / 0.59 / 0.11 weights.
#[inline]
pub fn lum(c: Rgb) -> f32 {
    0.30 * c[0] + 0.59 * c[1] + 0.11 * c[2]
}

/// Saturation: spread between the largest and smallest component.
#[inline]
pub fn sat(c: Rgb) -> f32 {
    c[0].max(c[1]).max(c[2]) - c[0].min(c[1]).min(c[2])
}

/// Pulls out-of-range components back toward the luminance.
///
/// The low side is corrected first; the high side is then checked against
/// the already corrected components.
pub fn clip_color(c: Rgb) -> Rgb {
    let l = lum(c);
    let mut c = c;

    let n = c[0].min(c[1]).min(c[2]);
    if n < 0.0 && l - n > EPSILON {
        let k = l / (l - n);
        c = c.map(|v| l + (v - l) * k);
    }

    let x = c[0].max(c[1]).max(c[2]);
    if x > 1.0 && x - l > EPSILON {
        let k = (1.0 - l) / (x - l);
        c = c.map(|v| l + (v - l) * k);
    }

    c
}

/// Shifts the color to luminance `l`, then clips.
#[inline]
pub fn set_lum(c: Rgb, l: f32) -> Rgb {
    let delta = l - lum(c);
    clip_color(c.map(|v| v + delta))
}

/// Slot indices of the smallest, middle and largest component.
#[inline]
fn order(c: Rgb) -> [usize; 3] {
    let mut idx = [0usize, 1, 2];
    if c[idx[0]] > c[idx[1]] {
        idx.swap(0, 1);
    }
    if c[idx[1]] > c[idx[2]] {
        idx.swap(1, 2);
    }
    if c[idx[0]] > c[idx[1]] {
        idx.swap(0, 1);
    }
    idx
}

/// Rescales the color to saturation `s`, keeping hue.
///
/// A gray input has no hue to preserve and is returned unchanged.
pub fn set_sat(c: Rgb, s: f32) -> Rgb {
    let [lo, mid, hi] = order(c);
    let range = c[hi] - c[lo];
    if range <= 0.0 {
        return c;
    }

    let mut out = [0.0f32; 3];
    out[mid] = (c[mid] - c[lo]) * s / range;
    out[hi] = s;
    out[lo] = 0.0;
    out
}

/// Hue of source, saturation and luminosity of destination.
#[inline]
pub fn hue_rgb(src: Rgb, dst: Rgb) -> Rgb {
    set_lum(set_sat(src, sat(dst)), lum(dst))
}

/// Saturation of source, hue and luminosity of destination.
#[inline]
pub fn saturation_rgb(src: Rgb, dst: Rgb) -> Rgb {
    set_lum(set_sat(dst, sat(src)), lum(dst))
}

/// Hue and saturation of source, luminosity of destination.
#[inline]
pub fn color_rgb(src: Rgb, dst: Rgb) -> Rgb {
    set_lum(src, lum(dst))
}

/// Luminosity of source, hue and saturation of destination.
#[inline]
pub fn luminosity_rgb(src: Rgb, dst: Rgb) -> Rgb {
    set_lum(dst, lum(src))
}

/// Lifts a whole-color function to premultiplied RGBA8.
///
/// Same early-outs and compositing identity as
/// [`separable_blend`](super::separable::separable_blend); the blended term
/// is rounded half up.
pub fn non_separable_blend(src: Rgba8, dst: Rgba8, f: ColorFn) -> Rgba8 {
    let (sa, da) = (src[3], dst[3]);
    if sa == 0 {
        return dst;
    }
    if da == 0 {
        return src;
    }

    let (saf, daf) = (sa as f32, da as f32);
    let s: Rgb = [0, 1, 2].map(|i| src[i] as f32 / saf);
    let d: Rgb = [0, 1, 2].map(|i| dst[i] as f32 / daf);
    let b = f(s, d);

    let isa = inv255(sa);
    let ida = inv255(da);
    let weight = (saf / 255.0) * (daf / 255.0) * 255.0;

    let mut out = [0u8; 4];
    for i in 0..3 {
        let keep = add_div255(mul_div255(isa, dst[i]), mul_div255(ida, src[i]));
        let blended = (weight * b[i].clamp(0.0, 1.0) + 0.5) as u8;
        out[i] = add_div255(keep, blended);
    }
    out[3] = add_div255(sa, mul_div255(da, isa));
    out
}

/// Hue blend mode.
#[inline]
pub fn hue(src: Rgba8, dst: Rgba8) -> Rgba8 {
    non_separable_blend(src, dst, hue_rgb)
}

/// Saturation blend mode.
#[inline]
pub fn saturation(src: Rgba8, dst: Rgba8) -> Rgba8 {
    non_separable_blend(src, dst, saturation_rgb)
}

/// Color blend mode.
#[inline]
pub fn color(src: Rgba8, dst: Rgba8) -> Rgba8 {
    non_separable_blend(src, dst, color_rgb)
}

/// Luminosity blend mode.
#[inline]
pub fn luminosity(src: Rgba8, dst: Rgba8) -> Rgba8 {
    non_separable_blend(src, dst, luminosity_rgb)
}
