//! Porter-Duff operators on premultiplied RGBA8.
//!
//! Each operator is a closed-form combination of source `S`, destination
//! `D` and their alphas. Unless noted, alpha uses the same formula as the
//! color channels.
//!
//! | Operator | Result |
//! |----------|--------|
//! | clear | 0 |
//! | source | S |
//! | destination | D |
//! | source_over | S + D(1 - Sa) |
//! | destination_over | D + S(1 - Da) |
//! | source_in | S Da |
//! | destination_in | D Sa |
//! | source_out | S(1 - Da) |
//! | destination_out | D(1 - Sa) |
//! | source_atop | S Da + D(1 - Sa), alpha = Da |
//! | destination_atop | D Sa + S(1 - Da), alpha = Sa |
//! | xor | S(1 - Da) + D(1 - Sa) |
//! | plus | min(S + D, 1) |
//! | modulate | S D |

use blit_math::{add_div255, inv255, mul_div255};

use super::Rgba8;

#[inline(always)]
fn each(f: impl Fn(usize) -> u8) -> Rgba8 {
    [f(0), f(1), f(2), f(3)]
}

/// Transparent black.
#[inline]
pub fn clear(_src: Rgba8, _dst: Rgba8) -> Rgba8 {
    [0, 0, 0, 0]
}

/// Source replaces destination.
#[inline]
pub fn source(src: Rgba8, _dst: Rgba8) -> Rgba8 {
    src
}

/// Destination is kept.
#[inline]
pub fn destination(_src: Rgba8, dst: Rgba8) -> Rgba8 {
    dst
}

/// Normal alpha compositing.
///
/// # Example
///
/// ```rust
/// use blit_ops::scalar::porter_duff::source_over;
///
/// let red_half = [128, 0, 0, 128];
/// let white = [255, 255, 255, 255];
/// assert_eq!(source_over(red_half, white), [255, 127, 127, 255]);
/// ```
#[inline]
pub fn source_over(src: Rgba8, dst: Rgba8) -> Rgba8 {
    let isa = inv255(src[3]);
    each(|i| add_div255(src[i], mul_div255(dst[i], isa)))
}

/// Source placed behind destination.
#[inline]
pub fn destination_over(src: Rgba8, dst: Rgba8) -> Rgba8 {
    let ida = inv255(dst[3]);
    each(|i| add_div255(dst[i], mul_div255(src[i], ida)))
}

/// Source masked by destination alpha.
#[inline]
pub fn source_in(src: Rgba8, dst: Rgba8) -> Rgba8 {
    each(|i| mul_div255(src[i], dst[3]))
}

/// Destination masked by source alpha.
#[inline]
pub fn destination_in(src: Rgba8, dst: Rgba8) -> Rgba8 {
    each(|i| mul_div255(dst[i], src[3]))
}

/// Source masked by inverted destination alpha.
#[inline]
pub fn source_out(src: Rgba8, dst: Rgba8) -> Rgba8 {
    let ida = inv255(dst[3]);
    each(|i| mul_div255(src[i], ida))
}

/// Destination masked by inverted source alpha.
#[inline]
pub fn destination_out(src: Rgba8, dst: Rgba8) -> Rgba8 {
    let isa = inv255(src[3]);
    each(|i| mul_div255(dst[i], isa))
}

/// Source painted only where destination exists. Alpha is `Da`.
#[inline]
pub fn source_atop(src: Rgba8, dst: Rgba8) -> Rgba8 {
    let (da, isa) = (dst[3], inv255(src[3]));
    let c = |i: usize| add_div255(mul_div255(src[i], da), mul_div255(dst[i], isa));
    [c(0), c(1), c(2), da]
}

/// Destination painted only where source exists. Alpha is `Sa`.
#[inline]
pub fn destination_atop(src: Rgba8, dst: Rgba8) -> Rgba8 {
    let (sa, ida) = (src[3], inv255(dst[3]));
    let c = |i: usize| add_div255(mul_div255(dst[i], sa), mul_div255(src[i], ida));
    [c(0), c(1), c(2), sa]
}

/// Parts of source and destination that do not overlap.
#[inline]
pub fn xor(src: Rgba8, dst: Rgba8) -> Rgba8 {
    let (isa, ida) = (inv255(src[3]), inv255(dst[3]));
    each(|i| add_div255(mul_div255(src[i], ida), mul_div255(dst[i], isa)))
}

/// Saturating sum.
#[inline]
pub fn plus(src: Rgba8, dst: Rgba8) -> Rgba8 {
    each(|i| add_div255(src[i], dst[i]))
}

/// Channel-wise product.
#[inline]
pub fn modulate(src: Rgba8, dst: Rgba8) -> Rgba8 {
    each(|i| mul_div255(src[i], dst[i]))
}
