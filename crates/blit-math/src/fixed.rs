//! Fixed-point division by 255.
//!
//! Every premultiplied blend formula multiplies two bytes and divides by
//! 255. Integer division is slow, so the hot path uses a shift-based
//! approximation that is at most one unit high:
//!
//! ```text
//! div255(x)       = (x + 255) >> 8              error in {0, +1}
//! div255_exact(x) = (t + (t >> 8)) >> 8, t = x + 1   exact floor(x / 255)
//! ```
//!
//! The exact form is kept as a correctness oracle for tests and for callers
//! that need bit-exact results.
//!
//! # Example
//!
//! ```rust
//! use blit_math::fixed::{mul_div255, mul_div255_exact};
//!
//! assert_eq!(mul_div255(255, 255), 255);
//! assert_eq!(mul_div255(128, 255), 128);
//! let diff = mul_div255(200, 100) - mul_div255_exact(200, 100);
//! assert!(diff <= 1);
//! ```

/// Largest product of two channel values.
pub const MAX_PRODUCT: u16 = 255 * 255;

/// Approximates `x / 255` with `(x + 255) >> 8`.
///
/// Never below the exact floor and at most one above it for
/// `x <= 65025`.
#[inline(always)]
pub const fn div255(x: u16) -> u16 {
    (x + 255) >> 8
}

/// Exact `floor(x / 255)` for `x <= 65025`.
#[inline(always)]
pub const fn div255_exact(x: u16) -> u16 {
    let t = x as u32 + 1;
    ((t + (t >> 8)) >> 8) as u16
}

/// `a * b / 255` using [`div255`].
#[inline(always)]
pub const fn mul_div255(a: u8, b: u8) -> u8 {
    div255(a as u16 * b as u16) as u8
}

/// `a * b / 255` using [`div255_exact`].
#[inline(always)]
pub const fn mul_div255_exact(a: u8, b: u8) -> u8 {
    div255_exact(a as u16 * b as u16) as u8
}

/// `255 - x`.
#[inline(always)]
pub const fn inv255(x: u8) -> u8 {
    255 - x
}

/// Adds two channel values, saturating at 255.
#[inline(always)]
pub const fn add_div255(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

/// Adds two widened channel values and clamps the sum to 255.
#[inline(always)]
pub const fn add_clamp(a: u16, b: u16) -> u16 {
    let sum = a.saturating_add(b);
    if sum > 255 { 255 } else { sum }
}

/// Scales a channel by an opacity in [0, 1], rounding to nearest.
#[inline]
pub fn scale_unit(c: u8, opacity: f32) -> u8 {
    (c as f32 * opacity.clamp(0.0, 1.0) + 0.5) as u8
}
