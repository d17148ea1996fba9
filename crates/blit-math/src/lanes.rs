//! Fixed-width lane vectors for batch pixel math.
//!
//! - [`U16x16`] - 16 lanes of `u16`, one lane per pixel, for integer channel
//!   math. It is a plain aligned array; every operation is a 16-step loop
//!   that the compiler auto-vectorizes (two AVX2 registers, or four SSE2).
//! - [`F32x8`] - 8 lanes of `f32` from the `wide` crate, used for
//!   float-precision work on two RGBA pixels at a time.
//!
//! Integer lane arithmetic saturates instead of wrapping, so a formula fed
//! out-of-range input degrades to 0 or `u16::MAX` rather than garbage.
//!
//! # Example
//!
//! ```rust
//! use blit_math::lanes::U16x16;
//!
//! let s = U16x16::splat(200);
//! let d = U16x16::splat(100);
//! let out = U16x16::mul_div255(s, d);
//! assert_eq!(out.lane(0), 78);
//! ```

use std::ops::{Add, Sub, Mul};

pub use wide::f32x8 as F32x8;

/// Number of lanes in [`U16x16`], and pixels per batch.
pub const LANES: usize = 16;

/// 16 lanes of `u16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(C, align(32))]
pub struct U16x16(pub [u16; LANES]);

impl U16x16 {
    /// All lanes set to `v`.
    #[inline(always)]
    pub const fn splat(v: u16) -> Self {
        Self([v; LANES])
    }

    /// Lane values as an array.
    #[inline(always)]
    pub const fn to_array(self) -> [u16; LANES] {
        self.0
    }

    /// Value of lane `i`.
    #[inline(always)]
    pub const fn lane(&self, i: usize) -> u16 {
        self.0[i]
    }

    /// Mutable lane storage.
    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [u16; LANES] {
        &mut self.0
    }

    #[inline(always)]
    fn map2(a: Self, b: Self, f: impl Fn(u16, u16) -> u16) -> Self {
        let mut out = [0u16; LANES];
        for i in 0..LANES {
            out[i] = f(a.0[i], b.0[i]);
        }
        Self(out)
    }

    #[inline(always)]
    fn map(self, f: impl Fn(u16) -> u16) -> Self {
        let mut out = [0u16; LANES];
        for i in 0..LANES {
            out[i] = f(self.0[i]);
        }
        Self(out)
    }

    /// Lane-wise minimum.
    #[inline(always)]
    pub fn min(self, other: Self) -> Self {
        Self::map2(self, other, u16::min)
    }

    /// Lane-wise maximum.
    #[inline(always)]
    pub fn max(self, other: Self) -> Self {
        Self::map2(self, other, u16::max)
    }

    /// Clamps every lane to at most `hi`.
    #[inline(always)]
    pub fn clamp_max(self, hi: u16) -> Self {
        self.map(|v| v.min(hi))
    }

    /// `255 - v` per lane (0 for lanes above 255).
    #[inline(always)]
    pub fn inv(self) -> Self {
        self.map(|v| 255u16.saturating_sub(v))
    }

    /// Rounded division by 255, exact to nearest for inputs up to 65025.
    ///
    /// Uses `(t + (t >> 8)) >> 8` with `t = x + 128`, which differs from the
    /// scalar `(x + 255) >> 8` by at most one.
    #[inline(always)]
    pub fn div255(self) -> Self {
        self.map(|v| {
            let t = v as u32 + 128;
            ((t + (t >> 8)) >> 8) as u16
        })
    }

    /// `div255(a * b)` per lane.
    #[inline(always)]
    pub fn mul_div255(a: Self, b: Self) -> Self {
        (a * b).div255()
    }

    /// Per lane: `if a <= b { if_le } else { otherwise }`.
    #[inline(always)]
    pub fn select_le(a: Self, b: Self, if_le: Self, otherwise: Self) -> Self {
        let mut out = [0u16; LANES];
        for i in 0..LANES {
            out[i] = if a.0[i] <= b.0[i] {
                if_le.0[i]
            } else {
                otherwise.0[i]
            };
        }
        Self(out)
    }
}

impl From<[u16; LANES]> for U16x16 {
    #[inline(always)]
    fn from(v: [u16; LANES]) -> Self {
        Self(v)
    }
}

impl Add for U16x16 {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self::map2(self, rhs, u16::saturating_add)
    }
}

impl Sub for U16x16 {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self::map2(self, rhs, u16::saturating_sub)
    }
}

impl Mul for U16x16 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self::map2(self, rhs, u16::saturating_mul)
    }
}

/// Loads two premultiplied RGBA8 pixels into one vector as unit floats.
///
/// Lanes 0..4 hold `a`, lanes 4..8 hold `b`.
#[inline]
pub fn unit_from_pixels(a: [u8; 4], b: [u8; 4]) -> F32x8 {
    let v = F32x8::from([
        a[0] as f32, a[1] as f32, a[2] as f32, a[3] as f32,
        b[0] as f32, b[1] as f32, b[2] as f32, b[3] as f32,
    ]);
    v * F32x8::splat(1.0 / 255.0)
}

/// Converts a unit-float vector back to two RGBA8 pixels, clamping to
/// [0, 1] and rounding half up.
#[inline]
pub fn pixels_from_unit(v: F32x8) -> ([u8; 4], [u8; 4]) {
    let scaled = v.max(F32x8::splat(0.0)).min(F32x8::splat(1.0)) * F32x8::splat(255.0)
        + F32x8::splat(0.5);
    let s = scaled.to_array();
    (
        [s[0] as u8, s[1] as u8, s[2] as u8, s[3] as u8],
        [s[4] as u8, s[5] as u8, s[6] as u8, s[7] as u8],
    )
}

/// Divides the color lanes of both pixels by their alpha lane.
///
/// Pixels with zero alpha come back with zero color.
#[inline]
pub fn unpremultiply_x8(v: F32x8) -> F32x8 {
    let a = v.to_array();
    let inv = |alpha: f32| if alpha > 0.0 { 1.0 / alpha } else { 0.0 };
    let (ia, ib) = (inv(a[3]), inv(a[7]));
    v * F32x8::from([ia, ia, ia, 1.0, ib, ib, ib, 1.0])
}

/// Multiplies the color lanes of both pixels by their alpha lane.
#[inline]
pub fn premultiply_x8(v: F32x8) -> F32x8 {
    let a = v.to_array();
    v * F32x8::from([a[3], a[3], a[3], 1.0, a[7], a[7], a[7], 1.0])
}
