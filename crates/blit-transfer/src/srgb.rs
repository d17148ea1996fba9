//! sRGB transfer function.
//!
//! Piecewise curve: a linear segment near black and a 2.4 power segment
//! above it.
//!
//! # Range
//!
//! - Input/Output: [0, 1]
//!
//! # Reference
//!
//! IEC 61966-2-1:1999

/// Encoded value below which the EOTF is linear.
pub const EOTF_BREAK: f32 = 0.04045;

/// Linear value below which the OETF is linear.
pub const OETF_BREAK: f32 = 0.003_130_8;

/// sRGB EOTF: encoded [0, 1] to linear [0, 1].
///
/// ```text
/// if V <= 0.04045:
///     L = V / 12.92
/// else:
///     L = ((V + 0.055) / 1.055)^2.4
/// ```
///
/// # Example
///
/// ```rust
/// use blit_transfer::srgb::eotf;
///
/// let linear = eotf(0.5);
/// assert!((linear - 0.214).abs() < 0.01);
/// ```
#[inline]
pub fn eotf(v: f32) -> f32 {
    if v <= EOTF_BREAK {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// sRGB OETF: linear [0, 1] to encoded [0, 1].
///
/// ```text
/// if L <= 0.0031308:
///     V = L * 12.92
/// else:
///     V = 1.055 * L^(1/2.4) - 0.055
/// ```
#[inline]
pub fn oetf(l: f32) -> f32 {
    if l <= OETF_BREAK {
        l * 12.92
    } else {
        1.055 * l.powf(1.0 / 2.4) - 0.055
    }
}
