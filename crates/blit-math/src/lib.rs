//! # blit-math
//!
//! Numeric primitives for blit-rs pixel compositing.
//!
//! - [`fixed`] - Fast and exact division by 255 for 8-bit channel math
//! - [`lanes`] - [`U16x16`] integer lanes and [`F32x8`] float lanes
//!
//! # Design
//!
//! All channel math promotes bytes to `u16` before multiplying; a product of
//! two channels never exceeds 65025 and always fits.
//!
//! ```rust
//! use blit_math::{mul_div255, U16x16};
//!
//! assert_eq!(mul_div255(255, 128), 128);
//! let lanes = U16x16::mul_div255(U16x16::splat(255), U16x16::splat(128));
//! assert_eq!(lanes, U16x16::splat(128));
//! ```
//!
//! # Dependencies
//!
//! - [`wide`] - Portable SIMD `f32x8`
//!
//! # Used By
//!
//! - `blit-ops` - Scalar and batch blend algebra

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod fixed;
pub mod lanes;

pub use fixed::*;
pub use lanes::{F32x8, LANES, U16x16};
