//! # blit-transfer
//!
//! sRGB transfer functions for blending in linear light.
//!
//! - [`srgb`] - Reference `powf` EOTF/OETF
//! - [`lut`] - Lookup-table conversions for 8-bit channels
//!
//! # Usage
//!
//! ```rust
//! use blit_transfer::{srgb_to_linear_fast, linear_to_srgb_fast};
//!
//! let linear = srgb_to_linear_fast(200);
//! let encoded = linear_to_srgb_fast(linear);
//! assert_eq!(encoded, 200);
//! ```
//!
//! # Used By
//!
//! - `blit-ops` - Linear-space blend wrapper

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod lut;
pub mod srgb;

pub use lut::{linear_to_srgb_fast, srgb_to_linear_fast};
pub use srgb::{eotf as srgb_eotf, oetf as srgb_oetf};
