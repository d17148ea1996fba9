//! # blit-core
//!
//! Core types for blit-rs pixel compositing.
//!
//! - [`Pixmap`] - Premultiplied RGBA8 image buffer
//! - [`PixmapPool`] - Thread-safe, size-bucketed buffer reuse
//! - [`Rect`] - Signed rectangle for layer bounds and clipping
//! - [`Error`] - Dimension and bounds failures
//!
//! ## Crate Structure
//!
//! ```text
//! blit-core (this crate)
//!    ^
//!    |
//!    +-- blit-ops (blend algebra, layers)
//!    +-- blit-bench
//! ```
//!
//! `blit-math` and `blit-transfer` have no dependency on this crate.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod pixmap;
pub mod pool;
pub mod rect;

pub use error::*;
pub use pixmap::{BYTES_PER_PIXEL, Pixmap, premultiply, unpremultiply};
pub use pool::{DEFAULT_MAX_PER_SIZE, PixmapPool};
pub use rect::*;

/// Prelude module for convenient imports.
///
/// ```
/// use blit_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::pixmap::Pixmap;
    pub use crate::pool::PixmapPool;
    pub use crate::rect::Rect;
}
