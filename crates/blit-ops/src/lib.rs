//! # blit-ops
//!
//! Pixel blending and layer compositing on premultiplied RGBA8.
//!
//! # Modules
//!
//! - [`mode`] - The 29 blend modes
//! - [`scalar`] - Per-pixel blend functions
//! - [`batch`] - 16-pixel kernels and span blending
//! - [`linear`] - Blending in linear light
//! - [`layer`] - Layers and layer stacks
//! - `parallel` - Row-parallel span blending (feature `parallel`)
//!
//! # Example
//!
//! ```rust
//! use blit_ops::{blend_batch, blend_func, BlendMode};
//!
//! // One pixel
//! let over = blend_func(BlendMode::SourceOver);
//! assert_eq!(over([0, 0, 0, 0], [9, 8, 7, 255]), [9, 8, 7, 255]);
//!
//! // A span
//! let src = vec![0u8, 0, 255, 255].repeat(40);
//! let mut dst = vec![255u8; 40 * 4];
//! blend_batch(&mut dst, &src, 40, BlendMode::Multiply).unwrap();
//! assert_eq!(&dst[..4], &[0, 0, 255, 255]);
//! ```
//!
//! # Thread safety
//!
//! Blend functions keep no state. Concurrent calls are fine as long as
//! their destination ranges do not overlap. A [`LayerStack`] belongs to a
//! single thread; the [`PixmapPool`](blit_core::PixmapPool) behind it is
//! shareable.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod batch;
pub mod layer;
pub mod linear;
pub mod mode;
pub mod scalar;

#[cfg(feature = "parallel")]
pub mod parallel;

pub use batch::{BatchBlendFn, BatchState, batch_blend_func, blend_batch, blend_batch_aligned};
pub use error::{OpsError, OpsResult};
pub use layer::{Layer, LayerStack, composite_layer};
pub use linear::{LinearBlend, blend_func_linear, blend_linear};
pub use mode::{BlendFamily, BlendMode};
pub use scalar::{BlendFn, Rgba8, blend_func};
