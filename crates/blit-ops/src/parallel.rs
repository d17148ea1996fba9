//! Row-parallel blending using Rayon.
//!
//! Rows of the destination never overlap, so each one can be blended on
//! its own thread through [`blend_batch`].
//!
//! # Example
//!
//! ```rust
//! use blit_ops::{parallel, BlendMode};
//!
//! let src = vec![0u8, 0, 0, 255].repeat(64 * 64);
//! let mut dst = vec![255u8; 64 * 64 * 4];
//! parallel::blend_rows(&mut dst, &src, 64, 64, BlendMode::Multiply).unwrap();
//! assert!(dst.chunks_exact(4).all(|p| p == [0, 0, 0, 255]));
//! ```

use rayon::prelude::*;
use tracing::trace;

use crate::batch::blend_batch;
use crate::{BlendMode, OpsError, OpsResult};

/// Blends two `width` x `height` RGBA8 images row by row in parallel.
///
/// # Errors
///
/// [`OpsError::InvalidParameter`] for zero dimensions or a size that
/// overflows; [`OpsError::BufferTooSmall`] when either image is shorter
/// than `width * height * 4` bytes.
pub fn blend_rows(
    dst: &mut [u8],
    src: &[u8],
    width: usize,
    height: usize,
    mode: BlendMode,
) -> OpsResult<()> {
    if width == 0 || height == 0 {
        return Err(OpsError::InvalidParameter(
            "width and height must be > 0".into(),
        ));
    }

    let stride = width
        .checked_mul(4)
        .ok_or_else(|| OpsError::InvalidParameter("row size overflows".into()))?;
    let total = stride
        .checked_mul(height)
        .ok_or_else(|| OpsError::InvalidParameter("image size overflows".into()))?;

    for buf in [&*dst, src] {
        if buf.len() < total {
            return Err(OpsError::BufferTooSmall {
                needed: total,
                got: buf.len(),
            });
        }
    }

    dst[..total]
        .par_chunks_mut(stride)
        .zip(src[..total].par_chunks(stride))
        .try_for_each(|(d, s)| blend_batch(d, s, width, mode))?;

    trace!(mode = %mode, width, height, "parallel rows");
    Ok(())
}
