//! Error types for compositing operations.

use thiserror::Error;

/// Error type for compositing operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Buffer construction or addressing failed.
    #[error(transparent)]
    Core(#[from] blit_core::Error),

    /// A span is shorter than the pixel count passed with it.
    #[error("buffer too small: need {needed} bytes, got {got}")]
    BufferTooSmall {
        /// Bytes required
        needed: usize,
        /// Bytes provided
        got: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Blend mode name not recognized.
    #[error("unknown blend mode: {0}")]
    UnknownBlendMode(String),
}

/// Result type for compositing operations.
pub type OpsResult<T> = Result<T, OpsError>;

impl OpsError {
    /// Returns `true` if the failure came from invalid buffer dimensions.
    pub fn is_dimension_error(&self) -> bool {
        matches!(self, Self::Core(e) if e.is_dimension_error())
    }
}

/// Checks that `buf` holds at least `pixels` RGBA8 pixels.
pub(crate) fn ensure_len(buf: &[u8], pixels: usize) -> OpsResult<()> {
    let needed = pixels.checked_mul(4).ok_or_else(|| {
        OpsError::InvalidParameter(format!("pixel count {pixels} overflows byte length"))
    })?;
    if buf.len() < needed {
        return Err(OpsError::BufferTooSmall {
            needed,
            got: buf.len(),
        });
    }
    Ok(())
}
