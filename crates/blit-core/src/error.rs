//! Error types for blit-core operations.
//!
//! The compositing math itself never fails. The only runtime failures in the
//! core are at buffer construction time (non-positive dimensions) and when a
//! caller hands a byte slice that is too short for the pixel count it asks
//! for.
//!
//! # Usage
//!
//! ```rust
//! use blit_core::{Error, Pixmap};
//!
//! let err = Pixmap::new(0, 10).unwrap_err();
//! assert!(matches!(err, Error::InvalidDimensions { .. }));
//! ```
//!
//! # Dependencies
//!
//! - [`thiserror`] - For derive macro error implementation
//!
//! # Used By
//!
//! - [`crate::pixmap::Pixmap`] - Construction
//! - [`crate::pool::PixmapPool`] - Buffer acquisition
//! - `blit-ops` - Wrapped into `OpsError`

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while creating or addressing pixel buffers.
#[derive(Debug, Error)]
pub enum Error {
    /// Width or height is zero, negative, or overflows the byte size.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: i32,
        /// Requested height
        height: i32,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// Pixel coordinates are outside buffer bounds.
    #[error("pixel ({x}, {y}) out of bounds for buffer {width}x{height}")]
    OutOfBounds {
        /// X coordinate that was out of bounds
        x: i32,
        /// Y coordinate that was out of bounds
        y: i32,
        /// Buffer width
        width: i32,
        /// Buffer height
        height: i32,
    },

    /// A byte slice is shorter than the pixel count requires.
    #[error("buffer too small: need {needed} bytes, got {got}")]
    BufferTooSmall {
        /// Bytes required
        needed: usize,
        /// Bytes provided
        got: usize,
    },

    /// Generic error with custom message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: i32, height: i32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::OutOfBounds`] error.
    #[inline]
    pub fn out_of_bounds(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::OutOfBounds {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates an [`Error::BufferTooSmall`] error.
    #[inline]
    pub fn buffer_too_small(needed: usize, got: usize) -> Self {
        Self::BufferTooSmall { needed, got }
    }

    /// Creates an [`Error::Other`] error.
    #[inline]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Returns `true` if this is a bounds-related error.
    #[inline]
    pub fn is_bounds_error(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. })
    }

    /// Returns `true` if this is a dimension error.
    #[inline]
    pub fn is_dimension_error(&self) -> bool {
        matches!(self, Self::InvalidDimensions { .. })
    }
}
