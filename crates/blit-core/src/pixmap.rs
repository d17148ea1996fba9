//! Premultiplied RGBA8 pixel buffer.
//!
//! [`Pixmap`] is the buffer every blend kernel reads and writes. Pixels are
//! stored row-major, four bytes per pixel, with color channels already
//! multiplied by alpha:
//!
//! ```text
//! Memory: [R G B A R G B A ...]  <- Row 0
//!         [R G B A R G B A ...]  <- Row 1
//! ```
//!
//! A straight-alpha view of the same pixels is built lazily the first time
//! [`Pixmap::get_rgba`] or [`Pixmap::straight_data`] is called, and cached.
//! Code that writes through [`Pixmap::data_mut`] must call
//! [`Pixmap::invalidate_premul_cache`] when it is done so the next read
//! rebuilds the view.
//!
//! # Example
//!
//! ```rust
//! use blit_core::Pixmap;
//!
//! let mut pm = Pixmap::new(4, 4).unwrap();
//! pm.fill(255, 0, 0, 128);
//! assert_eq!(pm.premultiplied(0, 0), Some([128, 0, 0, 128]));
//! assert_eq!(pm.get_rgba(0, 0), Some([255, 0, 0, 128]));
//! ```

use std::sync::OnceLock;

use crate::{Error, Rect, Result};

/// Bytes per RGBA8 pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Converts a straight-alpha color to premultiplied, rounding to nearest.
#[inline]
pub fn premultiply(rgba: [u8; 4]) -> [u8; 4] {
    let a = rgba[3] as u32;
    let mul = |c: u8| ((c as u32 * a + 127) / 255) as u8;
    [mul(rgba[0]), mul(rgba[1]), mul(rgba[2]), rgba[3]]
}

/// Converts a premultiplied color to straight alpha, rounding to nearest.
///
/// Fully transparent pixels come back as all zeros.
#[inline]
pub fn unpremultiply(rgba: [u8; 4]) -> [u8; 4] {
    let a = rgba[3] as u32;
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let div = |c: u8| ((c as u32 * 255 + a / 2) / a).min(255) as u8;
    [div(rgba[0]), div(rgba[1]), div(rgba[2]), rgba[3]]
}

/// Owned premultiplied RGBA8 image buffer.
#[derive(Debug, Clone)]
pub struct Pixmap {
    width: i32,
    height: i32,
    data: Vec<u8>,
    straight: OnceLock<Vec<u8>>,
}

impl Pixmap {
    /// Creates a fully transparent pixmap.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDimensions`] when width or height is not positive, or
    /// the byte size overflows `usize`.
    pub fn new(width: i32, height: i32) -> Result<Self> {
        let len = byte_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
            straight: OnceLock::new(),
        })
    }

    /// Wraps an existing premultiplied byte vector.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDimensions`] for bad sizes, [`Error::BufferTooSmall`]
    /// when `data` does not hold exactly `width * height * 4` bytes.
    pub fn from_vec(width: i32, height: i32, data: Vec<u8>) -> Result<Self> {
        let len = byte_len(width, height)?;
        if data.len() != len {
            return Err(Error::buffer_too_small(len, data.len()));
        }
        Ok(Self {
            width,
            height,
            data,
            straight: OnceLock::new(),
        })
    }

    /// Consumes the pixmap, returning its byte storage.
    #[inline]
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Returns `(width, height)`.
    #[inline]
    pub fn bounds(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    /// Full extent as a rectangle at the origin.
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Byte offset of pixel (x, y), or `None` outside the buffer.
    #[inline]
    pub fn pixel_offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL)
    }

    /// Raw premultiplied bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw premultiplied bytes.
    ///
    /// Does not invalidate the straight-alpha cache; call
    /// [`invalidate_premul_cache`](Self::invalidate_premul_cache) after writing.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Premultiplied view of the pixels. Aliases [`data`](Self::data).
    #[inline]
    pub fn premultiplied_data(&self) -> &[u8] {
        &self.data
    }

    /// Straight-alpha view of the pixels, built on first use.
    pub fn straight_data(&self) -> &[u8] {
        self.straight.get_or_init(|| {
            let mut out = vec![0u8; self.data.len()];
            for (dst, src) in out.chunks_exact_mut(4).zip(self.data.chunks_exact(4)) {
                dst.copy_from_slice(&unpremultiply([src[0], src[1], src[2], src[3]]));
            }
            out
        })
    }

    /// Drops the cached straight-alpha view.
    #[inline]
    pub fn invalidate_premul_cache(&mut self) {
        self.straight.take();
    }

    /// Returns `true` if the straight-alpha view is currently cached.
    #[inline]
    pub fn has_cached_view(&self) -> bool {
        self.straight.get().is_some()
    }

    /// Straight-alpha color at (x, y).
    pub fn get_rgba(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        let i = self.pixel_offset(x, y)?;
        let s = self.straight_data();
        Some([s[i], s[i + 1], s[i + 2], s[i + 3]])
    }

    /// Premultiplied color at (x, y).
    #[inline]
    pub fn premultiplied(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        let i = self.pixel_offset(x, y)?;
        let d = &self.data;
        Some([d[i], d[i + 1], d[i + 2], d[i + 3]])
    }

    /// Writes a premultiplied color at (x, y).
    ///
    /// # Errors
    ///
    /// [`Error::OutOfBounds`] outside the buffer.
    pub fn set_premultiplied(&mut self, x: i32, y: i32, px: [u8; 4]) -> Result<()> {
        let i = self
            .pixel_offset(x, y)
            .ok_or_else(|| Error::out_of_bounds(x, y, self.width, self.height))?;
        self.data[i..i + 4].copy_from_slice(&px);
        self.invalidate_premul_cache();
        Ok(())
    }

    /// Fills every pixel with a straight-alpha color.
    pub fn fill(&mut self, r: u8, g: u8, b: u8, a: u8) {
        let px = premultiply([r, g, b, a]);
        for chunk in self.data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
        self.invalidate_premul_cache();
    }

    /// Fills the part of `rect` that lies inside the pixmap.
    pub fn fill_rect(&mut self, rect: Rect, r: u8, g: u8, b: u8, a: u8) {
        let Some(clip) = rect.intersect(&self.rect()) else {
            return;
        };
        let px = premultiply([r, g, b, a]);
        let stride = self.width as usize * BYTES_PER_PIXEL;
        for y in clip.y..clip.bottom() {
            let start = y as usize * stride + clip.x as usize * BYTES_PER_PIXEL;
            let end = start + clip.width as usize * BYTES_PER_PIXEL;
            for chunk in self.data[start..end].chunks_exact_mut(4) {
                chunk.copy_from_slice(&px);
            }
        }
        self.invalidate_premul_cache();
    }

    /// Resets every pixel to transparent black.
    pub fn clear(&mut self) {
        self.data.fill(0);
        self.invalidate_premul_cache();
    }
}

/// Validates dimensions and returns the RGBA8 byte length.
fn byte_len(width: i32, height: i32) -> Result<usize> {
    if width <= 0 || height <= 0 {
        return Err(Error::invalid_dimensions(
            width,
            height,
            "width and height must be > 0",
        ));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(BYTES_PER_PIXEL))
        .ok_or_else(|| Error::invalid_dimensions(width, height, "byte size overflows"))
}
