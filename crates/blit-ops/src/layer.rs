//! Layers and layer stacks.
//!
//! A [`Layer`] is an offscreen premultiplied buffer with a blend mode, an
//! opacity and a position. A [`LayerStack`] keeps layers over a base
//! pixmap:
//!
//! ```text
//! depth 0          push            depth k          pop
//! current = base  ------>  current = top layer  ------>  top composited
//!                                                        into the one below
//! ```
//!
//! `clear` discards every layer without compositing. Layer buffers come
//! from a [`PixmapPool`] and go back to it on pop, clear and drop.
//!
//! # Example
//!
//! ```rust
//! use blit_core::{Pixmap, PixmapPool, Rect};
//! use blit_ops::{BlendMode, LayerStack};
//!
//! let pool = PixmapPool::new();
//! let mut base = Pixmap::new(100, 100).unwrap();
//! base.fill(255, 255, 255, 255);
//!
//! let mut stack = LayerStack::new(&mut base, &pool);
//! let layer = stack.push(BlendMode::SourceOver, 0.5, Rect::default()).unwrap();
//! layer.fill_rect(Rect::new(10, 10, 80, 80), 255, 0, 0, 255);
//! stack.pop();
//! drop(stack);
//!
//! assert_eq!(base.premultiplied(50, 50), Some([255, 127, 127, 255]));
//! assert_eq!(base.premultiplied(5, 5), Some([255, 255, 255, 255]));
//! ```

use blit_core::{Pixmap, PixmapPool, Rect};
use blit_math::scale_unit;
use tracing::{debug, trace};

use crate::scalar::blend_func;
use crate::{BlendMode, OpsResult};

/// Clamps to [0, 1]; NaN becomes 0.
#[inline]
fn sanitize_opacity(opacity: f32) -> f32 {
    if opacity.is_nan() {
        0.0
    } else {
        opacity.clamp(0.0, 1.0)
    }
}

/// Offscreen buffer composited with a blend mode and opacity.
#[derive(Debug, Clone)]
pub struct Layer {
    pixmap: Pixmap,
    mode: BlendMode,
    opacity: f32,
    bounds: Rect,
}

impl Layer {
    /// Allocates a transparent layer covering `bounds`.
    ///
    /// # Errors
    ///
    /// Dimension error from the pool when `bounds` has a non-positive
    /// width or height.
    pub fn new(pool: &PixmapPool, mode: BlendMode, opacity: f32, bounds: Rect) -> OpsResult<Self> {
        let pixmap = pool.get(bounds.width, bounds.height)?;
        Ok(Self::from_pixmap(pixmap, mode, opacity, bounds))
    }

    /// Wraps an existing pixmap. Its top-left pixel lands at the origin of
    /// `bounds`.
    pub fn from_pixmap(pixmap: Pixmap, mode: BlendMode, opacity: f32, bounds: Rect) -> Self {
        Self {
            pixmap,
            mode,
            opacity: sanitize_opacity(opacity),
            bounds,
        }
    }

    /// Layer pixels.
    #[inline]
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Mutable layer pixels.
    #[inline]
    pub fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    /// Releases the pixel buffer.
    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    /// Blend mode.
    #[inline]
    pub fn blend_mode(&self) -> BlendMode {
        self.mode
    }

    /// Changes the blend mode.
    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        self.mode = mode;
    }

    /// Opacity in [0, 1].
    #[inline]
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Sets the opacity, clamped to [0, 1]. NaN becomes 0.
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = sanitize_opacity(opacity);
    }

    /// Position in the parent's coordinates.
    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }
}

/// Composites a layer into `dst`, with `layer.bounds` in `dst` coordinates.
///
/// The affected region is the layer bounds clipped to `dst` and to the
/// layer's own pixel extent; a layer entirely outside leaves `dst`
/// untouched. Opacity below 1 scales all four premultiplied channels of
/// each layer pixel before blending.
pub fn composite_layer(layer: &Layer, dst: &mut Pixmap) {
    composite_at(layer, dst, 0, 0);
}

/// Composites with the destination's origin at (`ox`, `oy`) in the
/// coordinates of `layer.bounds`.
fn composite_at(layer: &Layer, dst: &mut Pixmap, ox: i32, oy: i32) {
    let place = layer.bounds.offset(-ox, -oy);
    let extent = Rect::new(place.x, place.y, layer.pixmap.width(), layer.pixmap.height());
    let Some(clip) = place
        .intersect(&dst.rect())
        .and_then(|r| r.intersect(&extent))
    else {
        trace!(mode = %layer.mode, "composite: layer outside destination");
        return;
    };

    let f = blend_func(layer.mode);
    let opacity = layer.opacity;
    let fade = opacity < 1.0;
    let row_bytes = clip.width as usize * 4;
    let src = layer.pixmap.data();

    for y in clip.y..clip.bottom() {
        let (Some(s_off), Some(d_off)) = (
            layer.pixmap.pixel_offset(clip.x - place.x, y - place.y),
            dst.pixel_offset(clip.x, y),
        ) else {
            continue;
        };
        let s_row = &src[s_off..s_off + row_bytes];
        let d_row = &mut dst.data_mut()[d_off..d_off + row_bytes];

        for (d, s) in d_row.chunks_exact_mut(4).zip(s_row.chunks_exact(4)) {
            let mut sp = [s[0], s[1], s[2], s[3]];
            if fade {
                sp = sp.map(|c| scale_unit(c, opacity));
            }
            let out = f(sp, [d[0], d[1], d[2], d[3]]);
            d.copy_from_slice(&out);
        }
    }
    dst.invalidate_premul_cache();

    trace!(
        mode = %layer.mode,
        opacity,
        x = clip.x,
        y = clip.y,
        width = clip.width,
        height = clip.height,
        "composite layer"
    );
}

/// Stack of layers drawn over a base pixmap.
///
/// One stack belongs to one thread for its whole push/pop lifetime; the
/// pool may be shared.
pub struct LayerStack<'a> {
    base: &'a mut Pixmap,
    pool: &'a PixmapPool,
    layers: Vec<Layer>,
}

impl<'a> LayerStack<'a> {
    /// Creates an empty stack over `base`.
    pub fn new(base: &'a mut Pixmap, pool: &'a PixmapPool) -> Self {
        Self {
            base,
            pool,
            layers: Vec::new(),
        }
    }

    /// Pushes a transparent layer and returns its pixels.
    ///
    /// Empty `bounds` cover the whole base.
    ///
    /// # Errors
    ///
    /// Propagates pool allocation failures.
    pub fn push(&mut self, mode: BlendMode, opacity: f32, bounds: Rect) -> OpsResult<&mut Pixmap> {
        let bounds = if bounds.is_empty() {
            self.base.rect()
        } else {
            bounds
        };
        let layer = Layer::new(self.pool, mode, opacity, bounds)?;
        self.layers.push(layer);
        debug!(depth = self.layers.len(), mode = %mode, ?bounds, "layer push");
        Ok(self.current_mut())
    }

    /// Composites the top layer into the one below it (or the base) and
    /// returns the new current pixmap. `None` when the stack is empty.
    pub fn pop(&mut self) -> Option<&mut Pixmap> {
        let layer = self.layers.pop()?;
        match self.layers.last_mut() {
            Some(below) => {
                let (ox, oy) = (below.bounds.x, below.bounds.y);
                composite_at(&layer, &mut below.pixmap, ox, oy);
            }
            None => composite_layer(&layer, &mut *self.base),
        }
        self.pool.put(layer.into_pixmap());
        debug!(depth = self.layers.len(), "layer pop");
        Some(self.current_mut())
    }

    /// Discards every layer without compositing.
    pub fn clear(&mut self) {
        if self.layers.is_empty() {
            return;
        }
        let dropped = self.layers.len();
        for layer in self.layers.drain(..) {
            self.pool.put(layer.into_pixmap());
        }
        debug!(dropped, "layer stack cleared");
    }

    /// Pixmap drawing currently goes to: the top layer, or the base.
    pub fn current(&self) -> &Pixmap {
        match self.layers.last() {
            Some(layer) => &layer.pixmap,
            None => &*self.base,
        }
    }

    /// Mutable access to [`current`](Self::current).
    pub fn current_mut(&mut self) -> &mut Pixmap {
        match self.layers.last_mut() {
            Some(layer) => &mut layer.pixmap,
            None => &mut *self.base,
        }
    }

    /// Number of pushed layers.
    #[inline]
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    /// Blend mode of the top layer; source-over when empty.
    pub fn current_blend_mode(&self) -> BlendMode {
        self.layers
            .last()
            .map_or(BlendMode::SourceOver, Layer::blend_mode)
    }

    /// Top layer, if any.
    pub fn top(&self) -> Option<&Layer> {
        self.layers.last()
    }

    /// Mutable top layer, if any.
    pub fn top_mut(&mut self) -> Option<&mut Layer> {
        self.layers.last_mut()
    }
}

impl Drop for LayerStack<'_> {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [u8; 4] = [255, 255, 255, 255];
    const RED: [u8; 4] = [255, 0, 0, 255];

    fn white(w: i32, h: i32) -> Pixmap {
        let mut p = Pixmap::new(w, h).unwrap();
        p.fill(255, 255, 255, 255);
        p
    }

    #[test]
    fn test_opacity_sanitized() {
        let pool = PixmapPool::new();
        let mut layer = Layer::new(&pool, BlendMode::Multiply, 1.7, Rect::from_size(2, 2)).unwrap();
        assert_eq!(layer.opacity(), 1.0);
        layer.set_opacity(-0.3);
        assert_eq!(layer.opacity(), 0.0);
        layer.set_opacity(f32::NAN);
        assert_eq!(layer.opacity(), 0.0);
        layer.set_opacity(0.25);
        assert_eq!(layer.opacity(), 0.25);
        layer.set_blend_mode(BlendMode::Screen);
        assert_eq!(layer.blend_mode(), BlendMode::Screen);
    }

    #[test]
    fn test_invalid_bounds_rejected() {
        let pool = PixmapPool::new();
        let err = Layer::new(&pool, BlendMode::SourceOver, 1.0, Rect::new(0, 0, 0, 5)).unwrap_err();
        assert!(err.is_dimension_error());
    }

    #[test]
    fn test_opacity_scales_all_channels() {
        let mut px = Pixmap::new(1, 1).unwrap();
        px.set_premultiplied(0, 0, RED).unwrap();
        let layer = Layer::from_pixmap(px, BlendMode::Source, 0.5, Rect::from_size(1, 1));
        let mut dst = white(1, 1);
        composite_layer(&layer, &mut dst);
        assert_eq!(dst.premultiplied(0, 0), Some([128, 0, 0, 128]));
    }

    #[test]
    fn test_layer_outside_is_noop() {
        let mut px = Pixmap::new(4, 4).unwrap();
        px.fill(255, 0, 0, 255);
        let layer = Layer::from_pixmap(px, BlendMode::Source, 1.0, Rect::new(50, 50, 4, 4));
        let mut dst = white(10, 10);
        let before = dst.data().to_vec();
        composite_layer(&layer, &mut dst);
        assert_eq!(dst.data(), &before[..]);
    }

    #[test]
    fn test_partial_overlap_is_clipped() {
        let mut px = Pixmap::new(4, 4).unwrap();
        px.fill(255, 0, 0, 255);
        let layer = Layer::from_pixmap(px, BlendMode::SourceOver, 1.0, Rect::new(-2, 8, 4, 4));
        let mut dst = white(10, 10);
        composite_layer(&layer, &mut dst);
        assert_eq!(dst.premultiplied(0, 8), Some(RED));
        assert_eq!(dst.premultiplied(1, 9), Some(RED));
        assert_eq!(dst.premultiplied(2, 9), Some(WHITE));
        assert_eq!(dst.premultiplied(0, 7), Some(WHITE));
    }

    #[test]
    fn test_bounds_larger_than_buffer() {
        // Only the buffer's own pixels are composited.
        let mut px = Pixmap::new(2, 2).unwrap();
        px.fill(255, 0, 0, 255);
        let layer = Layer::from_pixmap(px, BlendMode::Source, 1.0, Rect::new(1, 1, 8, 8));
        let mut dst = white(10, 10);
        composite_layer(&layer, &mut dst);
        assert_eq!(dst.premultiplied(2, 2), Some(RED));
        assert_eq!(dst.premultiplied(3, 3), Some(WHITE));
    }

    #[test]
    fn test_composite_invalidates_view() {
        let layer = Layer::from_pixmap(white(2, 2), BlendMode::Clear, 1.0, Rect::from_size(2, 2));
        let mut dst = white(2, 2);
        let _ = dst.straight_data();
        assert!(dst.has_cached_view());
        composite_layer(&layer, &mut dst);
        assert!(!dst.has_cached_view());
        assert_eq!(dst.get_rgba(1, 1), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_stack_transitions() {
        let pool = PixmapPool::new();
        let mut base = white(8, 8);
        let mut stack = LayerStack::new(&mut base, &pool);

        assert_eq!(stack.depth(), 0);
        assert_eq!(stack.current_blend_mode(), BlendMode::SourceOver);
        assert!(stack.top().is_none());
        assert!(stack.pop().is_none());

        stack.push(BlendMode::Multiply, 1.0, Rect::default()).unwrap();
        stack.push(BlendMode::Screen, 1.0, Rect::new(2, 2, 3, 3)).unwrap();
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.current_blend_mode(), BlendMode::Screen);
        assert_eq!(stack.current().bounds(), (3, 3));

        let below = stack.pop().unwrap();
        assert_eq!(below.bounds(), (8, 8));
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.current_blend_mode(), BlendMode::Multiply);

        stack.pop().unwrap();
        assert_eq!(stack.depth(), 0);
        assert_eq!(stack.current().premultiplied(0, 0), Some(WHITE));
    }

    #[test]
    fn test_nested_layers_use_parent_origin() {
        let pool = PixmapPool::new();
        let mut base = white(10, 10);
        {
            let mut stack = LayerStack::new(&mut base, &pool);
            stack.push(BlendMode::SourceOver, 1.0, Rect::new(2, 2, 6, 6)).unwrap();
            let inner = stack
                .push(BlendMode::SourceOver, 1.0, Rect::new(4, 4, 2, 2))
                .unwrap();
            inner.fill(255, 0, 0, 255);

            let parent = stack.pop().unwrap();
            assert_eq!(parent.premultiplied(2, 2), Some(RED));
            assert_eq!(parent.premultiplied(1, 1), Some([0, 0, 0, 0]));
            stack.pop();
        }
        assert_eq!(base.premultiplied(4, 4), Some(RED));
        assert_eq!(base.premultiplied(5, 5), Some(RED));
        assert_eq!(base.premultiplied(3, 3), Some(WHITE));
        assert_eq!(base.premultiplied(6, 6), Some(WHITE));
    }

    #[test]
    fn test_clear_discards_and_recycles() {
        let pool = PixmapPool::new();
        let mut base = white(4, 4);
        {
            let mut stack = LayerStack::new(&mut base, &pool);
            for _ in 0..3 {
                let l = stack.push(BlendMode::Source, 1.0, Rect::default()).unwrap();
                l.fill(0, 0, 0, 255);
            }
            stack.clear();
            assert_eq!(stack.depth(), 0);
        }
        assert_eq!(pool.retained(), 3);
        assert_eq!(base.premultiplied(1, 1), Some(WHITE));
    }

    #[test]
    fn test_drop_returns_buffers() {
        let pool = PixmapPool::new();
        let mut base = white(4, 4);
        {
            let mut stack = LayerStack::new(&mut base, &pool);
            stack.push(BlendMode::SourceOver, 1.0, Rect::default()).unwrap();
            stack.push(BlendMode::SourceOver, 1.0, Rect::new(0, 0, 2, 2)).unwrap();
        }
        assert_eq!(pool.retained(), 2);
    }

    #[test]
    fn test_top_mut_edits_layer() {
        let pool = PixmapPool::new();
        let mut base = white(2, 2);
        {
            let mut stack = LayerStack::new(&mut base, &pool);
            stack.push(BlendMode::Source, 1.0, Rect::default()).unwrap();
            if let Some(top) = stack.top_mut() {
                top.set_blend_mode(BlendMode::Destination);
            }
            stack.current_mut().fill(0, 0, 255, 255);
            stack.pop();
        }
        assert_eq!(base.premultiplied(0, 0), Some(WHITE));
    }
}
