//! Integration tests for layer compositing and span blending.

use blit_core::{Pixmap, PixmapPool, Rect};
use blit_ops::{
    BlendMode, LayerStack, OpsError, blend_batch, blend_batch_aligned, blend_func,
    blend_func_linear,
};

fn white(w: i32, h: i32) -> Pixmap {
    let mut p = Pixmap::new(w, h).expect("valid size");
    p.fill(255, 255, 255, 255);
    p
}

#[test]
fn test_half_opacity_red_over_white() {
    let pool = PixmapPool::new();
    let mut base = white(100, 100);

    {
        let mut stack = LayerStack::new(&mut base, &pool);
        let layer = stack
            .push(BlendMode::SourceOver, 0.5, Rect::from_size(100, 100))
            .expect("push");
        layer.fill_rect(Rect::new(10, 10, 80, 80), 255, 0, 0, 255);
        assert_eq!(stack.depth(), 1);
        assert!(stack.pop().is_some());
        assert_eq!(stack.depth(), 0);
    }

    let [r, g, b, a] = base.get_rgba(50, 50).expect("inside");
    assert_eq!(a, 255);
    assert!(r >= 250, "r={r}");
    assert!((100..=150).contains(&g), "g={g}");
    assert!((100..=150).contains(&b), "b={b}");

    assert_eq!(base.get_rgba(5, 5), Some([255, 255, 255, 255]));
    assert_eq!(base.get_rgba(95, 95), Some([255, 255, 255, 255]));
}

#[test]
fn test_empty_layer_round_trip_is_identity() {
    let pool = PixmapPool::new();
    let mut base = Pixmap::new(16, 9).expect("valid size");
    base.fill_rect(Rect::new(0, 0, 8, 9), 30, 60, 90, 200);
    base.fill_rect(Rect::new(8, 0, 8, 9), 250, 5, 5, 255);
    let before = base.data().to_vec();

    for mode in BlendMode::ALL {
        let mut stack = LayerStack::new(&mut base, &pool);
        stack.push(mode, 1.0, Rect::default()).expect("push");
        stack.pop();
        drop(stack);

        let keeps_dst = !blit_ops::scalar::CLEARS_ON_TRANSPARENT_SOURCE.contains(&mode);
        if keeps_dst {
            assert_eq!(base.data(), &before[..], "{mode}");
        } else {
            base.data_mut().copy_from_slice(&before);
        }
    }
}

#[test]
fn test_pop_on_empty_stack() {
    let pool = PixmapPool::new();
    let mut base = white(4, 4);
    let mut stack = LayerStack::new(&mut base, &pool);
    assert!(stack.pop().is_none());
    assert!(stack.pop().is_none());
    assert_eq!(stack.depth(), 0);
}

#[test]
fn test_layer_outside_base_is_noop() {
    let pool = PixmapPool::new();
    let mut base = white(10, 10);
    {
        let mut stack = LayerStack::new(&mut base, &pool);
        let layer = stack
            .push(BlendMode::Source, 1.0, Rect::new(20, 20, 5, 5))
            .expect("push");
        layer.fill(0, 0, 0, 255);
        stack.pop();
    }
    assert!(base.data().iter().all(|&b| b == 255));
}

#[test]
fn test_invalid_dimensions() {
    let pool = PixmapPool::new();
    assert!(Pixmap::new(0, 10).is_err());
    assert!(pool.get(10, -1).is_err());

    let err = blit_ops::Layer::new(&pool, BlendMode::SourceOver, 1.0, Rect::new(0, 0, -3, 3))
        .expect_err("negative width");
    assert!(err.is_dimension_error());
}

#[test]
fn test_pool_reuse_across_pushes() {
    let pool = PixmapPool::new();
    let mut base = white(32, 32);
    let mut stack = LayerStack::new(&mut base, &pool);

    stack.push(BlendMode::Screen, 1.0, Rect::default()).expect("push");
    stack.current_mut().fill(255, 0, 0, 255);
    stack.clear();
    assert_eq!(pool.retained(), 1);

    let reused = stack.push(BlendMode::Screen, 1.0, Rect::default()).expect("push");
    assert!(reused.data().iter().all(|&b| b == 0));
    assert_eq!(pool.retained(), 0);
}

#[test]
fn test_batch_remainder_matches_scalar() {
    let n = 17;
    let src: Vec<u8> = (0..n).flat_map(|i| [i as u8 * 7, 0, 100, 200]).collect();
    let dst: Vec<u8> = (0..n).flat_map(|i| [50, i as u8 * 3, 0, 255]).collect();

    let mut batched = dst.clone();
    blend_batch(&mut batched, &src, n, BlendMode::SourceOver).expect("blend");

    let over = blend_func(BlendMode::SourceOver);
    for i in 0..n {
        let p = i * 4;
        let expected = over(
            [src[p], src[p + 1], src[p + 2], src[p + 3]],
            [dst[p], dst[p + 1], dst[p + 2], dst[p + 3]],
        );
        for c in 0..4 {
            assert!(batched[p + c].abs_diff(expected[c]) <= 2, "pixel {i} channel {c}");
        }
    }
}

#[test]
fn test_batch_rejects_short_buffers() {
    let src = vec![0u8; 32];
    let mut dst = vec![0u8; 64];
    for result in [
        blend_batch(&mut dst, &src, 16, BlendMode::Xor),
        blend_batch_aligned(&mut dst, &src, 16, BlendMode::Xor),
    ] {
        assert!(matches!(result, Err(OpsError::BufferTooSmall { needed: 64, got: 32 })));
    }
}

#[test]
fn test_linear_blend_alpha_identity() {
    let samples = [[0, 0, 0, 0], [128, 128, 128, 255], [40, 90, 10, 100], [255, 0, 0, 255]];
    for mode in BlendMode::ALL {
        let plain = blend_func_linear(mode, false);
        let linear = blend_func_linear(mode, true);
        for s in samples {
            for d in samples {
                assert_eq!(plain.apply(s, d)[3], linear.apply(s, d)[3], "{mode}");
            }
        }
    }

    let gray = [128, 128, 128, 255];
    let plain = blend_func_linear(BlendMode::Multiply, false).apply(gray, gray);
    let linear = blend_func_linear(BlendMode::Multiply, true).apply(gray, gray);
    assert_ne!(plain[..3], linear[..3]);
}

#[cfg(feature = "parallel")]
#[test]
fn test_parallel_rows_cover_whole_image() {
    let (w, h) = (33usize, 21usize);
    let src = vec![0u8, 0, 0, 0].repeat(w * h);
    let mut dst = vec![77u8; w * h * 4];
    blit_ops::parallel::blend_rows(&mut dst, &src, w, h, BlendMode::Clear).expect("blend");
    assert!(dst.iter().all(|&b| b == 0));
}
