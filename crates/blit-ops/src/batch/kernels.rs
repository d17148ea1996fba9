//! 16-lane blend kernels.
//!
//! Porter-Duff kernels follow the scalar formulas term by term. Separable
//! kernels work directly on premultiplied lanes:
//!
//! ```text
//! multiply    div255(s (1 - Da) + d (1 - Sa) + s d)
//! screen      s + d - s d
//! darken      s + d - div255(max(s Da, d Sa))
//! lighten     s + d - div255(min(s Da, d Sa))
//! difference  s + d - 2 div255(min(s Da, d Sa))
//! exclusion   s + d - 2 s d
//! overlay     div255(s (1 - Da) + d (1 - Sa) + (2d <= Da + 1 ? 2 s d : Sa Da - 2 (Da - d)(Sa - s)))
//! ```
//!
//! For opaque pixels these agree with the scalar modes within 2 per
//! channel. With partial alpha the premultiplied forms drift further from
//! the unpremultiply-blend-repremultiply path of the scalar functions.

use blit_math::U16x16;

use super::BatchState;

type V = U16x16;

#[inline(always)]
fn mul(a: V, b: V) -> V {
    V::mul_div255(a, b)
}

#[inline(always)]
fn clamp(v: V) -> V {
    v.clamp_max(255)
}

/// Applies `f(s, d, sa, da)` to all four channels, alpha last.
macro_rules! each_channel {
    ($p:ident, |$s:ident, $d:ident, $sa:ident, $da:ident| $body:expr) => {{
        let ($sa, $da) = ($p.sa, $p.da);
        $p.dr = {
            let ($s, $d) = ($p.sr, $p.dr);
            $body
        };
        $p.dg = {
            let ($s, $d) = ($p.sg, $p.dg);
            $body
        };
        $p.db = {
            let ($s, $d) = ($p.sb, $p.db);
            $body
        };
        $p.da = {
            let ($s, $d) = ($p.sa, $da);
            $body
        };
    }};
}

/// Applies a separable kernel to the color channels and source-over to
/// alpha.
macro_rules! each_color {
    ($p:ident, |$s:ident, $d:ident, $sa:ident, $da:ident| $body:expr) => {{
        let ($sa, $da) = ($p.sa, $p.da);
        $p.dr = {
            let ($s, $d) = ($p.sr, $p.dr);
            clamp($body)
        };
        $p.dg = {
            let ($s, $d) = ($p.sg, $p.dg);
            clamp($body)
        };
        $p.db = {
            let ($s, $d) = ($p.sb, $p.db);
            clamp($body)
        };
        $p.da = clamp($sa + mul($da, $sa.inv()));
    }};
}

pub(super) fn clear(p: &mut BatchState) {
    let zero = V::default();
    p.dr = zero;
    p.dg = zero;
    p.db = zero;
    p.da = zero;
}

pub(super) fn source(p: &mut BatchState) {
    p.dr = p.sr;
    p.dg = p.sg;
    p.db = p.sb;
    p.da = p.sa;
}

pub(super) fn destination(_p: &mut BatchState) {}

pub(super) fn source_over(p: &mut BatchState) {
    each_channel!(p, |s, d, sa, _da| clamp(s + mul(d, sa.inv())));
}

pub(super) fn destination_over(p: &mut BatchState) {
    each_channel!(p, |s, d, _sa, da| clamp(d + mul(s, da.inv())));
}

pub(super) fn source_in(p: &mut BatchState) {
    each_channel!(p, |s, _d, _sa, da| mul(s, da));
}

pub(super) fn destination_in(p: &mut BatchState) {
    each_channel!(p, |_s, d, sa, _da| mul(d, sa));
}

pub(super) fn source_out(p: &mut BatchState) {
    each_channel!(p, |s, _d, _sa, da| mul(s, da.inv()));
}

pub(super) fn destination_out(p: &mut BatchState) {
    each_channel!(p, |_s, d, sa, _da| mul(d, sa.inv()));
}

pub(super) fn source_atop(p: &mut BatchState) {
    let da = p.da;
    each_channel!(p, |s, d, sa, da| clamp(mul(s, da) + mul(d, sa.inv())));
    p.da = da;
}

pub(super) fn destination_atop(p: &mut BatchState) {
    each_channel!(p, |s, d, sa, da| clamp(mul(d, sa) + mul(s, da.inv())));
    p.da = p.sa;
}

pub(super) fn xor(p: &mut BatchState) {
    each_channel!(p, |s, d, sa, da| clamp(mul(s, da.inv()) + mul(d, sa.inv())));
}

pub(super) fn plus(p: &mut BatchState) {
    each_channel!(p, |s, d, _sa, _da| clamp(s + d));
}

pub(super) fn modulate(p: &mut BatchState) {
    each_channel!(p, |s, d, _sa, _da| mul(s, d));
}

pub(super) fn multiply(p: &mut BatchState) {
    each_color!(p, |s, d, sa, da| (s * da.inv() + d * sa.inv() + s * d).div255());
}

pub(super) fn screen(p: &mut BatchState) {
    each_color!(p, |s, d, _sa, _da| s + d - mul(s, d));
}

pub(super) fn darken(p: &mut BatchState) {
    each_color!(p, |s, d, sa, da| s + d - (s * da).max(d * sa).div255());
}

pub(super) fn lighten(p: &mut BatchState) {
    each_color!(p, |s, d, sa, da| s + d - (s * da).min(d * sa).div255());
}

pub(super) fn difference(p: &mut BatchState) {
    let two = V::splat(2);
    each_color!(p, |s, d, sa, da| s + d - two * (s * da).min(d * sa).div255());
}

pub(super) fn exclusion(p: &mut BatchState) {
    let two = V::splat(2);
    each_color!(p, |s, d, _sa, _da| s + d - two * mul(s, d));
}

pub(super) fn overlay(p: &mut BatchState) {
    let (one, two) = (V::splat(1), V::splat(2));
    each_color!(p, |s, d, sa, da| {
        let keep = s * da.inv() + d * sa.inv();
        let mixed = V::select_le(
            two * d,
            da + one,
            two * s * d,
            sa * da - two * (da - d) * (sa - s),
        );
        (keep + mixed).div255()
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(src: [u16; 4], dst: [u16; 4]) -> BatchState {
        BatchState {
            sr: V::splat(src[0]),
            sg: V::splat(src[1]),
            sb: V::splat(src[2]),
            sa: V::splat(src[3]),
            dr: V::splat(dst[0]),
            dg: V::splat(dst[1]),
            db: V::splat(dst[2]),
            da: V::splat(dst[3]),
        }
    }

    fn dst(p: &BatchState) -> [u16; 4] {
        [p.dr.lane(0), p.dg.lane(0), p.db.lane(0), p.da.lane(0)]
    }

    #[test]
    fn test_source_over_uses_original_alpha() {
        let mut p = state([128, 0, 0, 128], [255, 255, 255, 255]);
        source_over(&mut p);
        assert_eq!(dst(&p), [255, 127, 127, 255]);
    }

    #[test]
    fn test_atop_alpha() {
        let mut p = state([0, 128, 0, 128], [0, 0, 100, 100]);
        source_atop(&mut p);
        assert_eq!(p.da.lane(0), 100);

        let mut p = state([0, 0, 100, 100], [0, 128, 0, 128]);
        destination_atop(&mut p);
        assert_eq!(p.da.lane(0), 100);
    }

    #[test]
    fn test_opaque_separable_values() {
        let (s, d) = ([200, 100, 0, 255], [100, 100, 255, 255]);

        let mut p = state(s, d);
        darken(&mut p);
        assert_eq!(dst(&p), [100, 100, 0, 255]);

        let mut p = state(s, d);
        lighten(&mut p);
        assert_eq!(dst(&p), [200, 100, 255, 255]);

        let mut p = state(s, d);
        difference(&mut p);
        assert_eq!(dst(&p), [100, 0, 255, 255]);
    }

    #[test]
    fn test_overlay_midpoint_multiplies() {
        // d = 128 on an opaque destination takes the multiply branch.
        let mut p = state([64, 64, 64, 255], [128, 128, 128, 255]);
        overlay(&mut p);
        assert_eq!(dst(&p), [64, 64, 64, 255]);

        let mut p = state([64, 64, 64, 255], [129, 129, 129, 255]);
        overlay(&mut p);
        assert_eq!(p.dr.lane(0), 66);
    }

    #[test]
    fn test_overlay_branches_do_not_panic() {
        for s in (0..=255u16).step_by(51) {
            for d in (0..=255u16).step_by(51) {
                let mut p = state([s, s, s, 255], [d, d, d, 255]);
                overlay(&mut p);
                assert!(p.dr.lane(0) <= 255);
            }
        }
    }
}
