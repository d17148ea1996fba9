//! Structure-of-arrays state for 16 pixels.

use blit_math::{LANES, U16x16};

/// Bytes covered by one batch: 16 RGBA8 pixels.
pub const BATCH_BYTES: usize = LANES * 4;

/// Source and destination channels of 16 pixels, one vector per channel.
///
/// Kernels read all eight vectors and write the result into the four
/// destination vectors.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchState {
    /// Source red.
    pub sr: U16x16,
    /// Source green.
    pub sg: U16x16,
    /// Source blue.
    pub sb: U16x16,
    /// Source alpha.
    pub sa: U16x16,
    /// Destination red.
    pub dr: U16x16,
    /// Destination green.
    pub dg: U16x16,
    /// Destination blue.
    pub db: U16x16,
    /// Destination alpha.
    pub da: U16x16,
}

#[inline(always)]
fn deinterleave(px: &[u8], r: &mut U16x16, g: &mut U16x16, b: &mut U16x16, a: &mut U16x16) {
    let (r, g, b, a) = (r.as_mut_slice(), g.as_mut_slice(), b.as_mut_slice(), a.as_mut_slice());
    for (i, p) in px.chunks_exact(4).take(LANES).enumerate() {
        r[i] = p[0] as u16;
        g[i] = p[1] as u16;
        b[i] = p[2] as u16;
        a[i] = p[3] as u16;
    }
}

impl BatchState {
    /// Loads 16 interleaved source pixels.
    ///
    /// `px` should hold [`BATCH_BYTES`] bytes; lanes past a shorter slice
    /// keep their previous values.
    #[inline]
    pub fn load_src(&mut self, px: &[u8]) {
        deinterleave(px, &mut self.sr, &mut self.sg, &mut self.sb, &mut self.sa);
    }

    /// Loads 16 interleaved destination pixels.
    #[inline]
    pub fn load_dst(&mut self, px: &[u8]) {
        deinterleave(px, &mut self.dr, &mut self.dg, &mut self.db, &mut self.da);
    }

    /// Writes the destination vectors back as interleaved bytes.
    ///
    /// Only the low 8 bits of each lane are stored.
    #[inline]
    pub fn store_dst(&self, px: &mut [u8]) {
        for (i, p) in px.chunks_exact_mut(4).take(LANES).enumerate() {
            p[0] = self.dr.lane(i) as u8;
            p[1] = self.dg.lane(i) as u8;
            p[2] = self.db.lane(i) as u8;
            p[3] = self.da.lane(i) as u8;
        }
    }
}
