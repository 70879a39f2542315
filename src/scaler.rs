use rayon::{
    iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

/// Source sample positions for every destination row and column, in 8.8
/// fixed point.
pub struct ScaleLut {
    dst_w: usize,
    dst_h: usize,
    cols: Vec<Tap>,
    rows: Vec<Tap>,
}

#[derive(Clone, Copy)]
struct Tap {
    lo: usize,
    hi: usize,
    w: u32,
}

impl ScaleLut {
    pub fn empty() -> Self {
        Self {
            dst_w: 0,
            dst_h: 0,
            cols: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn new(dst_w: usize, dst_h: usize, src_w: usize, src_h: usize) -> Self {
        Self {
            dst_w,
            dst_h,
            cols: taps(dst_w, src_w),
            rows: taps(dst_h, src_h),
        }
    }

    pub fn matches(&self, dst_w: usize, dst_h: usize) -> bool {
        self.dst_w == dst_w && self.dst_h == dst_h
    }
}

fn taps(dst: usize, src: usize) -> Vec<Tap> {
    if dst == 0 || src == 0 {
        return Vec::new();
    }
    let scale = src as f32 / dst as f32;
    let last = src - 1;
    (0..dst)
        .map(|i| {
            let f = i as f32 * scale;
            let lo = (f.floor() as usize).min(last);
            Tap {
                lo,
                hi: (lo + 1).min(last),
                w: ((f - lo as f32) * 256.0).round().clamp(0.0, 256.0) as u32,
            }
        })
        .collect()
}

#[inline]
fn lerp_packed(a: u32, b: u32, w: u32) -> u32 {
    let inv = 256 - w;
    // Red and blue share one multiply, green gets its own
    let rb = (((a & 0x00FF00FF) * inv + (b & 0x00FF00FF) * w) >> 8) & 0x00FF00FF;
    let g = (((a & 0x0000FF00) * inv + (b & 0x0000FF00) * w) >> 8) & 0x0000FF00;
    rb | g
}

/// Bilinear stretch of `src` (`src_w` wide) into `dst`, one row per task.
pub fn stretch(dst: &mut [u32], src: &[u32], src_w: usize, lut: &ScaleLut) {
    if lut.dst_w == 0 || lut.rows.is_empty() {
        return;
    }
    dst.par_chunks_mut(lut.dst_w)
        .zip(lut.rows.par_iter())
        .for_each(|(out, row)| {
            let top = &src[row.lo * src_w..(row.lo + 1) * src_w];
            let bot = &src[row.hi * src_w..(row.hi + 1) * src_w];
            for (px, col) in out.iter_mut().zip(&lut.cols) {
                let t = lerp_packed(top[col.lo], top[col.hi], col.w);
                let b = lerp_packed(bot[col.lo], bot[col.hi], col.w);
                *px = lerp_packed(t, b, row.w);
            }
        });
}
