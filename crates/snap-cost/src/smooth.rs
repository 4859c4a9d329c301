use snap_core::Image;

use crate::kernel::GaussianKernel1D;

/// Separable Gaussian smoothing with clamp-to-edge borders.
///
/// `tmp` and `out` are reshaped to the size of `src`; their previous contents
/// are irrelevant.
pub fn smooth_separable(
    src: &Image<f32>,
    kernel: &GaussianKernel1D,
    tmp: &mut Image<f32>,
    out: &mut Image<f32>,
) {
    let w = src.width();
    let h = src.height();
    tmp.reset(w, h, 0.0);
    out.reset(w, h, 0.0);
    if w == 0 || h == 0 {
        return;
    }

    let r = kernel.radius as isize;
    let taps = &kernel.taps;

    {
        let s = src.data();
        let d = tmp.data_mut();
        for y in 0..h {
            let row = &s[y * w..(y + 1) * w];
            let dst = &mut d[y * w..(y + 1) * w];
            for (x, dv) in dst.iter_mut().enumerate() {
                let mut acc = 0.0f32;
                for (k, &tv) in taps.iter().enumerate() {
                    let xi = clamp_index(x as isize + k as isize - r, w);
                    acc += row[xi] * tv;
                }
                *dv = acc;
            }
        }
    }

    let s = tmp.data();
    let d = out.data_mut();
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0f32;
            for (k, &tv) in taps.iter().enumerate() {
                let yi = clamp_index(y as isize + k as isize - r, h);
                acc += s[yi * w + x] * tv;
            }
            d[y * w + x] = acc;
        }
    }
}

#[inline]
fn clamp_index(i: isize, len: usize) -> usize {
    if i < 0 { 0 } else { (i as usize).min(len - 1) }
}
