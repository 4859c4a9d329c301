use snap_core::Image;

/// Scharr gradient magnitude with clamp-to-edge borders.
///
/// The raw Scharr response is divided by 32 so that a ramp rising by one
/// intensity unit per pixel has magnitude 1.
pub fn scharr_magnitude(src: &Image<f32>, mag: &mut Image<f32>) {
    let w = src.width();
    let h = src.height();
    mag.reset(w, h, 0.0);
    if w == 0 || h == 0 {
        return;
    }

    let s = src.data();
    let m = mag.data_mut();
    for y in 0..h {
        let ym1 = y.saturating_sub(1);
        let yp1 = (y + 1).min(h - 1);
        for x in 0..w {
            let xm1 = x.saturating_sub(1);
            let xp1 = (x + 1).min(w - 1);

            let p00 = s[ym1 * w + xm1];
            let p01 = s[ym1 * w + x];
            let p02 = s[ym1 * w + xp1];
            let p10 = s[y * w + xm1];
            let p12 = s[y * w + xp1];
            let p20 = s[yp1 * w + xm1];
            let p21 = s[yp1 * w + x];
            let p22 = s[yp1 * w + xp1];

            let gx = (3.0 * p02 + 10.0 * p12 + 3.0 * p22) - (3.0 * p00 + 10.0 * p10 + 3.0 * p20);
            let gy = (3.0 * p20 + 10.0 * p21 + 3.0 * p22) - (3.0 * p00 + 10.0 * p01 + 3.0 * p02);

            m[y * w + x] = (gx * gx + gy * gy).sqrt() / 32.0;
        }
    }
}
