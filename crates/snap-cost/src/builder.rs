use snap_core::{Error, Image, IntensitySource, Point2i, Rect};

use crate::field::{CostField, MAX_COST, MIN_COST};
use crate::gradient::scharr_magnitude;
use crate::kernel::GaussianKernel1D;
use crate::smooth::smooth_separable;

#[derive(Debug, Clone, PartialEq)]
pub struct CostParams {
    /// Half-width of the smoothing kernel in pixels.
    pub filter_radius: f32,
    /// Gradient magnitude at which a pixel counts as a strong edge.
    pub threshold: f32,
}

impl Default for CostParams {
    fn default() -> Self {
        Self {
            filter_radius: 3.0,
            threshold: 100.0,
        }
    }
}

impl CostParams {
    pub fn validate(&self) -> Result<(), Error> {
        if !self.filter_radius.is_finite() || self.filter_radius <= 0.0 {
            return Err(Error::InvalidConfig("filter_radius must be finite and > 0"));
        }
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(Error::InvalidConfig("threshold must be finite and > 0"));
        }
        Ok(())
    }
}

/// Window covering both anchors plus `search_radius` pixels on every side.
pub fn search_region(a: Point2i, b: Point2i, search_radius: u32) -> Rect {
    let margin = i32::try_from(search_radius).unwrap_or(i32::MAX);
    Rect::from_corners(a, b).grow(margin)
}

/// Maps a gradient magnitude to a traversal cost in `[MIN_COST, MAX_COST]`.
#[inline]
pub fn edge_cost(magnitude: f32, threshold: f32) -> f32 {
    let s = magnitude / threshold;
    let s = if s.is_finite() { s.clamp(0.0, 1.0) } else { 0.0 };
    MAX_COST - (MAX_COST - MIN_COST) * s
}

/// Builds cost fields, reusing scratch buffers across calls.
///
/// Results depend only on the inputs of each [`CostFieldBuilder::build`] call.
#[derive(Debug, Clone)]
pub struct CostFieldBuilder {
    raw: Image<f32>,
    tmp: Image<f32>,
    smooth: Image<f32>,
    mag: Image<f32>,
}

impl CostFieldBuilder {
    pub fn new() -> Self {
        Self {
            raw: Image::new_fill(0, 0, 0.0),
            tmp: Image::new_fill(0, 0, 0.0),
            smooth: Image::new_fill(0, 0, 0.0),
            mag: Image::new_fill(0, 0, 0.0),
        }
    }

    /// Computes the cost field over `region` clamped to the image bounds.
    ///
    /// Fails with [`Error::InvalidRegion`] when `region` does not overlap the
    /// image at all.
    pub fn build<S: IntensitySource + ?Sized>(
        &mut self,
        src: &S,
        region: Rect,
        params: &CostParams,
    ) -> Result<CostField, Error> {
        params.validate()?;

        let bounds = src.bounds();
        let clamped = region
            .intersect(&bounds)
            .ok_or(Error::InvalidRegion { region })?;
        let kernel = GaussianKernel1D::from_filter_radius(params.filter_radius)?;

        // One extra pixel for the gradient stencil.
        let pad = kernel.radius as i32 + 1;
        let padded = clamped.grow(pad).intersect(&bounds).unwrap_or(clamped);

        self.load(src, &padded);
        smooth_separable(&self.raw, &kernel, &mut self.tmp, &mut self.smooth);
        scharr_magnitude(&self.smooth, &mut self.mag);

        let pw = padded.width as usize;
        let mag = self.mag.data();
        let mut costs = Vec::with_capacity(clamped.area());
        for y in clamped.y..clamped.bottom() {
            let ly = (y - padded.y) as usize;
            let lx0 = (clamped.x - padded.x) as usize;
            let row = &mag[ly * pw + lx0..ly * pw + lx0 + clamped.width as usize];
            costs.extend(row.iter().map(|&m| edge_cost(m, params.threshold)));
        }

        tracing::debug!(
            region = ?clamped,
            kernel_radius = kernel.radius,
            threshold = params.threshold,
            "built cost field"
        );

        let costs = Image::from_vec(clamped.width as usize, clamped.height as usize, costs)?;
        Ok(CostField::from_image(clamped, costs))
    }

    fn load<S: IntensitySource + ?Sized>(&mut self, src: &S, window: &Rect) {
        let w = window.width as usize;
        let h = window.height as usize;
        self.raw.reset(w, h, 0.0);

        let dst = self.raw.data_mut();
        for ly in 0..h {
            let y = window.y as usize + ly;
            for lx in 0..w {
                dst[ly * w + lx] = src.intensity(window.x as usize + lx, y);
            }
        }
    }
}

impl Default for CostFieldBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot convenience wrapper around [`CostFieldBuilder::build`].
pub fn build_cost_field<S: IntensitySource + ?Sized>(
    src: &S,
    region: Rect,
    params: &CostParams,
) -> Result<CostField, Error> {
    CostFieldBuilder::new().build(src, region, params)
}

#[cfg(test)]
mod tests {
    use snap_core::{Error, Image, Point2i, Rect};

    use super::{CostFieldBuilder, CostParams, build_cost_field, edge_cost, search_region};
    use crate::field::{MAX_COST, MIN_COST};

    fn vertical_step(width: usize, height: usize, edge_x: usize) -> Image<u8> {
        let data = (0..width * height)
            .map(|i| if i % width >= edge_x { 200 } else { 0 })
            .collect();
        Image::from_vec(width, height, data).expect("valid image")
    }

    #[test]
    fn cost_mapping_is_clamped() {
        assert_eq!(edge_cost(0.0, 50.0), MAX_COST);
        assert_eq!(edge_cost(50.0, 50.0), MIN_COST);
        assert_eq!(edge_cost(500.0, 50.0), MIN_COST);
        assert_eq!(edge_cost(f32::NAN, 50.0), MAX_COST);

        let mid = edge_cost(25.0, 50.0);
        assert!((mid - 0.5 * (MIN_COST + MAX_COST)).abs() < 1e-6);
    }

    #[test]
    fn step_edge_is_cheap_and_flat_area_expensive() {
        let img = vertical_step(40, 30, 20);
        let params = CostParams {
            filter_radius: 3.0,
            threshold: 20.0,
        };

        let field = build_cost_field(&img, Rect::from_size(40, 30), &params).expect("field");

        assert_eq!(field.region(), Rect::from_size(40, 30));
        for y in 0..30 {
            let on_edge = field.cost_at(Point2i::new(19, y)).expect("inside");
            let also_edge = field.cost_at(Point2i::new(20, y)).expect("inside");
            let flat = field.cost_at(Point2i::new(5, y)).expect("inside");
            assert_eq!(on_edge, MIN_COST);
            assert_eq!(also_edge, MIN_COST);
            assert_eq!(flat, MAX_COST);
        }
    }

    #[test]
    fn region_is_clamped_to_image() {
        let img = vertical_step(20, 10, 10);
        let field = build_cost_field(&img, Rect::new(-5, 4, 10, 20), &CostParams::default())
            .expect("partially inside");
        assert_eq!(field.region(), Rect::new(0, 4, 5, 6));
    }

    #[test]
    fn region_outside_image_is_rejected() {
        let img = Image::new_fill(100, 100, 0u8);
        let region = Rect::new(200, 0, 20, 20);

        let err = build_cost_field(&img, region, &CostParams::default()).expect_err("outside");
        assert_eq!(err, Error::InvalidRegion { region });
    }

    #[test]
    fn subregion_matches_full_field() {
        let mut data = vec![0u8; 64 * 48];
        for y in 0..48 {
            for x in 0..64 {
                data[y * 64 + x] = ((x * 7 + y * 13) % 251) as u8;
            }
        }
        let img = Image::from_vec(64, 48, data).expect("valid image");
        let params = CostParams {
            filter_radius: 4.0,
            threshold: 30.0,
        };
        let mut builder = CostFieldBuilder::new();

        let full = builder
            .build(&img, Rect::from_size(64, 48), &params)
            .expect("full field");
        let sub_region = Rect::new(20, 15, 12, 9);
        let sub = builder.build(&img, sub_region, &params).expect("sub field");

        for y in sub_region.y..sub_region.bottom() {
            for x in sub_region.x..sub_region.right() {
                let p = Point2i::new(x, y);
                let a = full.cost_at(p).expect("inside full");
                let b = sub.cost_at(p).expect("inside sub");
                assert!((a - b).abs() < 1e-5, "{p:?}: {a} vs {b}");
            }
        }
    }

    #[test]
    fn builds_are_deterministic() {
        let img = vertical_step(32, 32, 11);
        let params = CostParams::default();
        let region = search_region(Point2i::new(4, 4), Point2i::new(20, 25), 5);
        let mut builder = CostFieldBuilder::new();

        let a = builder.build(&img, region, &params).expect("field");
        let _ = builder
            .build(&img, Rect::new(0, 0, 3, 3), &params)
            .expect("scratch reuse");
        let b = builder.build(&img, region, &params).expect("field");

        assert_eq!(a, b);
    }

    #[test]
    fn search_region_pads_bounding_box() {
        let r = search_region(Point2i::new(10, 2), Point2i::new(4, 8), 3);
        assert_eq!(r, Rect::new(1, -1, 13, 13));
    }

    #[test]
    fn invalid_params_are_rejected() {
        let img = Image::new_fill(8, 8, 0u8);
        let bad = CostParams {
            filter_radius: 0.0,
            threshold: 10.0,
        };
        assert!(matches!(
            build_cost_field(&img, Rect::from_size(8, 8), &bad),
            Err(Error::InvalidConfig(_))
        ));
    }
}
