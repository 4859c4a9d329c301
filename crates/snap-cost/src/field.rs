use snap_core::{Error, Image, Point2i, Rect};

/// Lowest traversal cost, assigned to pixels at or above the edge threshold.
pub const MIN_COST: f32 = 1.0;
/// Highest traversal cost, assigned to perfectly flat pixels.
pub const MAX_COST: f32 = 16.0;

/// Per-pixel traversal costs over a window of the source image.
///
/// All costs are finite and strictly positive.
#[derive(Debug, Clone, PartialEq)]
pub struct CostField {
    region: Rect,
    costs: Image<f32>,
}

impl CostField {
    /// Wraps precomputed costs laid out row-major over `region`.
    pub fn from_costs(region: Rect, costs: Vec<f32>) -> Result<Self, Error> {
        if region.is_empty() {
            return Err(Error::InvalidRegion { region });
        }
        if costs.iter().any(|c| !c.is_finite() || *c <= 0.0) {
            return Err(Error::InvalidConfig("costs must be finite and > 0"));
        }

        let costs = Image::from_vec(region.width as usize, region.height as usize, costs)?;
        Ok(Self { region, costs })
    }

    /// Field with the same cost everywhere.
    pub fn uniform(region: Rect, cost: f32) -> Result<Self, Error> {
        Self::from_costs(region, vec![cost; region.area()])
    }

    pub(crate) fn from_image(region: Rect, costs: Image<f32>) -> Self {
        debug_assert_eq!(costs.width(), region.width as usize);
        debug_assert_eq!(costs.height(), region.height as usize);
        Self { region, costs }
    }

    /// Window covered by the field, in image coordinates.
    pub fn region(&self) -> Rect {
        self.region
    }

    pub fn contains(&self, p: Point2i) -> bool {
        self.region.contains(p)
    }

    pub fn cost_at(&self, p: Point2i) -> Option<f32> {
        let idx = self.region.local_index(p)?;
        self.costs.data().get(idx).copied()
    }

    /// Costs in row-major order relative to the region origin.
    pub fn costs(&self) -> &Image<f32> {
        &self.costs
    }

    /// Smallest cost within `window` (clamped to the field), if any pixel
    /// overlaps.
    pub fn min_cost_in(&self, window: &Rect) -> Option<f32> {
        let w = window.intersect(&self.region)?;
        let stride = self.region.width as usize;
        let data = self.costs.data();
        let x0 = (w.x - self.region.x) as usize;
        let y0 = (w.y - self.region.y) as usize;

        let mut best = f32::INFINITY;
        for ly in y0..y0 + w.height as usize {
            let row = &data[ly * stride + x0..ly * stride + x0 + w.width as usize];
            for &c in row {
                best = best.min(c);
            }
        }
        Some(best)
    }
}

#[cfg(test)]
mod tests {
    use snap_core::{Error, Point2i, Rect};

    use super::CostField;

    #[test]
    fn lookup_uses_image_coordinates() {
        let region = Rect::new(10, 20, 3, 2);
        let field =
            CostField::from_costs(region, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).expect("valid");

        assert_eq!(field.cost_at(Point2i::new(10, 20)), Some(1.0));
        assert_eq!(field.cost_at(Point2i::new(12, 21)), Some(6.0));
        assert_eq!(field.cost_at(Point2i::new(9, 20)), None);
        assert_eq!(field.cost_at(Point2i::new(10, 22)), None);
    }

    #[test]
    fn rejects_bad_costs_and_sizes() {
        let region = Rect::new(0, 0, 2, 2);

        assert!(matches!(
            CostField::from_costs(region, vec![1.0, 0.0, 1.0, 1.0]),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            CostField::from_costs(region, vec![1.0, f32::INFINITY, 1.0, 1.0]),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            CostField::from_costs(region, vec![1.0; 3]),
            Err(Error::SizeMismatch { .. })
        ));
        assert!(matches!(
            CostField::uniform(Rect::new(0, 0, 0, 5), 1.0),
            Err(Error::InvalidRegion { .. })
        ));
    }

    #[test]
    fn min_cost_respects_window() {
        let region = Rect::new(0, 0, 3, 3);
        let field = CostField::from_costs(
            region,
            vec![
                9.0, 8.0, 7.0, //
                6.0, 5.0, 4.0, //
                3.0, 2.0, 1.5, //
            ],
        )
        .expect("valid");

        assert_eq!(field.min_cost_in(&region), Some(1.5));
        assert_eq!(field.min_cost_in(&Rect::new(-5, -5, 7, 7)), Some(5.0));
        assert_eq!(field.min_cost_in(&Rect::new(0, 0, 2, 1)), Some(8.0));
        assert_eq!(field.min_cost_in(&Rect::new(10, 10, 2, 2)), None);
    }
}
