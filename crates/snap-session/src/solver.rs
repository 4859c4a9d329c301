use snap_core::{Error, IntensitySource, Point2i};
use snap_cost::{CostFieldBuilder, search_region};
use snap_path::{EdgeSegment, find_path};

use crate::config::MagneticConfig;

/// Computes snapped segments between anchor pairs.
///
/// Each call builds a fresh cost field over the anchors' search window and
/// runs one bounded search over it. Only scratch buffers are reused.
#[derive(Debug, Clone, Default)]
pub struct EdgeSolver {
    builder: CostFieldBuilder,
}

impl EdgeSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_compute_edge<S: IntensitySource + ?Sized>(
        &mut self,
        src: &S,
        a: Point2i,
        b: Point2i,
        cfg: &MagneticConfig,
    ) -> Result<EdgeSegment, Error> {
        let region = search_region(a, b, cfg.search_radius);
        let field = self.builder.build(src, region, &cfg.cost_params())?;
        find_path(&field, a, b, &cfg.search_params())
    }

    /// Like [`EdgeSolver::try_compute_edge`], but falls back to the straight
    /// line between the anchors when no snapped path is available.
    pub fn compute_edge<S: IntensitySource + ?Sized>(
        &mut self,
        src: &S,
        a: Point2i,
        b: Point2i,
        cfg: &MagneticConfig,
    ) -> EdgeSegment {
        match self.try_compute_edge(src, a, b, cfg) {
            Ok(seg) => seg,
            Err(err) => {
                tracing::warn!(%err, ?a, ?b, "edge search failed, using straight line");
                EdgeSegment::straight_line(a, b)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use snap_core::{Error, Image, Point2i};

    use super::EdgeSolver;
    use crate::config::MagneticConfig;

    fn vertical_step(width: usize, height: usize, edge_x: usize) -> Image<u8> {
        let data = (0..width * height)
            .map(|i| if i % width >= edge_x { 220 } else { 20 })
            .collect();
        Image::from_vec(width, height, data).expect("valid image")
    }

    #[test]
    fn snaps_to_nearby_vertical_edge() {
        let img = vertical_step(60, 60, 30);
        let cfg = MagneticConfig {
            search_radius: 10,
            threshold: 20,
            ..MagneticConfig::default()
        };
        let mut solver = EdgeSolver::new();
        let a = Point2i::new(29, 5);
        let b = Point2i::new(30, 54);

        let seg = solver.compute_edge(&img, a, b, &cfg);

        assert!(seg.connects(a, b));
        assert!(seg.is_8_connected());
        for p in &seg.points {
            assert!((29..=30).contains(&p.x), "{p:?} strayed from the edge");
        }
    }

    #[test]
    fn prefers_edge_over_straight_chord() {
        // Bright square; anchors on two adjacent corners of its outline, the
        // chord between them cuts through the flat interior.
        let (w, h) = (80usize, 80usize);
        let mut data = vec![10u8; w * h];
        for y in 20..60 {
            for x in 20..60 {
                data[y * w + x] = 230;
            }
        }
        let img = Image::from_vec(w, h, data).expect("valid image");
        let cfg = MagneticConfig {
            search_radius: 15,
            threshold: 20,
            ..MagneticConfig::default()
        };
        let a = Point2i::new(20, 30);
        let b = Point2i::new(30, 20);

        let seg = EdgeSolver::new().compute_edge(&img, a, b, &cfg);

        assert!(seg.connects(a, b));
        assert!(seg.is_8_connected());
        // The chord passes through (25, 25); the outline never leaves the
        // left and top edge bands.
        for p in &seg.points {
            assert!(p.x <= 23 || p.y <= 23, "{p:?} cut through the interior");
        }
    }

    #[test]
    fn falls_back_to_straight_line_when_budget_is_exhausted() {
        let img = Image::new_fill(40, 40, 0u8);
        let cfg = MagneticConfig {
            max_expansions: Some(3),
            ..MagneticConfig::default()
        };
        let a = Point2i::new(2, 2);
        let b = Point2i::new(30, 12);
        let mut solver = EdgeSolver::new();

        assert!(matches!(
            solver.try_compute_edge(&img, a, b, &cfg),
            Err(Error::NoPathFound { .. })
        ));

        let seg = solver.compute_edge(&img, a, b, &cfg);
        assert!(seg.connects(a, b));
        assert!(seg.is_8_connected());
        assert_eq!(seg.cost, 0.0);
    }
}
