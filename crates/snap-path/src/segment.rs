use snap_core::Point2i;

/// Snapped path between two anchors.
///
/// `points` starts at the first anchor, ends at the second and every pair of
/// consecutive points is 8-connected.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeSegment {
    pub points: Vec<Point2i>,
    /// Accumulated traversal cost; zero for straight-line fallbacks.
    pub cost: f32,
}

impl EdgeSegment {
    /// Digital straight line from `a` to `b` (both inclusive).
    ///
    /// Each step advances the major axis by one and the minor axis by at most
    /// one, so the result is 8-connected with `max(|dx|, |dy|) + 1` points.
    pub fn straight_line(a: Point2i, b: Point2i) -> Self {
        let dx = i64::from(b.x) - i64::from(a.x);
        let dy = i64::from(b.y) - i64::from(a.y);
        let steps = dx.abs().max(dy.abs());

        let mut points = Vec::with_capacity(steps as usize + 1);
        points.push(a);
        for i in 1..=steps {
            let x = i64::from(a.x) + round_div(dx * i, steps);
            let y = i64::from(a.y) + round_div(dy * i, steps);
            points.push(Point2i::new(x as i32, y as i32));
        }

        Self { points, cost: 0.0 }
    }

    pub fn start(&self) -> Option<Point2i> {
        self.points.first().copied()
    }

    pub fn end(&self) -> Option<Point2i> {
        self.points.last().copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn connects(&self, a: Point2i, b: Point2i) -> bool {
        self.start() == Some(a) && self.end() == Some(b)
    }

    pub fn is_8_connected(&self) -> bool {
        self.points.windows(2).all(|w| w[0].chebyshev(w[1]) == 1)
    }
}

/// Integer division rounding half away from zero.
#[inline]
fn round_div(num: i64, den: i64) -> i64 {
    let q = num / den;
    let r = num % den;
    if 2 * r.abs() >= den { q + num.signum() } else { q }
}

#[cfg(test)]
mod tests {
    use snap_core::Point2i;

    use super::EdgeSegment;

    #[test]
    fn straight_line_endpoints_and_connectivity() {
        let cases = [
            ((0, 0), (10, 0)),
            ((0, 0), (0, -7)),
            ((3, 4), (-5, 9)),
            ((-2, -2), (6, 1)),
            ((1, 1), (1, 1)),
        ];

        for ((ax, ay), (bx, by)) in cases {
            let a = Point2i::new(ax, ay);
            let b = Point2i::new(bx, by);
            let seg = EdgeSegment::straight_line(a, b);

            assert!(seg.connects(a, b), "{a:?} -> {b:?}");
            assert!(seg.is_8_connected(), "{a:?} -> {b:?}");
            assert_eq!(seg.len() as u32, a.chebyshev(b) + 1);
        }
    }

    #[test]
    fn straight_line_near_coordinate_limits() {
        let a = Point2i::new(i32::MAX - 3, i32::MIN);
        let b = Point2i::new(i32::MAX, i32::MIN + 2);
        let seg = EdgeSegment::straight_line(a, b);

        assert!(seg.connects(a, b));
        assert!(seg.is_8_connected());
        assert_eq!(seg.len(), 4);
    }

    #[test]
    fn horizontal_line_is_exact() {
        let seg = EdgeSegment::straight_line(Point2i::new(0, 0), Point2i::new(10, 0));
        let expected: Vec<Point2i> = (0..=10).map(|x| Point2i::new(x, 0)).collect();
        assert_eq!(seg.points, expected);
    }

    #[test]
    fn connectivity_check_detects_gaps() {
        let seg = EdgeSegment {
            points: vec![Point2i::new(0, 0), Point2i::new(2, 0)],
            cost: 0.0,
        };
        assert!(!seg.is_8_connected());

        let dup = EdgeSegment {
            points: vec![Point2i::new(0, 0), Point2i::new(0, 0)],
            cost: 0.0,
        };
        assert!(!dup.is_8_connected());
    }
}
