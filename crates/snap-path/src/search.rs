use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::f32::consts::SQRT_2;

use serde::{Deserialize, Serialize};
use snap_core::{Error, Point2i, Rect};
use snap_cost::CostField;

use crate::segment::EdgeSegment;

// Clockwise from north: N, NE, E, SE, S, SW, W, NW. This order is the
// tie-break between equal-cost paths.
const DX: [i32; 8] = [0, 1, 1, 1, 0, -1, -1, -1];
const DY: [i32; 8] = [-1, -1, 0, 1, 1, 1, 0, -1];

const NO_PARENT: u32 = u32::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    /// Uniform-cost search.
    #[default]
    Dijkstra,
    /// Goal-directed search with the octile-distance lower bound.
    AStar,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Padding around the start/end bounding box that the search may use.
    pub search_radius: u32,
    /// Upper bound on settled pixels before giving up.
    pub max_expansions: Option<usize>,
    pub strategy: SearchStrategy,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            search_radius: 30,
            max_expansions: None,
            strategy: SearchStrategy::Dijkstra,
        }
    }
}

/// Minimum-cost 8-connected path from `start` to `end` over `field`.
///
/// Step weight between neighbors is the mean of their costs, scaled by
/// `sqrt(2)` for diagonal steps. The search is confined to the start/end
/// bounding box grown by `params.search_radius` (and clipped to the field).
///
/// Returns [`Error::NoPathFound`] when either endpoint lies outside the field
/// or the expansion budget runs out before `end` is settled.
pub fn find_path(
    field: &CostField,
    start: Point2i,
    end: Point2i,
    params: &SearchParams,
) -> Result<EdgeSegment, Error> {
    let not_found = Error::NoPathFound { start, end };
    if !field.contains(start) || !field.contains(end) {
        return Err(not_found);
    }
    if start == end {
        return Ok(EdgeSegment {
            points: vec![start],
            cost: 0.0,
        });
    }

    let margin = i32::try_from(params.search_radius).unwrap_or(i32::MAX);
    let window = Rect::from_corners(start, end)
        .grow(margin)
        .intersect(&field.region())
        .ok_or(not_found.clone())?;

    let heuristic_scale = match params.strategy {
        SearchStrategy::Dijkstra => 0.0,
        SearchStrategy::AStar => field.min_cost_in(&window).unwrap_or(0.0),
    };

    let mut grid = SearchGrid::new(field, window);
    let goal = grid.index_of(end).ok_or(not_found.clone())?;
    let origin = grid.index_of(start).ok_or(not_found.clone())?;

    let budget = params.max_expansions.unwrap_or(usize::MAX);
    let mut heap = BinaryHeap::new();
    let mut seq = 0u64;
    grid.dist[origin] = 0.0;
    heap.push(QueueEntry {
        priority: heuristic_scale * octile(start, end),
        seq,
        idx: origin,
    });

    let mut expansions = 0usize;
    let mut reached = false;
    while let Some(QueueEntry { idx, .. }) = heap.pop() {
        if grid.settled[idx] {
            continue;
        }
        grid.settled[idx] = true;
        if idx == goal {
            reached = true;
            break;
        }

        expansions += 1;
        if expansions > budget {
            break;
        }

        let p = window.point_at(idx);
        let cost_p = grid.cost[idx];
        let dist_p = grid.dist[idx];
        for dir in 0..8 {
            let q = p.offset(DX[dir], DY[dir]);
            let Some(nidx) = window.local_index(q) else {
                continue;
            };
            if grid.settled[nidx] {
                continue;
            }

            let mut step = 0.5 * (cost_p + grid.cost[nidx]);
            if DX[dir] != 0 && DY[dir] != 0 {
                step *= SQRT_2;
            }
            let candidate = dist_p + step;
            if candidate < grid.dist[nidx] {
                grid.dist[nidx] = candidate;
                grid.parent[nidx] = idx as u32;
                seq += 1;
                heap.push(QueueEntry {
                    priority: candidate + heuristic_scale * octile(q, end),
                    seq,
                    idx: nidx,
                });
            }
        }
    }

    tracing::trace!(
        ?start,
        ?end,
        ?window,
        expansions,
        reached,
        "path search finished"
    );

    if !reached {
        return Err(not_found);
    }

    let mut points = Vec::new();
    let mut cur = goal as u32;
    while cur != NO_PARENT {
        points.push(window.point_at(cur as usize));
        cur = grid.parent[cur as usize];
    }
    points.reverse();

    Ok(EdgeSegment {
        points,
        cost: grid.dist[goal],
    })
}

/// Per-call search state over the window, indexed row-major.
struct SearchGrid {
    window: Rect,
    cost: Vec<f32>,
    dist: Vec<f32>,
    parent: Vec<u32>,
    settled: Vec<bool>,
}

impl SearchGrid {
    fn new(field: &CostField, window: Rect) -> Self {
        let n = window.area();
        let mut cost = Vec::with_capacity(n);
        for y in window.y..window.bottom() {
            for x in window.x..window.right() {
                // The window is clipped to the field, so every lookup hits.
                cost.push(field.cost_at(Point2i::new(x, y)).unwrap_or(f32::INFINITY));
            }
        }

        Self {
            window,
            cost,
            dist: vec![f32::INFINITY; n],
            parent: vec![NO_PARENT; n],
            settled: vec![false; n],
        }
    }

    fn index_of(&self, p: Point2i) -> Option<usize> {
        self.window.local_index(p)
    }
}

#[inline]
fn octile(a: Point2i, b: Point2i) -> f32 {
    let dx = a.x.abs_diff(b.x) as f32;
    let dy = a.y.abs_diff(b.y) as f32;
    let (lo, hi) = if dx < dy { (dx, dy) } else { (dy, dx) };
    hi - lo + SQRT_2 * lo
}

#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    priority: f32,
    seq: u64,
    idx: usize,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    // Reversed so that `BinaryHeap` pops the lowest priority, then the
    // earliest insertion.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[cfg(test)]
mod tests {
    use snap_core::{Error, Point2i, Rect};
    use snap_cost::CostField;

    use super::{SearchParams, SearchStrategy, find_path};

    fn params(radius: u32) -> SearchParams {
        SearchParams {
            search_radius: radius,
            ..SearchParams::default()
        }
    }

    #[test]
    fn uniform_field_gives_straight_horizontal_line() {
        let field = CostField::uniform(Rect::from_size(20, 20), 1.0).expect("field");
        let seg = find_path(&field, Point2i::new(0, 0), Point2i::new(10, 0), &params(5))
            .expect("path");

        let expected: Vec<Point2i> = (0..=10).map(|x| Point2i::new(x, 0)).collect();
        assert_eq!(seg.points, expected);
        assert!((seg.cost - 10.0).abs() < 1e-5);
    }

    #[test]
    fn path_follows_cheap_valley() {
        // Expensive everywhere except an L-shaped valley.
        let region = Rect::from_size(15, 15);
        let mut costs = vec![16.0f32; region.area()];
        for x in 2..=12 {
            costs[12 * 15 + x] = 1.0;
        }
        for y in 2..=12 {
            costs[y * 15 + 2] = 1.0;
        }
        let field = CostField::from_costs(region, costs).expect("field");

        let seg = find_path(&field, Point2i::new(2, 2), Point2i::new(12, 12), &params(10))
            .expect("path");

        assert!(seg.connects(Point2i::new(2, 2), Point2i::new(12, 12)));
        assert!(seg.is_8_connected());
        for p in &seg.points {
            assert_eq!(field.cost_at(*p), Some(1.0), "{p:?} left the valley");
        }
    }

    #[test]
    fn endpoints_connectivity_and_determinism_on_noisy_field() {
        let region = Rect::new(-8, -4, 40, 30);
        let costs: Vec<f32> = (0..region.area())
            .map(|i| 1.0 + ((i * 7919) % 97) as f32 / 8.0)
            .collect();
        let field = CostField::from_costs(region, costs).expect("field");

        let pairs = [
            (Point2i::new(-8, -4), Point2i::new(31, 25)),
            (Point2i::new(5, 5), Point2i::new(6, 20)),
            (Point2i::new(20, 0), Point2i::new(-3, 18)),
            (Point2i::new(0, 0), Point2i::new(1, 1)),
        ];
        for (a, b) in pairs {
            let first = find_path(&field, a, b, &params(6)).expect("path");
            let second = find_path(&field, a, b, &params(6)).expect("path");

            assert!(first.connects(a, b));
            assert!(first.is_8_connected());
            assert_eq!(first, second);
        }
    }

    #[test]
    fn astar_matches_dijkstra_cost() {
        let region = Rect::from_size(32, 32);
        let costs: Vec<f32> = (0..region.area())
            .map(|i| 1.0 + ((i * 40503) % 13) as f32)
            .collect();
        let field = CostField::from_costs(region, costs).expect("field");
        let a = Point2i::new(3, 28);
        let b = Point2i::new(27, 4);

        let dijkstra = find_path(&field, a, b, &params(8)).expect("dijkstra");
        let astar = find_path(
            &field,
            a,
            b,
            &SearchParams {
                strategy: SearchStrategy::AStar,
                ..params(8)
            },
        )
        .expect("astar");

        assert!(astar.connects(a, b));
        assert!(astar.is_8_connected());
        assert!((dijkstra.cost - astar.cost).abs() < 1e-3);
    }

    #[test]
    fn search_stays_inside_radius_window() {
        let region = Rect::from_size(60, 60);
        let mut costs = vec![16.0f32; region.area()];
        // Cheap detour far below the anchors.
        for x in 0..60 {
            costs[50 * 60 + x] = 1.0;
        }
        let field = CostField::from_costs(region, costs).expect("field");
        let a = Point2i::new(10, 10);
        let b = Point2i::new(40, 10);

        let seg = find_path(&field, a, b, &params(4)).expect("path");
        let window = Rect::from_corners(a, b).grow(4);
        assert!(seg.points.iter().all(|p| window.contains(*p)));
    }

    #[test]
    fn endpoints_outside_field_fail() {
        let field = CostField::uniform(Rect::new(0, 0, 10, 10), 1.0).expect("field");
        let a = Point2i::new(0, 0);
        let b = Point2i::new(12, 3);

        assert_eq!(
            find_path(&field, a, b, &params(5)),
            Err(Error::NoPathFound { start: a, end: b })
        );
    }

    #[test]
    fn exhausted_budget_fails() {
        let field = CostField::uniform(Rect::from_size(50, 50), 16.0).expect("field");
        let a = Point2i::new(0, 25);
        let b = Point2i::new(49, 25);
        let p = SearchParams {
            max_expansions: Some(10),
            ..params(20)
        };

        assert!(matches!(
            find_path(&field, a, b, &p),
            Err(Error::NoPathFound { .. })
        ));
    }

    #[test]
    fn same_start_and_end_is_single_point() {
        let field = CostField::uniform(Rect::from_size(4, 4), 2.0).expect("field");
        let p = Point2i::new(1, 2);
        let seg = find_path(&field, p, p, &params(3)).expect("path");
        assert_eq!(seg.points, vec![p]);
        assert_eq!(seg.cost, 0.0);
    }
}
