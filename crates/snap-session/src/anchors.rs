use snap_core::Point2i;
use snap_path::EdgeSegment;

/// Ordered anchors with the snapped segments between them.
///
/// `segments[j]` runs from `anchors[j]` to `anchors[next(j)]`. An open path
/// has one segment less than it has anchors; a closed path has one segment per
/// anchor, the last one leading back to `anchors[0]`.
///
/// Mutating operations take an `edge` callback that produces the segment
/// between two points, so all index bookkeeping stays in this type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnchorPath {
    anchors: Vec<Point2i>,
    segments: Vec<EdgeSegment>,
    closed: bool,
}

impl AnchorPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn anchors(&self) -> &[Point2i] {
        &self.anchors
    }

    pub fn segments(&self) -> &[EdgeSegment] {
        &self.segments
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    pub fn first(&self) -> Option<Point2i> {
        self.anchors.first().copied()
    }

    pub fn last(&self) -> Option<Point2i> {
        self.anchors.last().copied()
    }

    /// Index of the anchor following `i`, wrapping on closed paths.
    pub fn next(&self, i: usize) -> Option<usize> {
        let n = self.anchors.len();
        if i >= n {
            None
        } else if i + 1 < n {
            Some(i + 1)
        } else if self.closed {
            Some(0)
        } else {
            None
        }
    }

    /// Index of the anchor preceding `i`, wrapping on closed paths.
    pub fn prev(&self, i: usize) -> Option<usize> {
        let n = self.anchors.len();
        if i >= n {
            None
        } else if i > 0 {
            Some(i - 1)
        } else if self.closed {
            Some(n - 1)
        } else {
            None
        }
    }

    /// Segment ending at anchor `i`.
    pub fn segment_before(&self, i: usize) -> Option<usize> {
        self.prev(i)
    }

    /// Segment starting at anchor `i`.
    pub fn segment_after(&self, i: usize) -> Option<usize> {
        self.next(i).map(|_| i)
    }

    /// First anchor whose `half`-extent box contains `p`.
    pub fn hit_test(&self, p: Point2i, half: i32) -> Option<usize> {
        self.anchors.iter().position(|&a| in_snap_box(a, p, half))
    }

    /// Checks segment count, endpoints and 8-connectivity.
    pub fn invariants_hold(&self) -> bool {
        let n = self.anchors.len();
        let expected = if self.closed { n } else { n.saturating_sub(1) };
        if self.segments.len() != expected || (self.closed && n < 2) {
            return false;
        }

        self.segments.iter().enumerate().all(|(j, seg)| {
            let Some(k) = self.next(j) else {
                return false;
            };
            seg.connects(self.anchors[j], self.anchors[k]) && seg.is_8_connected()
        })
    }

    /// Appends an anchor (and the segment reaching it). No-op when closed.
    pub fn push(
        &mut self,
        p: Point2i,
        edge: &mut impl FnMut(Point2i, Point2i) -> EdgeSegment,
    ) -> bool {
        if self.closed {
            return false;
        }
        if let Some(last) = self.last() {
            self.segments.push(edge(last, p));
        }
        self.anchors.push(p);
        true
    }

    /// Adds the closing segment back to the first anchor.
    pub fn close(&mut self, edge: &mut impl FnMut(Point2i, Point2i) -> EdgeSegment) -> bool {
        if self.closed || self.anchors.len() < 2 {
            return false;
        }
        let (first, last) = (self.anchors[0], self.anchors[self.anchors.len() - 1]);
        self.segments.push(edge(last, first));
        self.closed = true;
        true
    }

    /// Removes the most recent anchor and its trailing segment. Closed paths
    /// are left untouched.
    pub fn pop(&mut self) -> Option<Point2i> {
        if self.closed {
            return None;
        }
        let p = self.anchors.pop()?;
        self.segments.pop();
        Some(p)
    }

    /// Moves anchor `i` and recomputes the (at most two) segments touching it.
    pub fn move_anchor(
        &mut self,
        i: usize,
        p: Point2i,
        edge: &mut impl FnMut(Point2i, Point2i) -> EdgeSegment,
    ) -> bool {
        if i >= self.anchors.len() {
            return false;
        }
        self.anchors[i] = p;

        if let Some(j) = self.segment_before(i) {
            self.segments[j] = edge(self.anchors[j], p);
        }
        if let (Some(k), Some(next)) = (self.segment_after(i), self.next(i)) {
            self.segments[k] = edge(p, self.anchors[next]);
        }
        true
    }

    /// Removes anchor `i`, bridging its neighbors with a single segment.
    ///
    /// A closed path reduced to one anchor reopens.
    pub fn remove_anchor(
        &mut self,
        i: usize,
        edge: &mut impl FnMut(Point2i, Point2i) -> EdgeSegment,
    ) -> Option<Point2i> {
        let n = self.anchors.len();
        if i >= n {
            return None;
        }

        if self.closed && n <= 2 {
            self.segments.clear();
            self.closed = false;
            return Some(self.anchors.remove(i));
        }

        match (self.prev(i), self.next(i)) {
            (Some(prev), Some(next)) => {
                let bridge = edge(self.anchors[prev], self.anchors[next]);
                self.segments[prev] = bridge;
                self.segments.remove(i);
            }
            (None, Some(_)) => {
                self.segments.remove(0);
            }
            (Some(_), None) => {
                self.segments.pop();
            }
            (None, None) => {}
        }
        Some(self.anchors.remove(i))
    }

    /// Splits the segment closest to `p` (by summed distance to its anchors)
    /// at a new anchor `p`. Closed paths only; returns the new anchor index.
    pub fn insert_anchor(
        &mut self,
        p: Point2i,
        edge: &mut impl FnMut(Point2i, Point2i) -> EdgeSegment,
    ) -> Option<usize> {
        if !self.closed {
            return None;
        }

        let mut best: Option<(usize, usize, f32)> = None;
        for j in 0..self.anchors.len() {
            let Some(k) = self.next(j) else { continue };
            let d = self.anchors[j].distance(p) + p.distance(self.anchors[k]);
            if best.is_none_or(|(_, _, bd)| d < bd) {
                best = Some((j, k, d));
            }
        }
        let (j, k, _) = best?;

        let head = edge(self.anchors[j], p);
        let tail = edge(p, self.anchors[k]);
        self.segments[j] = head;
        self.segments.insert(j + 1, tail);
        self.anchors.insert(j + 1, p);
        Some(j + 1)
    }

    /// All segment points in order, without repeating shared anchors. A
    /// closed path ends on its first point.
    pub fn flatten(&self) -> Vec<Point2i> {
        let Some((first, rest)) = self.segments.split_first() else {
            return self.anchors.first().copied().into_iter().collect();
        };

        let mut out = first.points.clone();
        for seg in rest {
            out.extend(seg.points.iter().skip(1));
        }
        out
    }

    pub fn clear(&mut self) {
        self.anchors.clear();
        self.segments.clear();
        self.closed = false;
    }
}

/// Whether `p` lies in the square of half side `half` centered on `anchor`.
pub(crate) fn in_snap_box(anchor: Point2i, p: Point2i, half: i32) -> bool {
    u32::try_from(half).is_ok_and(|h| anchor.chebyshev(p) <= h)
}
