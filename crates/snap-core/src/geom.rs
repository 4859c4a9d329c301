/// Integer pixel coordinate. Anchors and path points live on this grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point2i {
    pub x: i32,
    pub y: i32,
}

impl Point2i {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Max-norm distance; 1 means the points are 8-connected neighbors.
    pub fn chebyshev(self, other: Self) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        dx.max(dy)
    }

    pub fn distance(self, other: Self) -> f32 {
        let dx = self.x.abs_diff(other.x) as f32;
        let dy = self.y.abs_diff(other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Axis-aligned pixel rectangle. `x..x+width` by `y..y+height`, end exclusive.
///
/// Negative sizes are normalized to zero, so an empty rectangle keeps its
/// origin but contains no pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width: width.max(0),
            height: height.max(0),
        }
    }

    /// Full bounds of a `width x height` image.
    pub fn from_size(width: usize, height: usize) -> Self {
        let w = i32::try_from(width).unwrap_or(i32::MAX);
        let h = i32::try_from(height).unwrap_or(i32::MAX);
        Self::new(0, 0, w, h)
    }

    /// Smallest rectangle containing both points.
    pub fn from_corners(a: Point2i, b: Point2i) -> Self {
        let x0 = a.x.min(b.x);
        let y0 = a.y.min(b.y);
        let x1 = a.x.max(b.x);
        let y1 = a.y.max(b.y);
        Self::new(
            x0,
            y0,
            x1.saturating_sub(x0).saturating_add(1),
            y1.saturating_sub(y0).saturating_add(1),
        )
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn area(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        self.width as usize * self.height as usize
    }

    pub fn contains(&self, p: Point2i) -> bool {
        p.x >= self.x && p.y >= self.y && p.x < self.right() && p.y < self.bottom()
    }

    /// Grows the rectangle by `margin` pixels on every side.
    pub fn grow(&self, margin: i32) -> Self {
        let x = self.x.saturating_sub(margin);
        let y = self.y.saturating_sub(margin);
        let right = self.right().saturating_add(margin);
        let bottom = self.bottom().saturating_add(margin);
        Self::new(x, y, right.saturating_sub(x), bottom.saturating_sub(y))
    }

    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= x || bottom <= y {
            return None;
        }
        Some(Self::new(x, y, right - x, bottom - y))
    }

    /// Row-major index of `p` relative to the rectangle origin.
    #[inline]
    pub fn local_index(&self, p: Point2i) -> Option<usize> {
        if !self.contains(p) {
            return None;
        }
        let lx = (p.x - self.x) as usize;
        let ly = (p.y - self.y) as usize;
        Some(ly * self.width as usize + lx)
    }

    /// Inverse of [`Rect::local_index`]. `idx` must be below [`Rect::area`].
    #[inline]
    pub fn point_at(&self, idx: usize) -> Point2i {
        let w = self.width.max(1) as usize;
        Point2i {
            x: self.x + (idx % w) as i32,
            y: self.y + (idx / w) as i32,
        }
    }
}
