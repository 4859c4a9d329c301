use snap_core::{Error, IntensitySource, Point2i};
use snap_path::EdgeSegment;

use crate::anchors::{AnchorPath, in_snap_box};
use crate::config::MagneticConfig;
use crate::solver::EdgeSolver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    Open,
    Closed,
}

/// Receives the finished polygon. Whether it becomes a pixel mask or a vector
/// outline is up to the implementation.
pub trait SelectionSink {
    fn commit_polygon(&mut self, points: &[Point2i]);
}

impl<F: FnMut(&[Point2i])> SelectionSink for F {
    fn commit_polygon(&mut self, points: &[Point2i]) {
        self(points)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceOutcome {
    /// First anchor of a new path.
    Started,
    /// Anchor appended at the given index.
    Added(usize),
    /// The click landed on the first anchor and closed the path.
    Closed,
    /// Nothing changed.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorEdit {
    Moved,
    /// The anchor was dragged off the image and removed.
    Removed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Drag {
    index: usize,
    target: Option<Point2i>,
}

/// Interactive magnetic selection: anchors placed by the user, snapped
/// segments between them, closed into a polygon and handed to a
/// [`SelectionSink`].
///
/// Every operation runs to completion and leaves the anchor/segment
/// bookkeeping consistent.
#[derive(Debug, Clone)]
pub struct SnapSession {
    config: MagneticConfig,
    zoom: f32,
    path: AnchorPath,
    solver: EdgeSolver,
    drag: Option<Drag>,
}

impl SnapSession {
    pub fn new(config: MagneticConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            config,
            zoom: 1.0,
            path: AnchorPath::new(),
            solver: EdgeSolver::new(),
            drag: None,
        })
    }

    pub fn state(&self) -> SessionState {
        if self.path.is_empty() {
            SessionState::Empty
        } else if self.path.is_closed() {
            SessionState::Closed
        } else {
            SessionState::Open
        }
    }

    pub fn config(&self) -> &MagneticConfig {
        &self.config
    }

    /// Swaps in a new configuration. Existing segments are kept as computed.
    pub fn set_config(&mut self, config: MagneticConfig) -> Result<(), Error> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Current view zoom; the anchor hit box shrinks as the zoom grows.
    pub fn set_zoom(&mut self, zoom: f32) -> Result<(), Error> {
        if !zoom.is_finite() || zoom <= 0.0 {
            return Err(Error::InvalidConfig("zoom must be finite and > 0"));
        }
        self.zoom = zoom;
        Ok(())
    }

    pub fn path(&self) -> &AnchorPath {
        &self.path
    }

    pub fn anchors(&self) -> &[Point2i] {
        self.path.anchors()
    }

    pub fn segments(&self) -> &[EdgeSegment] {
        self.path.segments()
    }

    pub fn polygon(&self) -> Vec<Point2i> {
        self.path.flatten()
    }

    /// Anchor whose hit box contains `p` at the current zoom.
    pub fn hit_test(&self, p: Point2i) -> Option<usize> {
        self.path.hit_test(p, self.config.snap_half_extent(self.zoom))
    }

    pub fn place_anchor<S: IntensitySource + ?Sized>(
        &mut self,
        src: &S,
        p: Point2i,
    ) -> Result<PlaceOutcome, Error> {
        if !src.contains(p) {
            return Err(Error::OutOfBounds);
        }

        let outcome = match self.state() {
            SessionState::Closed => PlaceOutcome::Ignored,
            SessionState::Empty => {
                self.push(src, p);
                PlaceOutcome::Started
            }
            SessionState::Open if self.hits_first_anchor(p) => {
                if self.close(src) {
                    PlaceOutcome::Closed
                } else {
                    PlaceOutcome::Ignored
                }
            }
            SessionState::Open => {
                self.push(src, p);
                PlaceOutcome::Added(self.path.len() - 1)
            }
        };

        tracing::debug!(?p, ?outcome, anchors = self.path.len(), "place anchor");
        Ok(outcome)
    }

    /// Places an anchor at `cursor` when interactive mode is on and the
    /// cursor has travelled at least `anchor_gap` pixels from the last anchor.
    pub fn auto_anchor<S: IntensitySource + ?Sized>(
        &mut self,
        src: &S,
        cursor: Point2i,
    ) -> Result<bool, Error> {
        if !self.config.interactive || self.state() != SessionState::Open {
            return Ok(false);
        }
        if !src.contains(cursor) {
            return Err(Error::OutOfBounds);
        }

        let Some(last) = self.path.last() else {
            return Ok(false);
        };
        if last.distance(cursor) < self.config.anchor_gap as f32 {
            return Ok(false);
        }

        self.push(src, cursor);
        tracing::debug!(?cursor, anchors = self.path.len(), "auto anchor");
        Ok(true)
    }

    /// Segment from the last anchor to `cursor`, without touching the
    /// session.
    pub fn preview<S: IntensitySource + ?Sized>(
        &mut self,
        src: &S,
        cursor: Point2i,
    ) -> Option<EdgeSegment> {
        if self.state() != SessionState::Open || !src.contains(cursor) {
            return None;
        }
        let last = self.path.last()?;
        Some(self.solver.compute_edge(src, last, cursor, &self.config))
    }

    /// Moves anchor `index` to `p`, recomputing its adjacent segments. An
    /// anchor moved off the image is deleted.
    pub fn move_anchor<S: IntensitySource + ?Sized>(
        &mut self,
        src: &S,
        index: usize,
        p: Point2i,
    ) -> Result<AnchorEdit, Error> {
        if index >= self.path.len() {
            return Err(Error::OutOfBounds);
        }
        if !src.contains(p) {
            self.delete_anchor(src, index)?;
            return Ok(AnchorEdit::Removed);
        }

        let (solver, config) = (&mut self.solver, &self.config);
        let mut edge = |a: Point2i, b: Point2i| solver.compute_edge(src, a, b, config);
        self.path.move_anchor(index, p, &mut edge);

        tracing::debug!(index, ?p, "move anchor");
        Ok(AnchorEdit::Moved)
    }

    pub fn delete_anchor<S: IntensitySource + ?Sized>(
        &mut self,
        src: &S,
        index: usize,
    ) -> Result<(), Error> {
        let (solver, config) = (&mut self.solver, &self.config);
        let mut edge = |a: Point2i, b: Point2i| solver.compute_edge(src, a, b, config);
        let removed = self
            .path
            .remove_anchor(index, &mut edge)
            .ok_or(Error::OutOfBounds)?;

        self.drag = None;
        tracing::debug!(index, ?removed, state = ?self.state(), "delete anchor");
        Ok(())
    }

    /// Adds an anchor on the closed outline, splitting the nearest segment.
    pub fn insert_anchor<S: IntensitySource + ?Sized>(
        &mut self,
        src: &S,
        p: Point2i,
    ) -> Result<Option<usize>, Error> {
        if !src.contains(p) {
            return Err(Error::OutOfBounds);
        }

        let (solver, config) = (&mut self.solver, &self.config);
        let mut edge = |a: Point2i, b: Point2i| solver.compute_edge(src, a, b, config);
        let index = self.path.insert_anchor(p, &mut edge);

        // Anchors at or after the insertion point shift by one.
        if let (Some(k), Some(drag)) = (index, &mut self.drag)
            && drag.index >= k
        {
            drag.index += 1;
        }

        tracing::debug!(?p, ?index, "insert anchor");
        Ok(index)
    }

    /// Starts dragging the anchor under `p`, if any.
    pub fn begin_drag(&mut self, p: Point2i) -> Option<usize> {
        let index = self.hit_test(p)?;
        self.drag = Some(Drag {
            index,
            target: None,
        });
        Some(index)
    }

    pub fn drag_to(&mut self, p: Point2i) {
        if let Some(drag) = &mut self.drag {
            drag.target = Some(p);
        }
    }

    /// Applies the pending drag, if it went anywhere.
    pub fn end_drag<S: IntensitySource + ?Sized>(
        &mut self,
        src: &S,
    ) -> Result<Option<AnchorEdit>, Error> {
        let Some(Drag {
            index,
            target: Some(p),
        }) = self.drag.take()
        else {
            return Ok(None);
        };
        self.move_anchor(src, index, p).map(Some)
    }

    /// Drops the most recent anchor. Closed paths are not affected.
    pub fn undo(&mut self) -> Option<Point2i> {
        let popped = self.path.pop();
        if popped.is_some() {
            self.drag = None;
            tracing::debug!(?popped, anchors = self.path.len(), "undo anchor");
        }
        popped
    }

    /// Closes an open path of at least two anchors.
    pub fn close<S: IntensitySource + ?Sized>(&mut self, src: &S) -> bool {
        let (solver, config) = (&mut self.solver, &self.config);
        let mut edge = |a: Point2i, b: Point2i| solver.compute_edge(src, a, b, config);
        let closed = self.path.close(&mut edge);
        if closed {
            tracing::debug!(anchors = self.path.len(), "path closed");
        }
        closed
    }

    /// Closes the path if needed, hands the polygon to `sink` and resets the
    /// session. Returns `false` when there is nothing to commit.
    pub fn commit<S, K>(&mut self, src: &S, sink: &mut K) -> bool
    where
        S: IntensitySource + ?Sized,
        K: SelectionSink + ?Sized,
    {
        if self.path.len() < 2 {
            return false;
        }
        if !self.path.is_closed() {
            self.close(src);
        }

        let polygon = self.path.flatten();
        tracing::debug!(
            anchors = self.path.len(),
            points = polygon.len(),
            "commit polygon"
        );
        sink.commit_polygon(&polygon);
        self.reset();
        true
    }

    /// Discards everything without notifying any sink.
    pub fn cancel(&mut self) {
        if !self.path.is_empty() {
            tracing::debug!(anchors = self.path.len(), "selection cancelled");
        }
        self.reset();
    }

    fn reset(&mut self) {
        self.path.clear();
        self.drag = None;
    }

    fn push<S: IntensitySource + ?Sized>(&mut self, src: &S, p: Point2i) {
        let (solver, config) = (&mut self.solver, &self.config);
        let mut edge = |a: Point2i, b: Point2i| solver.compute_edge(src, a, b, config);
        self.path.push(p, &mut edge);
    }

    fn hits_first_anchor(&self, p: Point2i) -> bool {
        let half = self.config.snap_half_extent(self.zoom);
        self.path
            .first()
            .is_some_and(|a| in_snap_box(a, p, half))
    }
}
