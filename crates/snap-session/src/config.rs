use serde::{Deserialize, Serialize};
use snap_core::Error;
use snap_cost::CostParams;
use snap_path::{SearchParams, SearchStrategy};

/// Tunable parameters of the magnetic selection.
///
/// Deserialization fills missing fields from [`MagneticConfig::default`];
/// call [`MagneticConfig::validate`] before use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MagneticConfig {
    /// Smoothing radius for gradient computation, in pixels.
    pub filter_radius: f32,
    /// Gradient magnitude considered a strong edge.
    pub threshold: u32,
    /// How far the snapped path may stray from the anchor bounding box.
    pub search_radius: u32,
    /// On-screen side of the anchor hit box, in screen pixels.
    pub snap_tolerance_px: u32,
    /// Minimum cursor travel between automatic anchors.
    pub anchor_gap: u32,
    /// Place anchors automatically while the cursor moves.
    pub interactive: bool,
    pub strategy: SearchStrategy,
    pub max_expansions: Option<usize>,
}

impl Default for MagneticConfig {
    fn default() -> Self {
        Self {
            filter_radius: 3.0,
            threshold: 100,
            search_radius: 30,
            snap_tolerance_px: 10,
            anchor_gap: 20,
            interactive: false,
            strategy: SearchStrategy::Dijkstra,
            max_expansions: None,
        }
    }
}

impl MagneticConfig {
    pub const MAX_FILTER_RADIUS: f32 = 100.0;
    pub const MAX_THRESHOLD: u32 = 255;
    pub const MAX_SEARCH_RADIUS: u32 = 200;

    pub fn validate(&self) -> Result<(), Error> {
        if !self.filter_radius.is_finite()
            || self.filter_radius <= 0.0
            || self.filter_radius > Self::MAX_FILTER_RADIUS
        {
            return Err(Error::InvalidConfig("filter_radius must be in (0, 100]"));
        }
        if !(1..=Self::MAX_THRESHOLD).contains(&self.threshold) {
            return Err(Error::InvalidConfig("threshold must be in 1..=255"));
        }
        if !(1..=Self::MAX_SEARCH_RADIUS).contains(&self.search_radius) {
            return Err(Error::InvalidConfig("search_radius must be in 1..=200"));
        }
        if self.snap_tolerance_px == 0 {
            return Err(Error::InvalidConfig("snap_tolerance_px must be >= 1"));
        }
        if self.anchor_gap == 0 {
            return Err(Error::InvalidConfig("anchor_gap must be >= 1"));
        }
        if self.max_expansions == Some(0) {
            return Err(Error::InvalidConfig("max_expansions must be >= 1"));
        }
        Ok(())
    }

    pub fn cost_params(&self) -> CostParams {
        CostParams {
            filter_radius: self.filter_radius,
            threshold: self.threshold as f32,
        }
    }

    pub fn search_params(&self) -> SearchParams {
        SearchParams {
            search_radius: self.search_radius,
            max_expansions: self.max_expansions,
            strategy: self.strategy,
        }
    }

    /// Half side, in image pixels, of the anchor hit box at `zoom`.
    ///
    /// The box side is `ceil(snap_tolerance_px / zoom)` so that it keeps the
    /// same on-screen size at every zoom level.
    pub fn snap_half_extent(&self, zoom: f32) -> i32 {
        let side = (self.snap_tolerance_px as f32 / zoom).ceil();
        let side = if side.is_finite() { side.max(1.0) } else { 1.0 };
        (side as i32) / 2
    }
}
