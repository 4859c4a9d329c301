//! Magnetic selection sessions.
//!
//! A session keeps an ordered list of user anchors and one snapped
//! [`snap_path::EdgeSegment`] per consecutive anchor pair. Segments are
//! recomputed only next to an edited anchor. Closing the path adds the
//! segment from the last anchor back to the first, and committing hands the
//! flattened polygon to a [`SelectionSink`].
//!
//! States:
//!
//! - `Empty`: no anchors.
//! - `Open`: `n >= 1` anchors and `n - 1` segments.
//! - `Closed`: `n >= 2` anchors and `n` segments, segment `n - 1` wraps
//!   from the last anchor to the first.
//!
//! Cancelling always returns to `Empty` without touching the sink.

mod anchors;
mod config;
mod session;
mod solver;

pub use anchors::AnchorPath;
pub use config::MagneticConfig;
pub use session::{AnchorEdit, PlaceOutcome, SelectionSink, SessionState, SnapSession};
pub use solver::EdgeSolver;
