//! Traversal cost fields for magnetic edge snapping.
//!
//! Pipeline, per requested window:
//! 1. Clamp the window to the image; an empty intersection is
//!    [`snap_core::Error::InvalidRegion`].
//! 2. Read intensities over the window padded by the smoothing support, so
//!    window pixels never see artificial borders where the image continues.
//! 3. Separable Gaussian smoothing (`sigma = filter_radius / 3`).
//! 4. Scharr gradient magnitude, normalized to unit response on a unit ramp.
//! 5. Linear map from magnitude to cost: pixels at or above `threshold` cost
//!    [`MIN_COST`], flat pixels cost [`MAX_COST`].
//!
//! Costs are strictly positive, so shortest-path searches over a field always
//! terminate.

mod builder;
mod field;
mod gradient;
mod kernel;
mod smooth;

pub use builder::{CostFieldBuilder, CostParams, build_cost_field, edge_cost, search_region};
pub use field::{CostField, MAX_COST, MIN_COST};
pub use gradient::scharr_magnitude;
pub use kernel::GaussianKernel1D;
pub use smooth::smooth_separable;
