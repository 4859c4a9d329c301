//! Umbrella crate for the `edge-snap` workspace.
//!
//! Re-exports the image primitives, the cost field builder, the path search
//! and the interactive session so applications depend on a single crate.

pub use snap_core::*;
pub use snap_cost::*;
pub use snap_path::*;
pub use snap_session::*;
