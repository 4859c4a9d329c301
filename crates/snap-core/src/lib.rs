//! Foundational primitives for edge snapping.
//!
//! ## Coordinates
//! Pixels are addressed by integer `(x, y)` with `x` growing to the right and
//! `y` growing downwards. [`Point2i`] is the anchor/path coordinate type;
//! [`Rect`] describes bounded windows with exclusive right/bottom edges.
//!
//! ## Image Views and Stride
//! Images use element stride (not byte stride). `stride` is the distance, in
//! elements, between adjacent row starts and may be greater than `width`.
//!
//! ## Intensity Sources
//! Algorithms read pixels only through [`IntensitySource`], so any grayscale
//! buffer (or an RGB buffer through [`RgbLuma`]) can feed the cost builder.

mod error;
mod geom;
mod image;
mod sample;

pub use error::Error;
pub use geom::{Point2i, Rect};
pub use image::{Image, ImageView};
pub use sample::{IntensitySource, RgbLuma};
