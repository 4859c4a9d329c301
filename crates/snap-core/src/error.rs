use crate::geom::{Point2i, Rect};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("invalid stride")]
    InvalidStride,
    #[error("out of bounds")]
    OutOfBounds,
    #[error("region {region:?} does not intersect the image")]
    InvalidRegion { region: Rect },
    #[error("no path found from {start:?} to {end:?}")]
    NoPathFound { start: Point2i, end: Point2i },
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
