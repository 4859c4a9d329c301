use crate::geom::{Point2i, Rect};
use crate::image::{Image, ImageView};

/// Read-only access to per-pixel intensity.
///
/// Callers guarantee `x < width()` and `y < height()` when calling
/// [`IntensitySource::intensity`]; implementations may panic otherwise.
pub trait IntensitySource {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn intensity(&self, x: usize, y: usize) -> f32;

    fn bounds(&self) -> Rect {
        Rect::from_size(self.width(), self.height())
    }

    fn contains(&self, p: Point2i) -> bool {
        self.bounds().contains(p)
    }
}

impl<T: Copy + Into<f32>> IntensitySource for ImageView<'_, T> {
    fn width(&self) -> usize {
        ImageView::width(self)
    }

    fn height(&self) -> usize {
        ImageView::height(self)
    }

    #[inline]
    fn intensity(&self, x: usize, y: usize) -> f32 {
        self.row(y)[x].into()
    }
}

impl<T: Copy + Into<f32>> IntensitySource for Image<T> {
    fn width(&self) -> usize {
        Image::width(self)
    }

    fn height(&self) -> usize {
        Image::height(self)
    }

    #[inline]
    fn intensity(&self, x: usize, y: usize) -> f32 {
        self.data()[y * Image::width(self) + x].into()
    }
}

/// Interleaved RGB8 pixels read as Rec.601 luma.
#[derive(Debug, Clone, Copy)]
pub struct RgbLuma<'a> {
    view: ImageView<'a, [u8; 3]>,
}

impl<'a> RgbLuma<'a> {
    pub fn new(view: ImageView<'a, [u8; 3]>) -> Self {
        Self { view }
    }
}

impl IntensitySource for RgbLuma<'_> {
    fn width(&self) -> usize {
        self.view.width()
    }

    fn height(&self) -> usize {
        self.view.height()
    }

    #[inline]
    fn intensity(&self, x: usize, y: usize) -> f32 {
        let [r, g, b] = self.view.row(y)[x];
        0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32
    }
}
