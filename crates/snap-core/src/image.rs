use crate::Error;

/// Owned, contiguous row-major image.
#[derive(Debug, Clone, PartialEq)]
pub struct Image<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T> Image<T> {
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self, Error> {
        let expected = width.checked_mul(height).ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: data.len(),
        })?;

        if data.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x)
    }

    pub fn as_view(&self) -> ImageView<'_, T> {
        ImageView {
            width: self.width,
            height: self.height,
            stride: self.width,
            data: &self.data,
        }
    }
}

impl<T: Clone> Image<T> {
    /// Allocates a `width x height` image filled with `value`.
    ///
    /// An overflowing size yields an empty image.
    pub fn new_fill(width: usize, height: usize, value: T) -> Self {
        match width.checked_mul(height) {
            Some(len) => Self {
                width,
                height,
                data: vec![value; len],
            },
            None => Self {
                width: 0,
                height: 0,
                data: Vec::new(),
            },
        }
    }

    /// Reshapes in place, reusing the allocation when possible. Contents are
    /// reset to `value`.
    pub fn reset(&mut self, width: usize, height: usize, value: T) {
        let len = width.saturating_mul(height);
        self.data.clear();
        self.data.resize(len, value);
        self.width = width;
        self.height = height;
    }
}

/// Borrowed image view with an element stride (`stride >= width`).
#[derive(Debug, Clone, Copy)]
pub struct ImageView<'a, T> {
    width: usize,
    height: usize,
    stride: usize,
    data: &'a [T],
}

impl<'a, T> ImageView<'a, T> {
    pub fn from_slice(
        width: usize,
        height: usize,
        stride: usize,
        data: &'a [T],
    ) -> Result<Self, Error> {
        if stride < width {
            return Err(Error::InvalidStride);
        }

        let min_len = min_required_len(width, height, stride).ok_or(Error::SizeMismatch {
            expected: usize::MAX,
            actual: data.len(),
        })?;

        if data.len() < min_len {
            return Err(Error::SizeMismatch {
                expected: min_len,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            stride,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn row(&self, y: usize) -> &'a [T] {
        assert!(y < self.height, "row index out of bounds");
        let start = y * self.stride;
        &self.data[start..start + self.width]
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.stride + x)
    }
}

fn min_required_len(width: usize, height: usize, stride: usize) -> Option<usize> {
    if width == 0 || height == 0 {
        return Some(0);
    }

    let rows_before_last = height.checked_sub(1)?;
    let base = rows_before_last.checked_mul(stride)?;
    base.checked_add(width)
}
