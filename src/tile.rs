//! Owned raster tiles.
//!
//! A [`Tile`] is a row-major `f64` grid. The estimation core treats tiles as
//! immutable inputs and never caches them; every derived array is freshly
//! allocated within the call that produces it.

use crate::util::{PhaseCorrError, PhaseCorrResult};

/// Row-major 2D sample grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

impl Tile {
    /// Wraps a row-major buffer, rejecting empty or mismatched dimensions.
    pub fn from_vec(width: usize, height: usize, data: Vec<f64>) -> PhaseCorrResult<Self> {
        let expected = width.checked_mul(height);
        if width == 0 || height == 0 || expected != Some(data.len()) {
            return Err(PhaseCorrError::InvalidDimensions {
                width,
                height,
                len: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Builds a tile by evaluating `f(x, y)` at every sample.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// All-zero tile.
    pub fn zeros(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width * height],
        }
    }

    /// Internal constructor for buffers whose shape is known to be valid.
    pub(crate) fn from_raw(width: usize, height: usize, data: Vec<f64>) -> Self {
        debug_assert_eq!(width * height, data.len());
        Self {
            width,
            height,
            data,
        }
    }

    /// Tile width in samples.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Tile height in samples.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Backing row-major slice.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Sample at `(x, y)`; caller guarantees bounds.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        debug_assert!(x < self.width && y < self.height);
        self.data[y * self.width + x]
    }

    /// Contiguous slice for row `y`.
    pub fn row(&self, y: usize) -> &[f64] {
        let start = y * self.width;
        &self.data[start..start + self.width]
    }

    /// Errors on the first NaN or infinite sample.
    pub fn validate_finite(&self) -> PhaseCorrResult<()> {
        match self.data.iter().position(|v| !v.is_finite()) {
            Some(index) => Err(PhaseCorrError::NonFiniteInput { index }),
            None => Ok(()),
        }
    }

    pub(crate) fn is_all_zero(&self) -> bool {
        self.data.iter().all(|&v| v == 0.0)
    }

    /// Copies a `width x height` window with its top-left corner at
    /// `(x0, y0)`, or `None` when the window leaves the tile.
    pub(crate) fn window(&self, x0: isize, y0: isize, width: usize, height: usize) -> Option<Tile> {
        if x0 < 0 || y0 < 0 {
            return None;
        }
        let (x0, y0) = (x0 as usize, y0 as usize);
        if x0 + width > self.width || y0 + height > self.height {
            return None;
        }
        let mut data = Vec::with_capacity(width * height);
        for y in y0..y0 + height {
            let start = y * self.width + x0;
            data.extend_from_slice(&self.data[start..start + width]);
        }
        Some(Tile::from_raw(width, height, data))
    }

    /// Zero-pads the tile by `margin` samples on every side.
    pub(crate) fn zero_padded(&self, margin: usize) -> Tile {
        let width = self.width + 2 * margin;
        let height = self.height + 2 * margin;
        let mut data = vec![0.0; width * height];
        for y in 0..self.height {
            let dst = (y + margin) * width + margin;
            data[dst..dst + self.width].copy_from_slice(self.row(y));
        }
        Tile::from_raw(width, height, data)
    }
}
