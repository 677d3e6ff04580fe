//! Fixed-width reshaping of flat board data.

use crate::error::{RenderError, Result};

/// Row width of every board grid (one chess rank).
pub const BOARD_WIDTH: usize = 8;

/// Row-major matrix with a fixed number of columns.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<f64>,
}

impl Grid {
    /// Splits `values` into rows of `width`. The length must be a non-zero
    /// multiple of `width`; nothing is padded or truncated.
    pub fn reshape(values: &[f64], width: usize) -> Result<Self> {
        if values.is_empty() {
            return Err(RenderError::EmptyBoard);
        }
        if width == 0 || values.len() % width != 0 {
            return Err(RenderError::MisalignedBoard {
                len: values.len(),
                width,
            });
        }
        Ok(Self {
            width,
            height: values.len() / width,
            cells: values.to_vec(),
        })
    }

    /// Reshape into rows of [`BOARD_WIDTH`].
    pub fn from_board(values: &[f64]) -> Result<Self> {
        Self::reshape(values, BOARD_WIDTH)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if col >= self.width {
            return None;
        }
        self.cells.get(row * self.width + col).copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.cells.chunks_exact(self.width)
    }

    /// Smallest and largest finite cell values. NaN cells are skipped; an
    /// all-NaN grid yields `(0.0, 0.0)`.
    pub fn value_range(&self) -> (f64, f64) {
        let mut finite = self.cells.iter().copied().filter(|v| v.is_finite());
        let Some(first) = finite.next() else {
            return (0.0, 0.0);
        };
        finite.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)))
    }
}
