//! Integer matrix type shared by fixtures, tasks and results.
//!
//! A [`Matrix`] serializes as a bare JSON array of rows (`[[1, 2], [3, 4]]`),
//! which is the wire format of both the catalog and the results file.

use serde::{Deserialize, Serialize};

/// A row-major integer matrix.
///
/// Rows are expected to share one length, but deserialization does not
/// enforce it: catalogs and results files are external input, and a ragged
/// matrix must be reported by verification rather than rejected on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Matrix {
    rows: Vec<Vec<i64>>,
}

impl Matrix {
    /// Wrap the given rows without checking that they are rectangular.
    pub fn from_rows(rows: Vec<Vec<i64>>) -> Self {
        Self { rows }
    }

    /// A `rows` x `cols` matrix filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows: vec![vec![0; cols]; rows],
        }
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Length of the first row, or 0 for a matrix without rows.
    pub fn col_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// `(rows, cols)` as reported by [`row_count`](Self::row_count) and
    /// [`col_count`](Self::col_count).
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count(), self.col_count())
    }

    /// Returns `true` if the matrix has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns `true` if every row has the same length as the first.
    pub fn is_rectangular(&self) -> bool {
        let cols = self.col_count();
        self.rows.iter().all(|row| row.len() == cols)
    }

    /// Element at `(row, col)`, if present.
    pub fn get(&self, row: usize, col: usize) -> Option<i64> {
        self.rows.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Overwrite the element at `(row, col)`. Returns `false` if out of bounds.
    pub fn set(&mut self, row: usize, col: usize, value: i64) -> bool {
        match self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(cell) => {
                *cell = value;
                true
            },
            None => false,
        }
    }

    /// Borrow the rows.
    pub fn rows(&self) -> &[Vec<i64>] {
        &self.rows
    }

    /// Standard product `self * rhs`.
    ///
    /// Returns `None` when the operands are not multiplicable (ragged,
    /// mismatched inner dimension) or when an entry overflows `i64`.
    pub fn multiply(&self, rhs: &Matrix) -> Option<Matrix> {
        if !self.is_rectangular() || !rhs.is_rectangular() {
            return None;
        }
        let (n, m) = self.shape();
        if m != rhs.row_count() {
            return None;
        }
        let p = rhs.col_count();

        let mut out = Matrix::zeros(n, p);
        for i in 0..n {
            for j in 0..p {
                let mut acc: i64 = 0;
                for k in 0..m {
                    acc = acc.checked_add(self.rows[i][k].checked_mul(rhs.rows[k][j])?)?;
                }
                out.rows[i][j] = acc;
            }
        }
        Some(out)
    }
}
