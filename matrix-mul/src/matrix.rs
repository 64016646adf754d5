//! Dense column-major matrix storage.

use std::ops::{Index, IndexMut, Range, RangeInclusive};

use rand::Rng;
use rand::distributions::Uniform;

use crate::Error;

/// A dense `rows × cols` matrix of `f64` in a single buffer.
///
/// Elements are stored column-major: `(row, col)` lives at
/// `row + rows * col`. The buffer always holds `rows * cols` elements until
/// [`release`](Matrix::release) frees it; after that the dimensions are kept
/// but the matrix has no elements and must not be indexed.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Creates a zero-filled matrix.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, 0.0)
    }

    pub fn square(n: usize) -> Self {
        Self::new(n, n)
    }

    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Creates a matrix whose `(row, col)` element is `f(row, col)`.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut m = Self::new(rows, cols);
        for col in 0..cols {
            for row in 0..rows {
                *m.at_mut(row, col) = f(row, col);
            }
        }
        m
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub(crate) fn offset(&self, row: usize, col: usize) -> usize {
        row + self.rows * col
    }

    pub fn at(&self, row: usize, col: usize) -> f64 {
        self.data[self.offset(row, col)]
    }

    pub fn at_mut(&mut self, row: usize, col: usize) -> &mut f64 {
        let offset = self.offset(row, col);
        &mut self.data[offset]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Copies every row out into its own `1 × cols` matrix.
    pub fn row_vectors(&self) -> Vec<Matrix> {
        (0..self.rows)
            .map(|i| Matrix::from_fn(1, self.cols, |_, j| self.at(i, j)))
            .collect()
    }

    /// Copies every column out into its own `rows × 1` matrix.
    pub fn column_vectors(&self) -> Vec<Matrix> {
        (0..self.cols)
            .map(|j| Matrix::from_fn(self.rows, 1, |i, _| self.at(i, j)))
            .collect()
    }

    /// Frees the element buffer while the handle itself stays alive.
    pub fn release(&mut self) {
        self.data.clear();
        self.data.shrink_to_fit();
    }

    pub fn is_released(&self) -> bool {
        self.data.len() != self.rows * self.cols
    }

    /// Overwrites every element with a uniform sample from `range`.
    pub fn fill_random<R: Rng>(&mut self, rng: &mut R, range: Range<f64>) {
        let dist = Uniform::from(range);
        for value in &mut self.data {
            *value = rng.sample(dist);
        }
    }

    /// Overwrites every element with a uniform integer from `range`,
    /// inclusive on both ends.
    pub fn fill_random_integers<R: Rng>(&mut self, rng: &mut R, range: RangeInclusive<i32>) {
        let dist = Uniform::from(range);
        for value in &mut self.data {
            *value = f64::from(rng.sample(dist));
        }
    }

    /// Sequential reference product `a × b`.
    pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix, Error> {
        if a.cols != b.rows {
            return Err(Error::DimensionMismatch(a.rows, a.cols, b.rows, b.cols));
        }

        let mut dest = Matrix::new(a.rows, b.cols);
        for i in 0..dest.rows {
            for j in 0..dest.cols {
                let mut sum = 0.0;
                for k in 0..b.rows {
                    sum += a.at(i, k) * b.at(k, j);
                }
                *dest.at_mut(i, j) = sum;
            }
        }
        Ok(dest)
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.data[self.offset(row, col)]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        self.at_mut(row, col)
    }
}

/// Inner product accumulated in index order, starting from `0.0`.
///
/// Uses the same accumulation order as [`Matrix::multiply`], so a
/// distributed product compares equal to the sequential one bit for bit.
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).fold(0.0, |sum, (x, y)| sum + x * y)
}
