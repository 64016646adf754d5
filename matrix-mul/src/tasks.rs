//! Decomposition of a product into independent row·column tasks.

use crate::{Error, Matrix};

/// One output cell: the dot product of row `row` of A and column `col` of B.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Task {
    pub row: usize,
    pub col: usize,
}

/// The rows of A, the columns of B, and one task per output cell.
///
/// Rows and columns are owned copies, so both source matrices can be
/// released once the decomposition exists. Tasks are enumerated row-major:
/// all columns of row 0 first, then row 1, and so on.
#[derive(Debug, Clone)]
pub struct Decomposition {
    rows: Vec<Matrix>,
    cols: Vec<Matrix>,
    tasks: Vec<Task>,
}

impl Decomposition {
    /// Splits `a` (R×K) and `b` (K×C) into R rows, C columns and R·C tasks.
    pub fn new(a: &Matrix, b: &Matrix) -> Result<Self, Error> {
        if a.cols() != b.rows() {
            return Err(Error::DimensionMismatch(a.rows(), a.cols(), b.rows(), b.cols()));
        }

        let rows = a.row_vectors();
        let cols = b.column_vectors();
        let tasks = (0..rows.len())
            .flat_map(|row| (0..cols.len()).map(move |col| Task { row, col }))
            .collect();

        Ok(Self { rows, cols, tasks })
    }

    pub fn rows(&self) -> &[Matrix] {
        &self.rows
    }

    pub fn cols(&self) -> &[Matrix] {
        &self.cols
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Shape of the product.
    pub fn result_shape(&self) -> (usize, usize) {
        (self.rows.len(), self.cols.len())
    }

    /// The row and column vectors a task multiplies.
    pub fn operands(&self, task: Task) -> (&[f64], &[f64]) {
        (self.rows[task.row].as_slice(), self.cols[task.col].as_slice())
    }
}
