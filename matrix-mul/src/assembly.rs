//! Writing collected results into the product matrix.

use crate::{Error, Matrix, Task};

/// The product under construction. Each cell accepts exactly one write.
#[derive(Debug, Clone)]
pub struct Assembly {
    result: Matrix,
    written: Vec<bool>,
    remaining: usize,
}

impl Assembly {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            result: Matrix::new(rows, cols),
            written: vec![false; rows * cols],
            remaining: rows * cols,
        }
    }

    /// Stores `value` at the task's `(row, col)`.
    pub fn write(&mut self, task: Task, value: f64) -> Result<(), Error> {
        let (rows, cols) = (self.result.rows(), self.result.cols());
        if task.row >= rows || task.col >= cols {
            return Err(Error::OutOfBounds(task.row, task.col, rows, cols));
        }

        let offset = self.result.offset(task.row, task.col);
        if self.written[offset] {
            return Err(Error::DuplicateWrite(task.row, task.col));
        }

        self.written[offset] = true;
        self.remaining -= 1;
        self.result[(task.row, task.col)] = value;
        Ok(())
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }

    /// The finished product; fails if any cell is still unwritten.
    pub fn finish(self) -> Result<Matrix, Error> {
        if !self.is_complete() {
            return Err(Error::Incomplete(self.remaining));
        }
        Ok(self.result)
    }
}
