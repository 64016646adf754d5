//! Error types for matrix-mul operations.

use rank_transport::Rank;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("transport error: {0}")]
    Transport(#[from] rank_transport::Error),

    #[error("at least 2 participants are needed for this program, found {0}")]
    InsufficientRanks(usize),

    #[error("matrix dimension mismatch: A is {0}x{1}, B is {2}x{3}")]
    DimensionMismatch(usize, usize, usize, usize),

    #[error("unknown control signal {0}")]
    UnknownSignal(i32),

    #[error("operand length mismatch: row has {0} elements, column has {1}")]
    LengthMismatch(usize, usize),

    #[error("the worker pool is empty")]
    EmptyPool,

    #[error("worker rank {rank} still owes the result of cell ({row}, {col})")]
    HandleBusy { rank: Rank, row: usize, col: usize },

    #[error("worker rank {0} has no outstanding task")]
    HandleIdle(Rank),

    #[error("result cell ({0}, {1}) lies outside a {2}x{3} matrix")]
    OutOfBounds(usize, usize, usize, usize),

    #[error("result cell ({0}, {1}) was written twice")]
    DuplicateWrite(usize, usize),

    #[error("{0} result cells were never written")]
    Incomplete(usize),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{0} transport support was not compiled in")]
    BackendUnavailable(&'static str),
}
