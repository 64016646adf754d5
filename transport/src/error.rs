//! Error types for transport operations.

use thiserror::Error;

use crate::Rank;

#[derive(Debug, Error)]
pub enum Error {
    #[error("rank {0} is outside a world of size {1}")]
    InvalidRank(Rank, usize),

    #[error("rank {0} cannot send to itself")]
    SelfSend(Rank),

    #[error("peer rank {0} has disconnected")]
    Disconnected(Rank),

    #[error("every peer of rank {0} has disconnected")]
    Closed(Rank),

    #[error("expected a {expected} payload, found a {found} payload")]
    PayloadMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("expected {expected} elements, found {found}")]
    CountMismatch { expected: usize, found: usize },

    #[cfg(feature = "mpi-support")]
    #[error("MPI could not be initialized (already initialized in this process?)")]
    MpiInit,
}
