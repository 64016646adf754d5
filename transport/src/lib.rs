//! Blocking point-to-point message passing between a fixed set of ranks.
//!
//! `rank-transport` models the small slice of a message-passing runtime that
//! a coordinator/worker program needs: every participant has an ordinal
//! [`Rank`] inside a world of fixed size, and can send or receive integer
//! signals, single `f64` scalars and variable-length `f64` vectors on
//! integer [`Tag`]s. Every call blocks until the transport completes it.
//!
//! # Backends
//!
//! - [`LocalWorld`]: every rank is a [`LocalEndpoint`] living on its own
//!   thread of the current process. Used by the tests and the default binary.
//! - `MpiTransport` (feature `mpi-support`): one rank per MPI process.
//!
//! # Matching
//!
//! A receive names a [`Source`] and a [`Tag`]. Messages from one source on
//! one tag arrive in the order they were sent; messages that do not match a
//! pending receive stay queued for a later one.
//!
//! # Example
//!
//! ```
//! use rank_transport::{Error, LocalWorld, Source, Transport};
//!
//! let replies = LocalWorld::run(2, |mut endpoint| -> Result<f64, Error> {
//!     if endpoint.info().is_root() {
//!         endpoint.send_values(&[1.0, 2.0, 3.0], 1, 0)?;
//!         endpoint.recv_scalar(Source::Rank(1), 0)
//!     } else {
//!         let values = endpoint.recv_values(Source::Any, 0)?;
//!         endpoint.send_scalar(values.iter().sum(), 0, 0)?;
//!         Ok(0.0)
//!     }
//! });
//!
//! assert_eq!(replies[0].as_ref().unwrap(), &6.0);
//! ```

mod error;
mod local;
mod message;
#[cfg(feature = "mpi-support")]
mod mpi_world;
mod world;

pub use error::Error;
pub use local::{LocalEndpoint, LocalWorld};
pub use message::{Rank, Source, Status, Tag};
#[cfg(feature = "mpi-support")]
pub use mpi_world::MpiTransport;
pub use world::{Transport, WorldInfo};
