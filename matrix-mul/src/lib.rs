//! Distributed matrix multiplication over a pool of message-passing workers.
//!
//! `matrix-mul` splits `C = A × B` into one dot-product task per output
//! cell and pumps the tasks through a fixed pool of worker ranks, then
//! checks the assembled product against a single-process multiply.
//!
//! # Pieces
//!
//! - [`Decomposition`]: rows of A, columns of B, and the row-major task list.
//! - [`Dispatcher`]: round-robin batches of up to `pool size` tasks; a batch
//!   is fully issued before any of its results is awaited.
//! - [`Worker`]: waits for a signal, multiplies two vectors, replies.
//! - [`Assembly`]: writes each result into its cell exactly once.
//!
//! The wire protocol is described in [`protocol`].
//!
//! # Example
//!
//! ```
//! use matrix_mul::{Config, Outcome};
//! use rank_transport::LocalWorld;
//!
//! let config = Config {
//!     size: 8,
//!     seed: Some(1),
//!     ..Config::default()
//! };
//!
//! let outcomes = LocalWorld::run(4, |endpoint| matrix_mul::run(endpoint, &config));
//!
//! match &outcomes[0] {
//!     Ok(Outcome::Coordinator(report)) => assert!(report.matches),
//!     other => panic!("unexpected coordinator outcome: {:?}", other),
//! }
//! ```

mod assembly;
mod config;
mod dispatch;
mod error;
mod handle;
mod matrix;
pub mod protocol;
mod run;
mod tasks;
mod timing;
mod worker;

pub use assembly::Assembly;
pub use config::{Backend, Config};
pub use dispatch::{BatchPlan, DispatchStats, Dispatcher};
pub use error::Error;
pub use handle::{HandleState, WorkerHandle};
pub use matrix::{Matrix, dot};
pub use run::{Outcome, RunReport, check_world, run, run_coordinator, run_worker};
pub use tasks::{Decomposition, Task};
pub use timing::Stopwatch;
pub use worker::{Worker, WorkerReport, WorkerState};
