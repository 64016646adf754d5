//! Role selection and the coordinator's end-to-end run.

use std::time::Duration;

use rank_transport::{Transport, WorldInfo};
use tracing::{info, warn};

use crate::config::Config;
use crate::protocol::COORDINATOR;
use crate::timing::Stopwatch;
use crate::worker::{Worker, WorkerReport};
use crate::{Assembly, Decomposition, Dispatcher, Error, Matrix};

/// Timings and verdict of one coordinator run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub size: usize,
    pub workers: usize,
    pub batches: usize,
    pub sequential: Duration,
    pub parallel: Duration,
    /// Sequential time over parallel time.
    pub speedup: f64,
    /// Whether the distributed product equals the sequential one.
    pub matches: bool,
}

/// What a rank produced, depending on its role.
#[derive(Debug, Clone)]
pub enum Outcome {
    Coordinator(RunReport),
    Worker(WorkerReport),
}

/// Rejects worlds too small to hold a coordinator and a worker.
pub fn check_world(info: &WorldInfo) -> Result<(), Error> {
    if info.size < 2 {
        return Err(Error::InsufficientRanks(info.size));
    }
    Ok(())
}

/// Runs this rank's role: the coordinator on rank 0, a worker elsewhere.
///
/// The configuration is checked on every rank before any message moves, so
/// a bad configuration fails the whole world instead of stranding workers.
pub fn run<T: Transport>(mut transport: T, config: &Config) -> Result<Outcome, Error> {
    check_world(transport.info())?;
    config.validate()?;

    if transport.rank() == COORDINATOR {
        run_coordinator(&mut transport, config).map(Outcome::Coordinator)
    } else {
        run_worker(transport).map(Outcome::Worker)
    }
}

pub fn run_worker<T: Transport>(transport: T) -> Result<WorkerReport, Error> {
    Worker::new(transport).run()
}

/// Multiplies two random matrices both sequentially and on the worker pool,
/// then shuts the workers down.
pub fn run_coordinator<T: Transport>(transport: &mut T, config: &Config) -> Result<RunReport, Error> {
    check_world(transport.info())?;
    config.validate()?;

    let n = config.size;
    let mut clock = Stopwatch::start();
    let mut rng = config.rng();

    let mut a = Matrix::square(n);
    let mut b = Matrix::square(n);
    config.fill(&mut a, &mut rng);
    config.fill(&mut b, &mut rng);
    clock.lap("Initializing took");

    let reference = Matrix::multiply(&a, &b)?;
    let sequential = clock.lap("Matrix multiplication (1 process) took");

    let work = Decomposition::new(&a, &b)?;
    a.release();
    b.release();

    let mut dispatcher = Dispatcher::new(transport)?;
    let workers = dispatcher.pool_size();
    clock.lap("Work decomposition took");

    let (rows, cols) = work.result_shape();
    let mut assembly = Assembly::new(rows, cols);
    let stats = dispatcher.dispatch(&work, &mut assembly)?;
    let result = assembly.finish()?;
    let parallel = clock.lap(&format!("Matrix multiplication ({} workers) took", workers));

    let matches = result == reference;
    if matches {
        info!("parallel product matches the sequential product");
    } else {
        warn!("parallel product differs from the sequential product");
    }
    clock.lap("Matrix comparison took");

    dispatcher.terminate()?;

    let speedup = sequential.as_secs_f64() / parallel.as_secs_f64().max(f64::MIN_POSITIVE);
    info!(speedup, "done");

    Ok(RunReport {
        size: n,
        workers,
        batches: stats.batches,
        sequential,
        parallel,
        speedup,
        matches,
    })
}
