//! Round-robin dispatch of tasks over a fixed pool of workers.

use std::ops::Range;

use rank_transport::{Rank, Transport};
use tracing::{debug, info};

use crate::protocol::{CONTROL_TAG, Signal};
use crate::{Assembly, Decomposition, Error, WorkerHandle};

/// Batch boundaries for `total` tasks over a pool of `pool` workers.
///
/// Yields consecutive ranges of task indices, each `min(pool, remaining)`
/// long, until every task is covered.
#[derive(Debug, Clone)]
pub struct BatchPlan {
    total: usize,
    pool: usize,
    next_task: usize,
}

impl BatchPlan {
    pub fn new(total: usize, pool: usize) -> Result<Self, Error> {
        if pool == 0 {
            return Err(Error::EmptyPool);
        }
        Ok(Self {
            total,
            pool,
            next_task: 0,
        })
    }

    /// `ceil(total / pool)`.
    pub fn batch_count(&self) -> usize {
        self.total.div_ceil(self.pool)
    }

    /// Size of the final batch, or 0 when there are no tasks.
    pub fn last_batch_size(&self) -> usize {
        match self.total % self.pool {
            0 if self.total == 0 => 0,
            0 => self.pool,
            rest => rest,
        }
    }
}

impl Iterator for BatchPlan {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Range<usize>> {
        if self.next_task >= self.total {
            return None;
        }
        let active = self.pool.min(self.total - self.next_task);
        let batch = self.next_task..self.next_task + active;
        self.next_task += active;
        Some(batch)
    }
}

/// Counters gathered over one [`Dispatcher::dispatch`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub tasks: usize,
    pub batches: usize,
    pub last_batch: usize,
    /// Tasks issued to each handle, in pool order.
    pub per_worker: Vec<usize>,
}

/// Pumps tasks through a pool of [`WorkerHandle`]s in batches.
///
/// Each batch issues up to `pool_size` tasks, one per handle in pool order,
/// before awaiting any result; results are then collected in the same order.
/// A handle never gets a second task before its first result is in.
pub struct Dispatcher<'t, T> {
    transport: &'t mut T,
    handles: Vec<WorkerHandle>,
}

impl<'t, T: Transport> Dispatcher<'t, T> {
    /// One handle per rank from `next_addr()` up to the end of the world.
    pub fn new(transport: &'t mut T) -> Result<Self, Error> {
        let info = transport.info();
        let ranks: Vec<Rank> = (info.next_addr()..info.size)
            .filter(|&rank| rank != info.rank)
            .collect();
        Self::with_workers(transport, ranks)
    }

    pub fn with_workers(
        transport: &'t mut T,
        ranks: impl IntoIterator<Item = Rank>,
    ) -> Result<Self, Error> {
        let handles: Vec<_> = ranks.into_iter().map(WorkerHandle::new).collect();
        if handles.is_empty() {
            return Err(Error::EmptyPool);
        }
        Ok(Self { transport, handles })
    }

    pub fn pool_size(&self) -> usize {
        self.handles.len()
    }

    pub fn handles(&self) -> &[WorkerHandle] {
        &self.handles
    }

    /// Runs every task of `work` and writes each result into `assembly`.
    pub fn dispatch(
        &mut self,
        work: &Decomposition,
        assembly: &mut Assembly,
    ) -> Result<DispatchStats, Error> {
        let tasks = work.tasks();
        let plan = BatchPlan::new(tasks.len(), self.handles.len())?;
        let mut stats = DispatchStats {
            tasks: tasks.len(),
            per_worker: vec![0; self.handles.len()],
            ..DispatchStats::default()
        };

        info!(
            tasks = tasks.len(),
            workers = self.handles.len(),
            batches = plan.batch_count(),
            "dispatching"
        );

        for batch in plan {
            let active = batch.len();

            for (handle, &task) in self.handles.iter_mut().zip(&tasks[batch.clone()]) {
                let (row, col) = work.operands(task);
                handle.begin(&*self.transport, task, row, col)?;
            }

            for (k, handle) in self.handles[..active].iter_mut().enumerate() {
                let (task, value) = handle.await_result(&mut *self.transport)?;
                assembly.write(task, value)?;
                stats.per_worker[k] += 1;
            }

            stats.batches += 1;
            stats.last_batch = active;
            debug!(first = batch.start, active, "batch collected");
        }

        Ok(stats)
    }

    /// Tells every other rank to shut down. Consumes the dispatcher, so this
    /// happens at most once.
    pub fn terminate(self) -> Result<(), Error> {
        info!("broadcasting terminate");
        self.transport
            .send_all_signal(Signal::Terminate.into(), CONTROL_TAG)?;
        Ok(())
    }
}
