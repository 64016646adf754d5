//! Coordinator-side handle to one worker rank.

use rank_transport::{Rank, Source, Transport};
use tracing::trace;

use crate::protocol::{CONTROL_TAG, DATA_TAG, Signal};
use crate::{Error, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleState {
    Idle,
    /// A request went out and its result has not been collected yet.
    Awaiting(Task),
}

/// Strict request/response pairing with one worker: a handle refuses a new
/// task until the previous result was collected.
#[derive(Debug, Clone)]
pub struct WorkerHandle {
    rank: Rank,
    state: HandleState,
}

impl WorkerHandle {
    pub fn new(rank: Rank) -> Self {
        Self {
            rank,
            state: HandleState::Idle,
        }
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn state(&self) -> HandleState {
        self.state
    }

    /// Issues a task: `BEGIN_WORK`, then the row, then the column.
    /// Does not wait for the result.
    pub fn begin<T: Transport>(
        &mut self,
        transport: &T,
        task: Task,
        row: &[f64],
        col: &[f64],
    ) -> Result<(), Error> {
        if let HandleState::Awaiting(pending) = self.state {
            return Err(Error::HandleBusy {
                rank: self.rank,
                row: pending.row,
                col: pending.col,
            });
        }

        transport.send_signal(Signal::BeginWork.into(), self.rank, CONTROL_TAG)?;
        transport.send_values(row, self.rank, DATA_TAG)?;
        transport.send_values(col, self.rank, DATA_TAG)?;
        trace!(rank = self.rank, row = task.row, col = task.col, "task issued");

        self.state = HandleState::Awaiting(task);
        Ok(())
    }

    /// Blocks until the worker's scalar arrives.
    pub fn await_result<T: Transport>(&mut self, transport: &mut T) -> Result<(Task, f64), Error> {
        let HandleState::Awaiting(task) = self.state else {
            return Err(Error::HandleIdle(self.rank));
        };

        let value = transport.recv_scalar(Source::Rank(self.rank), DATA_TAG)?;
        self.state = HandleState::Idle;
        Ok((task, value))
    }
}
