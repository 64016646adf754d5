//! The worker side of the protocol.

use rank_transport::{Rank, Source, Transport, WorldInfo};
use tracing::debug;

use crate::matrix::dot;
use crate::protocol::{CONTROL_TAG, DATA_TAG, Signal};
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    WaitSignal,
    /// `BEGIN_WORK` arrived from the given rank; its operands are next.
    Computing(Rank),
    Terminated,
}

/// What a worker reports when it shuts down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerReport {
    pub info: WorldInfo,
    /// Number of `BEGIN_WORK` cycles serviced.
    pub utilization: usize,
}

/// Services dot-product requests until told to terminate.
///
/// Every call blocks on the transport; a request that never completes
/// blocks the worker with it.
pub struct Worker<T> {
    transport: T,
    state: WorkerState,
    utilization: usize,
}

impl<T: Transport> Worker<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: WorkerState::WaitSignal,
            utilization: 0,
        }
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    pub fn utilization(&self) -> usize {
        self.utilization
    }

    /// Performs one transition. Once terminated this receives nothing.
    pub fn step(&mut self) -> Result<WorkerState, Error> {
        self.state = match self.state {
            WorkerState::WaitSignal => {
                let status = self.transport.probe(Source::Any, CONTROL_TAG)?;
                let raw = self
                    .transport
                    .recv_signal(Source::Rank(status.source), CONTROL_TAG)?;

                match Signal::try_from(raw)? {
                    Signal::NoSignal => WorkerState::WaitSignal,
                    Signal::BeginWork => WorkerState::Computing(status.source),
                    Signal::Terminate => WorkerState::Terminated,
                }
            }
            WorkerState::Computing(requester) => {
                let row = self.transport.recv_values(Source::Rank(requester), DATA_TAG)?;
                let col = self.transport.recv_values(Source::Rank(requester), DATA_TAG)?;
                if row.len() != col.len() {
                    return Err(Error::LengthMismatch(row.len(), col.len()));
                }

                self.transport.send_scalar(dot(&row, &col), requester, DATA_TAG)?;
                self.utilization += 1;
                WorkerState::WaitSignal
            }
            WorkerState::Terminated => WorkerState::Terminated,
        };

        Ok(self.state)
    }

    /// Steps until `TERMINATE`.
    pub fn run(&mut self) -> Result<WorkerReport, Error> {
        debug!(info = %self.transport.info(), "worker waiting for work");

        while self.step()? != WorkerState::Terminated {}

        let report = WorkerReport {
            info: self.transport.info().clone(),
            utilization: self.utilization,
        };
        debug!(utilization = report.utilization, "worker terminated");
        Ok(report)
    }

    pub fn into_inner(self) -> T {
        self.transport
    }
}

#[cfg(test)]
mod tests {
    use rank_transport::LocalWorld;

    use super::*;

    #[test]
    fn test_state_transitions() {
        let mut world = LocalWorld::new(2);
        let mut worker = Worker::new(world.pop().unwrap());
        let mut coordinator = world.pop().unwrap();

        coordinator.send_signal(Signal::NoSignal.into(), 1, CONTROL_TAG).unwrap();
        coordinator.send_signal(Signal::BeginWork.into(), 1, CONTROL_TAG).unwrap();
        coordinator.send_values(&[1.0, 2.0, 3.0], 1, DATA_TAG).unwrap();
        coordinator.send_values(&[4.0, 5.0, 6.0], 1, DATA_TAG).unwrap();
        coordinator.send_signal(Signal::Terminate.into(), 1, CONTROL_TAG).unwrap();

        assert_eq!(worker.step().unwrap(), WorkerState::WaitSignal);
        assert_eq!(worker.step().unwrap(), WorkerState::Computing(0));
        assert_eq!(worker.step().unwrap(), WorkerState::WaitSignal);
        assert_eq!(worker.utilization(), 1);
        assert_eq!(worker.step().unwrap(), WorkerState::Terminated);
        assert_eq!(worker.step().unwrap(), WorkerState::Terminated);

        assert_eq!(coordinator.recv_scalar(Source::Rank(1), DATA_TAG).unwrap(), 32.0);
    }

    #[test]
    fn test_unknown_signal() {
        let mut world = LocalWorld::new(2);
        let mut worker = Worker::new(world.pop().unwrap());
        let coordinator = world.pop().unwrap();

        coordinator.send_signal(17, 1, CONTROL_TAG).unwrap();
        assert!(matches!(worker.step(), Err(Error::UnknownSignal(17))));
    }

    #[test]
    fn test_operand_length_mismatch() {
        let mut world = LocalWorld::new(2);
        let mut worker = Worker::new(world.pop().unwrap());
        let coordinator = world.pop().unwrap();

        coordinator.send_signal(Signal::BeginWork.into(), 1, CONTROL_TAG).unwrap();
        coordinator.send_values(&[1.0, 2.0], 1, DATA_TAG).unwrap();
        coordinator.send_values(&[1.0], 1, DATA_TAG).unwrap();

        worker.step().unwrap();
        assert!(matches!(worker.step(), Err(Error::LengthMismatch(2, 1))));
        assert_eq!(worker.utilization(), 0);
    }
}
