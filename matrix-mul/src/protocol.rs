//! Wire protocol between the coordinator and its workers.
//!
//! Two logical channels share the transport, told apart by tag:
//!
//! | Channel   | Direction            | Payload                          |
//! |-----------|----------------------|----------------------------------|
//! | `CONTROL` | coordinator → worker | one [`Signal`] as `i32`          |
//! | `DATA`    | coordinator → worker | row vector, then column vector   |
//! | `DATA`    | worker → coordinator | one `f64` dot product            |
//!
//! Vector lengths are not fixed, so a receiver probes each data message
//! before receiving it.

use rank_transport::{Rank, Tag};

use crate::Error;

pub const DATA_TAG: Tag = 0;
pub const CONTROL_TAG: Tag = 1;

/// Rank that decomposes, dispatches and assembles.
pub const COORDINATOR: Rank = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Keep waiting. Never sent by the coordinator.
    NoSignal = 0,
    BeginWork = 1,
    Terminate = 2,
}

impl From<Signal> for i32 {
    fn from(signal: Signal) -> i32 {
        signal as i32
    }
}

impl TryFrom<i32> for Signal {
    type Error = Error;

    fn try_from(raw: i32) -> Result<Self, Error> {
        match raw {
            0 => Ok(Signal::NoSignal),
            1 => Ok(Signal::BeginWork),
            2 => Ok(Signal::Terminate),
            other => Err(Error::UnknownSignal(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_wire_values() {
        for signal in [Signal::NoSignal, Signal::BeginWork, Signal::Terminate] {
            assert_eq!(Signal::try_from(i32::from(signal)).unwrap(), signal);
        }
        assert!(matches!(Signal::try_from(3), Err(Error::UnknownSignal(3))));
    }

    #[test]
    fn test_channels_are_distinct() {
        assert_ne!(DATA_TAG, CONTROL_TAG);
    }
}
