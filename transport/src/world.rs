//! The transport contract shared by every backend.

use std::fmt;

use crate::{Error, Rank, Source, Status, Tag};

/// Size and identity of one participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldInfo {
    pub size: usize,
    pub rank: Rank,
    pub processor_name: String,
}

impl WorldInfo {
    pub fn new(size: usize, rank: Rank, processor_name: impl Into<String>) -> Self {
        Self {
            size,
            rank,
            processor_name: processor_name.into(),
        }
    }

    /// The rank after this one, wrapping around.
    pub fn next_addr(&self) -> Rank {
        (self.rank + 1) % self.size
    }

    /// The rank before this one, wrapping around.
    pub fn prev_addr(&self) -> Rank {
        (self.rank + self.size - 1) % self.size
    }

    pub fn is_root(&self) -> bool {
        self.rank == 0
    }
}

impl fmt::Display for WorldInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}(rank={} of size={})",
            self.processor_name, self.rank, self.size
        )
    }
}

/// Reliable, ordered, blocking point-to-point messaging.
///
/// Control traffic is a single `i32`, results are a single `f64`, and data
/// vectors are `f64` slices whose length travels with the message. Receives
/// take `&mut self` because a backend may have to buffer messages that do
/// not match the receive in progress.
pub trait Transport {
    fn info(&self) -> &WorldInfo;

    fn send_signal(&self, signal: i32, dest: Rank, tag: Tag) -> Result<(), Error>;

    fn send_scalar(&self, value: f64, dest: Rank, tag: Tag) -> Result<(), Error>;

    fn send_values(&self, values: &[f64], dest: Rank, tag: Tag) -> Result<(), Error>;

    fn recv_signal(&mut self, source: Source, tag: Tag) -> Result<i32, Error>;

    fn recv_scalar(&mut self, source: Source, tag: Tag) -> Result<f64, Error>;

    /// Blocks until a matching message is available, without consuming it.
    fn probe(&mut self, source: Source, tag: Tag) -> Result<Status, Error>;

    /// Receives a vector whose length is already known to be `count`.
    fn recv_values_exact(
        &mut self,
        source: Source,
        tag: Tag,
        count: usize,
    ) -> Result<Vec<f64>, Error>;

    /// Receives a vector of unknown length: probe for the length first, then
    /// receive exactly that message.
    fn recv_values(&mut self, source: Source, tag: Tag) -> Result<Vec<f64>, Error> {
        let status = self.probe(source, tag)?;
        self.recv_values_exact(Source::Rank(status.source), tag, status.count)
    }

    fn rank(&self) -> Rank {
        self.info().rank
    }

    fn size(&self) -> usize {
        self.info().size
    }

    /// Sends `signal` to every other rank, starting after this one and
    /// wrapping around.
    fn send_all_signal(&self, signal: i32, tag: Tag) -> Result<(), Error> {
        let info = self.info();
        let mut dest = info.next_addr();
        while dest != info.rank {
            self.send_signal(signal, dest, tag)?;
            dest = (dest + 1) % info.size;
        }
        Ok(())
    }
}
