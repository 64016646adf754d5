//! In-process backend: one endpoint per rank, ranks run as threads.

use std::collections::VecDeque;
use std::panic;
use std::thread;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::trace;

use crate::message::{Envelope, Payload};
use crate::{Error, Rank, Source, Status, Tag, Transport, WorldInfo};

/// Builds a fully connected world of [`LocalEndpoint`]s.
pub struct LocalWorld;

impl LocalWorld {
    /// Creates one endpoint per rank, in rank order.
    pub fn new(size: usize) -> Vec<LocalEndpoint> {
        let (senders, inboxes): (Vec<_>, Vec<_>) =
            (0..size).map(|_| mpsc::unbounded_channel()).unzip();

        inboxes
            .into_iter()
            .enumerate()
            .map(|(rank, inbox)| {
                // No sender to ourselves: once every peer is gone the inbox
                // closes instead of blocking forever.
                let peers = senders
                    .iter()
                    .enumerate()
                    .map(|(peer, tx)| (peer != rank).then(|| tx.clone()))
                    .collect();

                LocalEndpoint {
                    info: WorldInfo::new(size, rank, format!("local-{}", rank)),
                    peers,
                    inbox,
                    pending: VecDeque::new(),
                }
            })
            .collect()
    }

    /// Runs `f` once per rank, each on its own thread, and returns the
    /// results in rank order. A panic on any rank is resumed on the caller.
    pub fn run<F, R>(size: usize, f: F) -> Vec<R>
    where
        F: Fn(LocalEndpoint) -> R + Sync,
        R: Send,
    {
        let endpoints = Self::new(size);
        let f = &f;

        thread::scope(|scope| {
            let handles: Vec<_> = endpoints
                .into_iter()
                .map(|endpoint| scope.spawn(move || f(endpoint)))
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or_else(|cause| panic::resume_unwind(cause)))
                .collect()
        })
    }
}

/// One rank of a [`LocalWorld`].
pub struct LocalEndpoint {
    info: WorldInfo,
    peers: Vec<Option<UnboundedSender<Envelope>>>,
    inbox: UnboundedReceiver<Envelope>,
    pending: VecDeque<Envelope>,
}

impl LocalEndpoint {
    fn post(&self, payload: Payload, dest: Rank, tag: Tag) -> Result<(), Error> {
        let peer = self
            .peers
            .get(dest)
            .ok_or(Error::InvalidRank(dest, self.info.size))?
            .as_ref()
            .ok_or(Error::SelfSend(dest))?;

        trace!(from = self.info.rank, to = dest, tag, kind = payload.kind(), "send");

        peer.send(Envelope {
            source: self.info.rank,
            tag,
            payload,
        })
        .map_err(|_| Error::Disconnected(dest))
    }

    /// Blocks until a matching message sits in `pending` and returns its
    /// position. Non-matching arrivals are queued behind it in arrival order.
    fn wait_for(&mut self, source: Source, tag: Tag) -> Result<usize, Error> {
        if let Source::Rank(rank) = source {
            if rank >= self.info.size {
                return Err(Error::InvalidRank(rank, self.info.size));
            }
        }

        if let Some(pos) = self.pending.iter().position(|e| e.matches(source, tag)) {
            return Ok(pos);
        }

        loop {
            let envelope = self
                .inbox
                .blocking_recv()
                .ok_or(Error::Closed(self.info.rank))?;
            let matched = envelope.matches(source, tag);
            self.pending.push_back(envelope);
            if matched {
                return Ok(self.pending.len() - 1);
            }
        }
    }

    fn take(&mut self, source: Source, tag: Tag) -> Result<Envelope, Error> {
        let pos = self.wait_for(source, tag)?;
        let envelope = self
            .pending
            .remove(pos)
            .ok_or(Error::Closed(self.info.rank))?;

        trace!(
            at = self.info.rank,
            from = envelope.source,
            tag,
            kind = envelope.payload.kind(),
            "recv"
        );
        Ok(envelope)
    }

    /// Number of messages delivered to this rank and not yet consumed.
    /// Never blocks.
    pub fn pending(&mut self) -> usize {
        while let Ok(envelope) = self.inbox.try_recv() {
            self.pending.push_back(envelope);
        }
        self.pending.len()
    }
}

impl Transport for LocalEndpoint {
    fn info(&self) -> &WorldInfo {
        &self.info
    }

    fn send_signal(&self, signal: i32, dest: Rank, tag: Tag) -> Result<(), Error> {
        self.post(Payload::Signal(signal), dest, tag)
    }

    fn send_scalar(&self, value: f64, dest: Rank, tag: Tag) -> Result<(), Error> {
        self.post(Payload::Scalar(value), dest, tag)
    }

    fn send_values(&self, values: &[f64], dest: Rank, tag: Tag) -> Result<(), Error> {
        self.post(Payload::Values(values.to_vec()), dest, tag)
    }

    fn recv_signal(&mut self, source: Source, tag: Tag) -> Result<i32, Error> {
        match self.take(source, tag)?.payload {
            Payload::Signal(signal) => Ok(signal),
            other => Err(Error::PayloadMismatch {
                expected: "signal",
                found: other.kind(),
            }),
        }
    }

    fn recv_scalar(&mut self, source: Source, tag: Tag) -> Result<f64, Error> {
        match self.take(source, tag)?.payload {
            Payload::Scalar(value) => Ok(value),
            other => Err(Error::PayloadMismatch {
                expected: "scalar",
                found: other.kind(),
            }),
        }
    }

    fn probe(&mut self, source: Source, tag: Tag) -> Result<Status, Error> {
        let pos = self.wait_for(source, tag)?;
        Ok(self.pending[pos].status())
    }

    fn recv_values_exact(
        &mut self,
        source: Source,
        tag: Tag,
        count: usize,
    ) -> Result<Vec<f64>, Error> {
        match self.take(source, tag)?.payload {
            Payload::Values(values) if values.len() == count => Ok(values),
            Payload::Values(values) => Err(Error::CountMismatch {
                expected: count,
                found: values.len(),
            }),
            other => Err(Error::PayloadMismatch {
                expected: "values",
                found: other.kind(),
            }),
        }
    }
}
