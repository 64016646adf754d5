//! MPI backend: one rank per process.

use ::mpi::datatype::Equivalence;
use ::mpi::environment::Universe;
use ::mpi::point_to_point::{Destination, Source as _};
use ::mpi::topology::{Communicator, SimpleCommunicator};
use tracing::debug;

use crate::{Error, Rank, Source, Status, Tag, Transport, WorldInfo};

/// The MPI world of the current process.
///
/// Holds the MPI environment for as long as it lives: MPI is initialized by
/// [`MpiTransport::initialize`] and finalized when the value is dropped, on
/// every exit path.
pub struct MpiTransport {
    info: WorldInfo,
    world: SimpleCommunicator,
    _universe: Universe,
}

impl MpiTransport {
    /// Initializes MPI. Fails if MPI was already initialized in this process.
    pub fn initialize() -> Result<Self, Error> {
        let universe = ::mpi::initialize().ok_or(Error::MpiInit)?;
        let world = universe.world();
        let processor_name = ::mpi::environment::processor_name()
            .unwrap_or_else(|_| String::from("unknown"));
        let info = WorldInfo::new(world.size() as usize, world.rank() as usize, processor_name);

        debug!(%info, "MPI initialized");

        Ok(Self {
            info,
            world,
            _universe: universe,
        })
    }

    fn check(&self, rank: Rank) -> Result<i32, Error> {
        if rank >= self.info.size {
            return Err(Error::InvalidRank(rank, self.info.size));
        }
        Ok(rank as i32)
    }
}

impl Transport for MpiTransport {
    fn info(&self) -> &WorldInfo {
        &self.info
    }

    fn send_signal(&self, signal: i32, dest: Rank, tag: Tag) -> Result<(), Error> {
        let dest = self.check(dest)?;
        self.world.process_at_rank(dest).send_with_tag(&signal, tag);
        Ok(())
    }

    fn send_scalar(&self, value: f64, dest: Rank, tag: Tag) -> Result<(), Error> {
        let dest = self.check(dest)?;
        self.world.process_at_rank(dest).send_with_tag(&value, tag);
        Ok(())
    }

    fn send_values(&self, values: &[f64], dest: Rank, tag: Tag) -> Result<(), Error> {
        let dest = self.check(dest)?;
        self.world.process_at_rank(dest).send_with_tag(values, tag);
        Ok(())
    }

    fn recv_signal(&mut self, source: Source, tag: Tag) -> Result<i32, Error> {
        let (signal, _) = match source {
            Source::Any => self.world.any_process().receive_with_tag::<i32>(tag),
            Source::Rank(rank) => {
                let rank = self.check(rank)?;
                self.world.process_at_rank(rank).receive_with_tag::<i32>(tag)
            }
        };
        Ok(signal)
    }

    fn recv_scalar(&mut self, source: Source, tag: Tag) -> Result<f64, Error> {
        let (value, _) = match source {
            Source::Any => self.world.any_process().receive_with_tag::<f64>(tag),
            Source::Rank(rank) => {
                let rank = self.check(rank)?;
                self.world.process_at_rank(rank).receive_with_tag::<f64>(tag)
            }
        };
        Ok(value)
    }

    fn probe(&mut self, source: Source, tag: Tag) -> Result<Status, Error> {
        let status = match source {
            Source::Any => self.world.any_process().probe_with_tag(tag),
            Source::Rank(rank) => {
                let rank = self.check(rank)?;
                self.world.process_at_rank(rank).probe_with_tag(tag)
            }
        };

        // Control messages are i32 and do not divide into whole f64s.
        let count = match status.count(f64::equivalent_datatype()) {
            n if n >= 0 => n,
            _ => status.count(i32::equivalent_datatype()),
        };

        Ok(Status {
            source: status.source_rank() as Rank,
            tag: status.tag(),
            count: usize::try_from(count).unwrap_or(0),
        })
    }

    fn recv_values_exact(
        &mut self,
        source: Source,
        tag: Tag,
        count: usize,
    ) -> Result<Vec<f64>, Error> {
        let mut values = vec![0.0; count];
        let status = match source {
            Source::Any => self
                .world
                .any_process()
                .receive_into_with_tag(&mut values[..], tag),
            Source::Rank(rank) => {
                let rank = self.check(rank)?;
                self.world
                    .process_at_rank(rank)
                    .receive_into_with_tag(&mut values[..], tag)
            }
        };

        let found = status.count(f64::equivalent_datatype()) as usize;
        if found != count {
            return Err(Error::CountMismatch {
                expected: count,
                found,
            });
        }
        Ok(values)
    }
}
