//! Command-line and environment configuration.

use std::ops::{Range, RangeInclusive};
use std::thread;

use clap::{Parser, ValueEnum};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::{Error, Matrix};

/// Which transport carries the messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// Every rank is a thread of this process.
    Local,
    /// Every rank is an MPI process (launch with `mpirun`).
    Mpi,
}

#[derive(Debug, Clone, Parser)]
#[command(
    name = "matrix-mul",
    version,
    about = "Multiplies two random N×N matrices on a pool of workers and compares against a single process"
)]
pub struct Config {
    /// Matrix dimension N.
    #[arg(short = 'n', long, env = "MATMUL_SIZE", default_value_t = 200)]
    pub size: usize,

    /// Worker ranks to start with the local backend (defaults to the
    /// available parallelism). Ignored by MPI, where `mpirun -n` decides.
    #[arg(short, long, env = "MATMUL_WORKERS")]
    pub workers: Option<usize>,

    /// Lower bound of the random element values.
    #[arg(long, env = "MATMUL_MIN", default_value_t = 0.0, allow_negative_numbers = true)]
    pub min: f64,

    /// Upper bound of the random element values: inclusive for integers,
    /// exclusive with `--real`.
    #[arg(long, env = "MATMUL_MAX", default_value_t = 5.0, allow_negative_numbers = true)]
    pub max: f64,

    /// Draw real values in `min..max` instead of integers in `min..=max`.
    #[arg(long, env = "MATMUL_REAL")]
    pub real: bool,

    /// Seed for reproducible matrices.
    #[arg(long, env = "MATMUL_SEED")]
    pub seed: Option<u64>,

    #[arg(long, value_enum, env = "MATMUL_TRANSPORT", default_value_t = Backend::Local)]
    pub transport: Backend,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size: 200,
            workers: None,
            min: 0.0,
            max: 5.0,
            real: false,
            seed: None,
            transport: Backend::Local,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), Error> {
        if self.size == 0 {
            return Err(Error::Config("matrix size must be at least 1".to_string()));
        }
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(Error::Config(format!(
                "value range {}..{} is not finite",
                self.min, self.max
            )));
        }
        if self.real && self.min >= self.max {
            return Err(Error::Config(format!(
                "value range {}..{} is empty",
                self.min, self.max
            )));
        }
        if !self.real {
            let range = self.integer_range();
            if range.is_empty() {
                return Err(Error::Config(format!(
                    "integer range {}..={} is empty",
                    range.start(),
                    range.end()
                )));
            }
        }
        Ok(())
    }

    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    pub fn value_range(&self) -> Range<f64> {
        self.min..self.max
    }

    /// Integer bounds, both inclusive. Bounds outside `i32` saturate.
    pub fn integer_range(&self) -> RangeInclusive<i32> {
        self.min.ceil() as i32..=self.max.floor() as i32
    }

    /// Fills `matrix` with random input values as configured.
    pub fn fill(&self, matrix: &mut Matrix, rng: &mut StdRng) {
        if self.real {
            matrix.fill_random(rng, self.value_range());
        } else {
            matrix.fill_random_integers(rng, self.integer_range());
        }
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
