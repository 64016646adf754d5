use clap::Parser;
use matrix_mul::{Backend, Config, Error, Outcome};
use rank_transport::LocalWorld;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();

    if let Err(e) = execute(&config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn execute(config: &Config) -> Result<(), Error> {
    config.validate()?;

    match config.transport {
        Backend::Local => {
            let size = config.worker_count() + 1;
            let outcomes = LocalWorld::run(size, |endpoint| matrix_mul::run(endpoint, config));
            for outcome in outcomes {
                report(&outcome?);
            }
            Ok(())
        }
        Backend::Mpi => execute_mpi(config),
    }
}

#[cfg(feature = "mpi-support")]
fn execute_mpi(config: &Config) -> Result<(), Error> {
    let transport = rank_transport::MpiTransport::initialize()?;
    let outcome = matrix_mul::run(transport, config)?;
    report(&outcome);
    Ok(())
}

#[cfg(not(feature = "mpi-support"))]
fn execute_mpi(_config: &Config) -> Result<(), Error> {
    Err(Error::BackendUnavailable("mpi"))
}

fn report(outcome: &Outcome) {
    match outcome {
        Outcome::Coordinator(report) => {
            println!("Matrix size: {}x{}", report.size, report.size);
            println!("Workers: {}", report.workers);
            println!("Batches: {}", report.batches);
            println!("Matrix multiplication (1 process) took: {}ms", report.sequential.as_millis());
            println!(
                "Matrix multiplication ({} workers) took: {}ms",
                report.workers,
                report.parallel.as_millis()
            );
            println!("Parallel == Sequential: {}", report.matches);
            println!("Speedup: {:.3}", report.speedup);
        }
        Outcome::Worker(report) => {
            println!("Process {} was utilised {} times", report.info, report.utilization);
        }
    }
}
