use matrix_mul::protocol::{CONTROL_TAG, DATA_TAG, Signal};
use matrix_mul::{
    Assembly, Config, Decomposition, DispatchStats, Dispatcher, Error, Matrix, Outcome, Worker,
    WorkerReport,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rank_transport::{LocalEndpoint, LocalWorld, Source, Transport};

enum Side {
    Coordinator(Matrix, DispatchStats),
    Worker(WorkerReport),
}

fn coordinate(endpoint: &mut LocalEndpoint, a: &Matrix, b: &Matrix) -> Result<Side, Error> {
    let work = Decomposition::new(a, b)?;
    let (rows, cols) = work.result_shape();
    let mut assembly = Assembly::new(rows, cols);

    let mut dispatcher = Dispatcher::new(endpoint)?;
    let stats = dispatcher.dispatch(&work, &mut assembly)?;
    dispatcher.terminate()?;

    Ok(Side::Coordinator(assembly.finish()?, stats))
}

/// Multiplies on a local world with `workers` worker ranks.
fn multiply_on_pool(a: &Matrix, b: &Matrix, workers: usize) -> (Matrix, DispatchStats, Vec<usize>) {
    let sides = LocalWorld::run(workers + 1, |mut endpoint| {
        if endpoint.info().is_root() {
            coordinate(&mut endpoint, a, b)
        } else {
            Worker::new(endpoint).run().map(Side::Worker)
        }
    });

    let mut product = None;
    let mut utilization = Vec::new();
    for side in sides {
        match side.unwrap() {
            Side::Coordinator(m, stats) => product = Some((m, stats)),
            Side::Worker(report) => utilization.push(report.utilization),
        }
    }

    let (m, stats) = product.unwrap();
    (m, stats, utilization)
}

#[test]
fn test_all_ones_single_worker() {
    let ones = Matrix::filled(4, 4, 1.0);
    let (product, stats, utilization) = multiply_on_pool(&ones, &ones, 1);

    assert_eq!(product, Matrix::filled(4, 4, 4.0));
    assert_eq!(stats.batches, 16);
    assert_eq!(stats.last_batch, 1);
    assert_eq!(utilization, vec![16]);
}

#[test]
fn test_all_ones_three_workers() {
    let ones = Matrix::filled(4, 4, 1.0);
    let (product, stats, utilization) = multiply_on_pool(&ones, &ones, 3);

    assert_eq!(product, Matrix::filled(4, 4, 4.0));
    assert_eq!(stats.batches, 6);
    assert_eq!(stats.last_batch, 1);
    assert_eq!(stats.per_worker, vec![6, 5, 5]);
    assert_eq!(utilization, vec![6, 5, 5]);
}

#[test]
fn test_pool_larger_than_task_count() {
    let a = Matrix::from_fn(2, 2, |i, j| (i + 2 * j) as f64);
    let b = Matrix::from_fn(2, 2, |i, j| (3 * i + j + 1) as f64);
    let (product, stats, utilization) = multiply_on_pool(&a, &b, 8);

    assert_eq!(product, Matrix::multiply(&a, &b).unwrap());
    assert_eq!(stats.batches, 1);
    assert_eq!(stats.last_batch, 4);
    assert_eq!(stats.per_worker, vec![1, 1, 1, 1, 0, 0, 0, 0]);
    assert_eq!(utilization, vec![1, 1, 1, 1, 0, 0, 0, 0]);
}

#[test]
fn test_random_product_matches_reference() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut a = Matrix::new(7, 5);
    let mut b = Matrix::new(5, 6);
    a.fill_random(&mut rng, 0.0..5.0);
    b.fill_random(&mut rng, 0.0..5.0);

    for workers in [1, 2, 4, 5] {
        let (product, stats, utilization) = multiply_on_pool(&a, &b, workers);
        assert_eq!(product, Matrix::multiply(&a, &b).unwrap());
        assert_eq!(stats.tasks, 42);
        assert_eq!(stats.batches, 42usize.div_ceil(workers));
        assert_eq!(utilization.iter().sum::<usize>(), 42);
    }
}

#[test]
fn test_worker_services_back_to_back_requests() {
    let mut world = LocalWorld::new(2);
    let mut worker = Worker::new(world.pop().unwrap());
    let mut coordinator = world.pop().unwrap();

    coordinator.send_signal(Signal::BeginWork.into(), 1, CONTROL_TAG).unwrap();
    coordinator.send_values(&[1.0, 2.0], 1, DATA_TAG).unwrap();
    coordinator.send_values(&[3.0, 4.0], 1, DATA_TAG).unwrap();
    coordinator.send_signal(Signal::BeginWork.into(), 1, CONTROL_TAG).unwrap();
    coordinator.send_values(&[0.5, 0.5, 0.5], 1, DATA_TAG).unwrap();
    coordinator.send_values(&[2.0, 4.0, 6.0], 1, DATA_TAG).unwrap();
    coordinator.send_signal(Signal::Terminate.into(), 1, CONTROL_TAG).unwrap();

    let report = worker.run().unwrap();
    assert_eq!(report.utilization, 2);

    assert_eq!(coordinator.recv_scalar(Source::Rank(1), DATA_TAG).unwrap(), 11.0);
    assert_eq!(coordinator.recv_scalar(Source::Rank(1), DATA_TAG).unwrap(), 6.0);
}

#[test]
fn test_worker_stops_receiving_after_terminate() {
    let mut world = LocalWorld::new(2);
    let mut worker = Worker::new(world.pop().unwrap());
    let coordinator = world.pop().unwrap();

    coordinator.send_signal(Signal::NoSignal.into(), 1, CONTROL_TAG).unwrap();
    coordinator.send_signal(Signal::Terminate.into(), 1, CONTROL_TAG).unwrap();
    coordinator.send_signal(Signal::BeginWork.into(), 1, CONTROL_TAG).unwrap();
    coordinator.send_values(&[1.0], 1, DATA_TAG).unwrap();

    let report = worker.run().unwrap();
    assert_eq!(report.utilization, 0);

    let mut endpoint = worker.into_inner();
    let status = endpoint.probe(Source::Rank(0), CONTROL_TAG).unwrap();
    assert_eq!(status.count, 1);
    assert_eq!(endpoint.recv_signal(Source::Rank(0), CONTROL_TAG).unwrap(), 1);
    assert_eq!(endpoint.recv_values(Source::Rank(0), DATA_TAG).unwrap(), vec![1.0]);
}

#[test]
fn test_end_to_end_run() {
    let config = Config {
        size: 12,
        seed: Some(3),
        ..Config::default()
    };

    let outcomes = LocalWorld::run(4, |endpoint| matrix_mul::run(endpoint, &config));

    let mut served = 0;
    for outcome in outcomes {
        match outcome.unwrap() {
            Outcome::Coordinator(report) => {
                assert!(report.matches);
                assert_eq!(report.workers, 3);
                assert_eq!(report.batches, 48);
            }
            Outcome::Worker(report) => served += report.utilization,
        }
    }
    assert_eq!(served, 144);
}

#[test]
fn test_terminate_reaches_each_worker_once() {
    let ones = Matrix::filled(3, 3, 1.0);
    let sides = LocalWorld::run(4, |mut endpoint| -> Result<Option<LocalEndpoint>, Error> {
        if endpoint.info().is_root() {
            coordinate(&mut endpoint, &ones, &ones)?;
            Ok(None)
        } else {
            let mut worker = Worker::new(endpoint);
            worker.run()?;
            Ok(Some(worker.into_inner()))
        }
    });

    // Every rank has joined, so anything the coordinator sent is delivered.
    let mut workers = 0;
    for side in sides {
        if let Some(mut endpoint) = side.unwrap() {
            assert_eq!(endpoint.pending(), 0);
            workers += 1;
        }
    }
    assert_eq!(workers, 3);
}

#[test]
fn test_invalid_config_is_an_error_on_every_rank() {
    let configs = [
        Config {
            min: 3.0,
            max: 3.0,
            real: true,
            ..Config::default()
        },
        Config {
            max: f64::NAN,
            ..Config::default()
        },
        Config {
            size: 0,
            ..Config::default()
        },
    ];

    for config in &configs {
        let outcomes = LocalWorld::run(3, |endpoint| matrix_mul::run(endpoint, config));
        assert!(outcomes.iter().all(|o| matches!(o, Err(Error::Config(_)))));
    }
}

#[test]
fn test_default_inputs_are_integer_valued() {
    let config = Config {
        size: 6,
        seed: Some(8),
        ..Config::default()
    };
    let mut rng = config.rng();
    let mut a = Matrix::square(6);
    config.fill(&mut a, &mut rng);

    assert!(a.as_slice().iter().all(|v| v.fract() == 0.0 && (0.0..=5.0).contains(v)));
}

#[test]
fn test_single_participant_is_rejected() {
    let outcomes = LocalWorld::run(1, |endpoint| matrix_mul::run(endpoint, &Config::default()));
    assert!(matches!(outcomes[0], Err(Error::InsufficientRanks(1))));
}
