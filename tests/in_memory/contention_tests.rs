//! Tests for several clients sharing one port from different threads.

use std::thread;
use std::time::{Duration, Instant};

use super::helpers::{PORT, Rig, rig, seconds};
use rstest::rstest;
use syncport::broker::{
    domain::{BindingTarget, PortName},
    services::{BrokerError, ConnectionManager, OneShot, SyncExecutor},
};

type TestResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[rstest]
fn concurrent_one_shots_on_distinct_addresses_all_succeed(
    rig: Result<Rig, Box<dyn std::error::Error + Send + Sync>>,
) -> TestResult {
    let rig = rig?;
    let one_shot = OneShot::new(rig.context());

    thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|address| {
                let facade = &one_shot;
                scope.spawn(move || {
                    facade.write_once(PORT, address, address * 10, seconds(2.0), None)
                })
            })
            .collect();
        for handle in handles {
            let outcome = handle.join().expect("writer thread should not panic");
            assert!(outcome.is_ok(), "write failed: {outcome:?}");
        }
    });

    for address in 0..8 {
        let read = one_shot.read_once::<i32>(PORT, address, seconds(1.0), None)?;
        assert_eq!(read.into_value(), address * 10);
    }
    assert_eq!(rig.scheduler.outstanding_bindings()?, 0);
    assert_eq!(rig.scheduler.held_locks()?, 0);
    Ok(())
}

#[rstest]
fn clients_on_one_address_are_serialized(
    rig: Result<Rig, Box<dyn std::error::Error + Send + Sync>>,
) -> TestResult {
    let rig = rig?;
    let one_shot = OneShot::new(rig.context());

    thread::scope(|scope| {
        for worker in 0..4 {
            let facade = &one_shot;
            scope.spawn(move || {
                for round in 0..5 {
                    facade
                        .write_once(PORT, 2, worker * 100 + round, seconds(5.0), None)
                        .expect("serialized write should succeed");
                }
            });
        }
    });

    assert_eq!(rig.scheduler.acquire_requests()?, 20);
    assert_eq!(rig.scheduler.release_requests()?, 20);
    assert_eq!(rig.scheduler.held_locks()?, 0);
    Ok(())
}

#[rstest]
fn foreign_holder_bounds_the_wait(
    rig: Result<Rig, Box<dyn std::error::Error + Send + Sync>>,
) -> TestResult {
    let rig = rig?;
    let target = BindingTarget::new(PortName::new(PORT)?, 5);
    rig.scheduler.hold_foreign(target.clone())?;
    let context = rig.context();
    let executor = SyncExecutor::new(&context);
    let connections = ConnectionManager::new(context);
    let mut binding = connections.connect::<f64>(PORT, 5, None)?;
    let timeout = seconds(0.2);

    let started = Instant::now();
    let outcome = executor.read(&mut binding, timeout);
    let elapsed = started.elapsed();

    assert!(matches!(outcome, Err(BrokerError::AcquisitionTimeout { .. })));
    assert!(elapsed >= timeout.as_duration());
    assert!(elapsed < timeout.as_duration() + Duration::from_secs(2));
    assert_eq!(rig.device.transfer_count()?, 0);

    rig.scheduler.release_foreign(&target)?;
    executor.write(&mut binding, 1.25, timeout)?;
    connections.disconnect(&mut binding)?;
    Ok(())
}
