//! Round-trip tests against the echo device.

use super::helpers::{PORT, Rig, rig, seconds};
use rstest::rstest;
use syncport::broker::{
    domain::{BindingState, ContextState},
    services::{ConnectionManager, OneShot, SyncExecutor},
};

type TestResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[rstest]
fn one_shot_write_then_read_returns_written_value(
    rig: Result<Rig, Box<dyn std::error::Error + Send + Sync>>,
) -> TestResult {
    let rig = rig?;
    let one_shot = OneShot::new(rig.context());
    let value: f64 = "3.14".parse()?;

    one_shot.write_once(PORT, 3, value, seconds(2.0), None)?;
    let read = one_shot.read_once::<f64>(PORT, 3, seconds(2.0), None)?;

    assert_eq!(read.value().to_bits(), value.to_bits());
    assert!(read.is_clean());
    assert_eq!(rig.scheduler.outstanding_bindings()?, 0);
    Ok(())
}

#[rstest]
fn long_lived_binding_serves_many_operations(
    rig: Result<Rig, Box<dyn std::error::Error + Send + Sync>>,
) -> TestResult {
    let rig = rig?;
    let context = rig.context();
    let executor = SyncExecutor::new(&context);
    let connections = ConnectionManager::new(context);
    let mut binding = connections.connect::<i32>(PORT, 7, Some("OFFSET"))?;
    assert_eq!(binding.context_state(), ContextState::Attached);

    for value in [1, 2, 3] {
        executor.write(&mut binding, value, seconds(0.5))?;
        let read = executor.read(&mut binding, seconds(0.5))?;
        assert_eq!(read.into_value(), value);
    }

    connections.disconnect(&mut binding)?;
    assert_eq!(binding.state(), BindingState::Released);
    assert_eq!(rig.device.transfer_count()?, 6);
    assert_eq!(rig.device.live_contexts()?, 0);
    Ok(())
}

#[rstest]
fn value_families_do_not_share_storage(
    rig: Result<Rig, Box<dyn std::error::Error + Send + Sync>>,
) -> TestResult {
    let rig = rig?;
    let one_shot = OneShot::new(rig.context());

    one_shot.write_once(PORT, 0, 11_i32, seconds(1.0), None)?;
    let as_float = one_shot.read_once::<f64>(PORT, 0, seconds(1.0), None)?;
    let as_int = one_shot.read_once::<i32>(PORT, 0, seconds(1.0), None)?;

    assert_eq!(as_float.value().to_bits(), 0.0_f64.to_bits());
    assert_eq!(as_int.into_value(), 11);
    Ok(())
}
