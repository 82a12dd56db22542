//! Then steps for synchronous broker BDD scenarios.

use super::world::BrokerWorld;
use eyre::WrapErr;
use rstest_bdd_macros::then;
use syncport::broker::{
    domain::{BindingState, CapabilityKind, ContextState, TeardownStep},
    services::{Binding, BrokerError},
};

#[then("the value read is {expected}")]
fn value_read_is(world: &BrokerWorld, expected: f64) -> Result<(), eyre::Report> {
    if let Some(Err(err)) = &world.last_write {
        return Err(eyre::eyre!("preceding write failed: {err}"));
    }
    let completed = world
        .last_read
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing read result"))?
        .as_ref()
        .map_err(|err| eyre::eyre!("read failed: {err}"))?;

    if completed.value().to_bits() != expected.to_bits() {
        return Err(eyre::eyre!(
            "expected {expected}, read {}",
            completed.value()
        ));
    }
    Ok(())
}

#[then("no bindings remain on the scheduler")]
fn no_bindings_remain(world: &BrokerWorld) -> Result<(), eyre::Report> {
    let outstanding = world
        .scheduler
        .outstanding_bindings()
        .wrap_err("count outstanding bindings")?;
    if outstanding != 0 {
        return Err(eyre::eyre!("expected no bindings, found {outstanding}"));
    }
    Ok(())
}

#[then("the operation fails with an acquisition timeout")]
fn acquisition_timed_out(world: &BrokerWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_write
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing write result"))?;
    if !matches!(result, Err(BrokerError::AcquisitionTimeout { .. })) {
        return Err(eyre::eyre!("expected AcquisitionTimeout, got {result:?}"));
    }
    Ok(())
}

#[then("the device saw no transfers")]
fn no_transfers(world: &BrokerWorld) -> Result<(), eyre::Report> {
    let count = world
        .device
        .transfer_count()
        .wrap_err("count device transfers")?;
    if count != 0 {
        return Err(eyre::eyre!("expected no transfers, found {count}"));
    }
    Ok(())
}

#[then(r#"the connect fails because the "{kind_name}" capability is missing"#)]
fn connect_failed_missing_capability(
    world: &BrokerWorld,
    kind_name: String,
) -> Result<(), eyre::Report> {
    let expected = CapabilityKind::try_from(kind_name.as_str())
        .map_err(|err| eyre::eyre!("invalid capability kind in scenario: {err}"))?;
    match &world.connect_error {
        Some(BrokerError::CapabilityMissing { kind, .. }) if *kind == expected => Ok(()),
        other => Err(eyre::eyre!(
            "expected CapabilityMissing for {expected}, got {other:?}"
        )),
    }
}

#[then(r#"the binding's context state is "{state_name}""#)]
fn context_state_is(world: &BrokerWorld, state_name: String) -> Result<(), eyre::Report> {
    let binding = world
        .binding
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing binding in scenario world"))?;
    let actual = binding.context_state();
    if actual.as_str() != state_name {
        return Err(eyre::eyre!(
            "expected context state {state_name}, found {actual}"
        ));
    }
    if actual == ContextState::Unsupported && binding.driver_context().is_some() {
        return Err(eyre::eyre!("unsupported binding carries a driver context"));
    }
    Ok(())
}

#[then("the binding has no diagnostics")]
fn binding_has_no_diagnostics(world: &BrokerWorld) -> Result<(), eyre::Report> {
    let binding = world
        .binding
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing binding in scenario world"))?;
    if !binding.diagnostics().is_empty() {
        return Err(eyre::eyre!(
            "expected no diagnostics, found {:?}",
            binding.diagnostics()
        ));
    }
    Ok(())
}

#[then("the disconnect fails because the binding is not established")]
fn disconnect_rejected(world: &BrokerWorld) -> Result<(), eyre::Report> {
    match world.disconnect_results.as_slice() {
        [Ok(()), Err(BrokerError::BindingNotEstablished { state, .. })]
            if *state == BindingState::Released =>
        {
            Ok(())
        }
        other => Err(eyre::eyre!(
            "expected a successful disconnect then a rejection, got {other:?}"
        )),
    }
}

#[then(r#"the disconnect reports a teardown failure at "{step_name}""#)]
fn teardown_failed_at(world: &BrokerWorld, step_name: String) -> Result<(), eyre::Report> {
    let expected = match step_name.as_str() {
        "detach_driver_context" => TeardownStep::DetachDriverContext,
        "unbind_address" => TeardownStep::UnbindAddress,
        other => return Err(eyre::eyre!("unknown teardown step in scenario: {other}")),
    };
    match world.disconnect_results.last() {
        Some(Err(BrokerError::TeardownPartialFailure { step, .. })) if *step == expected => {}
        other => {
            return Err(eyre::eyre!(
                "expected TeardownPartialFailure at {expected}, got {other:?}"
            ));
        }
    }

    let state = world
        .binding
        .as_ref()
        .map(Binding::state)
        .ok_or_else(|| eyre::eyre!("missing binding in scenario world"))?;
    if state != BindingState::Released {
        return Err(eyre::eyre!("binding still {state} after teardown"));
    }
    Ok(())
}
