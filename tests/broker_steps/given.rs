//! Given steps for synchronous broker BDD scenarios.

use super::world::BrokerWorld;
use eyre::WrapErr;
use rstest_bdd_macros::given;
use syncport::broker::domain::{BindingTarget, CapabilityKind, Descriptor, PortName};

#[given(r#"a port "{port}" with {address_count:i32} addresses served by an echo device"#)]
fn port_with_echo_device(
    world: &mut BrokerWorld,
    port: String,
    address_count: i32,
) -> Result<(), eyre::Report> {
    let port_name = PortName::new(port).wrap_err("port name from scenario")?;
    world
        .scheduler
        .add_port(port_name.clone(), address_count)
        .wrap_err("register port")?;
    world
        .registry
        .register_all(&port_name, world.device.handles());
    world
        .device
        .define_channel(Descriptor::new("GAIN").wrap_err("descriptor")?, 1)
        .wrap_err("define driver channel")?;
    world.port = Some(port_name);
    Ok(())
}

#[given("another client holds address {address:i32}")]
fn foreign_holder(world: &mut BrokerWorld, address: i32) -> Result<(), eyre::Report> {
    let target = BindingTarget::new(world.port()?.clone(), address);
    world
        .scheduler
        .hold_foreign(target)
        .wrap_err("simulate foreign holder")?;
    Ok(())
}

#[given(r#"the port offers no "{kind_name}" capability"#)]
fn capability_withdrawn(world: &mut BrokerWorld, kind_name: String) -> Result<(), eyre::Report> {
    let kind = CapabilityKind::try_from(kind_name.as_str())
        .map_err(|err| eyre::eyre!("invalid capability kind in scenario: {err}"))?;
    if !world.registry.withdraw(world.port()?, kind) {
        return Err(eyre::eyre!("{kind} capability was not registered"));
    }
    Ok(())
}

#[given("a binding to address {address:i32}")]
fn bound_address(world: &mut BrokerWorld, address: i32) -> Result<(), eyre::Report> {
    let binding = world
        .connections()
        .connect::<f64>(world.port()?.as_str(), address, None)
        .wrap_err("connect in scenario setup")?;
    world.binding = Some(binding);
    Ok(())
}

#[given(r#"a binding to address {address:i32} with descriptor "{descriptor}""#)]
fn bound_address_with_descriptor(
    world: &mut BrokerWorld,
    address: i32,
    descriptor: String,
) -> Result<(), eyre::Report> {
    let binding = world
        .connections()
        .connect::<f64>(world.port()?.as_str(), address, Some(&descriptor))
        .wrap_err("connect with descriptor in scenario setup")?;
    world.binding = Some(binding);
    Ok(())
}

#[given("the device fails to release driver contexts")]
fn dematerialize_fails(world: &mut BrokerWorld) -> Result<(), eyre::Report> {
    world
        .device
        .fail_dematerialize("driver context busy")
        .wrap_err("inject dematerialize failure")?;
    Ok(())
}
