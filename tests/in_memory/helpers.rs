//! Shared test helpers for in-memory broker integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use syncport::broker::{
    adapters::memory::{EchoDevice, InMemoryCapabilityRegistry, InMemoryPortScheduler},
    domain::{Descriptor, PortName, Timeout},
    services::BrokerContext,
};

/// Port name every helper registers.
pub const PORT: &str = "serial1";

/// Context type used by integration tests.
pub type TestContext =
    BrokerContext<InMemoryPortScheduler, InMemoryCapabilityRegistry, DefaultClock>;

/// Collaborators backing one simulated port.
pub struct Rig {
    pub scheduler: Arc<InMemoryPortScheduler>,
    pub registry: Arc<InMemoryCapabilityRegistry>,
    pub device: EchoDevice,
}

impl Rig {
    /// Builds a broker context over the rig.
    #[must_use]
    pub fn context(&self) -> TestContext {
        BrokerContext::new(
            Arc::clone(&self.scheduler),
            Arc::clone(&self.registry),
            Arc::new(DefaultClock),
        )
    }
}

/// Provides a port with 16 addresses served by an echo device that knows
/// the `GAIN` (1) and `OFFSET` (2) sub-channels.
///
/// # Errors
///
/// Returns an error if the port or channels cannot be registered.
#[fixture]
pub fn rig() -> Result<Rig, Box<dyn std::error::Error + Send + Sync>> {
    let port = PortName::new(PORT)?;
    let scheduler = Arc::new(InMemoryPortScheduler::new());
    scheduler.add_port(port.clone(), 16)?;
    let registry = Arc::new(InMemoryCapabilityRegistry::new());
    let device = EchoDevice::new();
    registry.register_all(&port, device.handles());
    device.define_channel(Descriptor::new("GAIN")?, 1)?;
    device.define_channel(Descriptor::new("OFFSET")?, 2)?;
    Ok(Rig {
        scheduler,
        registry,
        device,
    })
}

/// Converts seconds into a validated timeout.
///
/// # Panics
///
/// Panics when `seconds` is not a valid timeout.
#[must_use]
pub fn seconds(value: f64) -> Timeout {
    Timeout::from_secs_f64(value).expect("valid timeout")
}
