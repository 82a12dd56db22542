//! Shared fixtures for broker service tests.

use std::sync::Arc;

use crate::broker::{
    adapters::memory::{EchoDevice, InMemoryCapabilityRegistry, InMemoryPortScheduler},
    domain::{BindingTarget, CapabilityKind, Descriptor, PortName},
    services::{BrokerConfig, BrokerContext, ConnectionManager, OneShot, SyncExecutor},
};
use mockable::DefaultClock;
use rstest::fixture;

pub(super) const PORT: &str = "L0";
pub(super) const ADDRESS_COUNT: i32 = 8;

pub(super) type TestContext =
    BrokerContext<InMemoryPortScheduler, InMemoryCapabilityRegistry, DefaultClock>;
pub(super) type TestConnections =
    ConnectionManager<InMemoryPortScheduler, InMemoryCapabilityRegistry, DefaultClock>;
pub(super) type TestExecutor = SyncExecutor<InMemoryPortScheduler, DefaultClock>;
pub(super) type TestOneShot =
    OneShot<InMemoryPortScheduler, InMemoryCapabilityRegistry, DefaultClock>;

pub(super) fn port() -> PortName {
    PortName::new(PORT).expect("valid port name")
}

pub(super) fn target(address: i32) -> BindingTarget {
    BindingTarget::new(port(), address)
}

/// One port served by an echo device, with every collaborator exposed.
pub(super) struct Harness {
    pub(super) scheduler: Arc<InMemoryPortScheduler>,
    pub(super) registry: Arc<InMemoryCapabilityRegistry>,
    pub(super) device: EchoDevice,
    pub(super) config: BrokerConfig,
}

impl Harness {
    pub(super) fn new() -> Self {
        let scheduler = Arc::new(InMemoryPortScheduler::new());
        scheduler
            .add_port(port(), ADDRESS_COUNT)
            .expect("port registration should succeed");
        let registry = Arc::new(InMemoryCapabilityRegistry::new());
        let device = EchoDevice::new();
        registry.register_all(&port(), device.handles());
        device
            .define_channel(Descriptor::new("GAIN").expect("valid descriptor"), 1)
            .expect("channel definition should succeed");
        device
            .define_channel(Descriptor::new("OFFSET").expect("valid descriptor"), 2)
            .expect("channel definition should succeed");
        Self {
            scheduler,
            registry,
            device,
            config: BrokerConfig::default(),
        }
    }

    pub(super) const fn with_config(mut self, config: BrokerConfig) -> Self {
        self.config = config;
        self
    }

    pub(super) fn context(&self) -> TestContext {
        BrokerContext::new(
            Arc::clone(&self.scheduler),
            Arc::clone(&self.registry),
            Arc::new(DefaultClock),
        )
        .with_config(self.config)
    }

    pub(super) fn connections(&self) -> TestConnections {
        ConnectionManager::new(self.context())
    }

    pub(super) fn executor(&self) -> TestExecutor {
        SyncExecutor::new(&self.context())
    }

    pub(super) fn one_shot(&self) -> TestOneShot {
        OneShot::new(self.context())
    }

    pub(super) fn withdraw(&self, kind: CapabilityKind) {
        assert!(
            self.registry.withdraw(&port(), kind),
            "{kind} should have been registered"
        );
    }

    pub(super) fn outstanding_bindings(&self) -> usize {
        self.scheduler
            .outstanding_bindings()
            .expect("binding count should succeed")
    }

    pub(super) fn held_locks(&self) -> usize {
        self.scheduler
            .held_locks()
            .expect("lock count should succeed")
    }

    pub(super) fn release_requests(&self) -> usize {
        self.scheduler
            .release_requests()
            .expect("release count should succeed")
    }

    pub(super) fn acquire_requests(&self) -> usize {
        self.scheduler
            .acquire_requests()
            .expect("acquire count should succeed")
    }
}

#[fixture]
pub(super) fn harness() -> Harness {
    Harness::new()
}
