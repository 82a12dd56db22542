//! Shared world state for synchronous broker BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use syncport::broker::{
    adapters::memory::{EchoDevice, InMemoryCapabilityRegistry, InMemoryPortScheduler},
    domain::PortName,
    services::{
        Binding, BrokerContext, BrokerError, BrokerResult, Completed, ConnectionManager, OneShot,
        SyncExecutor,
    },
};

/// Context type used by the BDD world.
pub type TestContext =
    BrokerContext<InMemoryPortScheduler, InMemoryCapabilityRegistry, DefaultClock>;

/// Scenario world for synchronous broker behaviour tests.
pub struct BrokerWorld {
    pub scheduler: Arc<InMemoryPortScheduler>,
    pub registry: Arc<InMemoryCapabilityRegistry>,
    pub device: EchoDevice,
    pub port: Option<PortName>,
    pub binding: Option<Binding<f64>>,
    pub connect_error: Option<BrokerError>,
    pub last_write: Option<BrokerResult<Completed<()>>>,
    pub last_read: Option<BrokerResult<Completed<f64>>>,
    pub disconnect_results: Vec<BrokerResult<()>>,
}

impl BrokerWorld {
    /// Creates a world with no ports and an idle echo device.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scheduler: Arc::new(InMemoryPortScheduler::new()),
            registry: Arc::new(InMemoryCapabilityRegistry::new()),
            device: EchoDevice::new(),
            port: None,
            binding: None,
            connect_error: None,
            last_write: None,
            last_read: None,
            disconnect_results: Vec::new(),
        }
    }

    /// Returns the port registered for the scenario.
    ///
    /// # Errors
    ///
    /// Returns an error when no port has been registered yet.
    pub fn port(&self) -> Result<&PortName, eyre::Report> {
        self.port
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing port in scenario world"))
    }

    /// Builds a broker context over the world's collaborators.
    #[must_use]
    pub fn context(&self) -> TestContext {
        BrokerContext::new(
            Arc::clone(&self.scheduler),
            Arc::clone(&self.registry),
            Arc::new(DefaultClock),
        )
    }

    /// Builds a connection manager over the world's collaborators.
    #[must_use]
    pub fn connections(
        &self,
    ) -> ConnectionManager<InMemoryPortScheduler, InMemoryCapabilityRegistry, DefaultClock> {
        ConnectionManager::new(self.context())
    }

    /// Builds an executor over the world's collaborators.
    #[must_use]
    pub fn executor(&self) -> SyncExecutor<InMemoryPortScheduler, DefaultClock> {
        SyncExecutor::new(&self.context())
    }

    /// Builds a one-shot facade over the world's collaborators.
    #[must_use]
    pub fn one_shot(
        &self,
    ) -> OneShot<InMemoryPortScheduler, InMemoryCapabilityRegistry, DefaultClock> {
        OneShot::new(self.context())
    }
}

impl Default for BrokerWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> BrokerWorld {
    BrokerWorld::default()
}
