//! Explicit collaborator context threaded through broker services.

use super::BrokerConfig;
use crate::broker::ports::{CapabilityRegistry, PortScheduler};
use mockable::Clock;
use std::sync::Arc;

/// References to the port scheduler, capability registry and clock, plus
/// configuration.
///
/// Every service is constructed from a context, so there is no process-wide
/// scheduler or registry.
pub struct BrokerContext<S, R, C>
where
    S: PortScheduler,
    R: CapabilityRegistry,
    C: Clock + Send + Sync,
{
    scheduler: Arc<S>,
    registry: Arc<R>,
    clock: Arc<C>,
    config: BrokerConfig,
}

impl<S, R, C> BrokerContext<S, R, C>
where
    S: PortScheduler,
    R: CapabilityRegistry,
    C: Clock + Send + Sync,
{
    /// Creates a context with the default configuration.
    #[must_use]
    pub fn new(scheduler: Arc<S>, registry: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            scheduler,
            registry,
            clock,
            config: BrokerConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub const fn with_config(mut self, config: BrokerConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the port scheduler.
    #[must_use]
    pub const fn scheduler(&self) -> &Arc<S> {
        &self.scheduler
    }

    /// Returns the capability registry.
    #[must_use]
    pub const fn registry(&self) -> &Arc<R> {
        &self.registry
    }

    /// Returns the clock.
    #[must_use]
    pub const fn clock(&self) -> &Arc<C> {
        &self.clock
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &BrokerConfig {
        &self.config
    }
}

impl<S, R, C> Clone for BrokerContext<S, R, C>
where
    S: PortScheduler,
    R: CapabilityRegistry,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            scheduler: Arc::clone(&self.scheduler),
            registry: Arc::clone(&self.registry),
            clock: Arc::clone(&self.clock),
            config: self.config,
        }
    }
}
