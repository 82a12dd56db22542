//! Established connection between a caller and a port address.

use super::{BrokerError, BrokerResult};
use crate::broker::{
    domain::{
        BindingContext, BindingId, BindingState, BindingTarget, ContextState, Diagnostic,
        DriverContext, Timeout,
    },
    ports::{DriverUserCapability, LifecycleCapability, TransferValue, ValueTransfer},
};
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Capabilities resolved while connecting.
pub(crate) struct BoundCapabilities<V: TransferValue> {
    pub(crate) lifecycle: Arc<dyn LifecycleCapability>,
    pub(crate) transfer: Arc<dyn ValueTransfer<V>>,
    pub(crate) driver_user: Option<Arc<dyn DriverUserCapability>>,
}

/// A caller's connection to one (port, address) pair for values of type `V`.
///
/// Bindings are only produced fully established by
/// [`ConnectionManager::connect`](super::ConnectionManager::connect). After
/// [`ConnectionManager::disconnect`](super::ConnectionManager::disconnect)
/// the binding is released and every further use is rejected.
///
/// Dropping an established binding does not disconnect it: its address stays
/// bound on the scheduler. Callers must call `disconnect` before dropping it.
pub struct Binding<V: TransferValue> {
    context: BindingContext,
    capabilities: Option<BoundCapabilities<V>>,
    context_state: ContextState,
    established_at: DateTime<Utc>,
    error_message: Option<String>,
    diagnostics: Vec<Diagnostic>,
}

impl<V: TransferValue> Binding<V> {
    pub(crate) fn established(
        context: BindingContext,
        capabilities: BoundCapabilities<V>,
        context_state: ContextState,
        established_at: DateTime<Utc>,
    ) -> Self {
        Self {
            context,
            capabilities: Some(capabilities),
            context_state,
            established_at,
            error_message: None,
            diagnostics: Vec::new(),
        }
    }

    /// Returns the binding identifier.
    #[must_use]
    pub const fn id(&self) -> BindingId {
        self.context.id()
    }

    /// Returns the bound (port, address) pair.
    #[must_use]
    pub const fn target(&self) -> &BindingTarget {
        self.context.target()
    }

    /// Returns the timeout of the most recent operation, or the configured
    /// default before the first one.
    #[must_use]
    pub const fn timeout(&self) -> Timeout {
        self.context.timeout()
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn state(&self) -> BindingState {
        if self.capabilities.is_some() {
            BindingState::Established
        } else {
            BindingState::Released
        }
    }

    /// Returns whether the binding accepts operations.
    #[must_use]
    pub const fn is_established(&self) -> bool {
        self.state().accepts_operations()
    }

    /// Returns the outcome of driver-context setup.
    #[must_use]
    pub const fn context_state(&self) -> ContextState {
        self.context_state
    }

    /// Returns the attached driver context, if any.
    #[must_use]
    pub const fn driver_context(&self) -> Option<&DriverContext> {
        self.context.driver_context()
    }

    /// Returns when the binding was established.
    #[must_use]
    pub const fn established_at(&self) -> DateTime<Utc> {
        self.established_at
    }

    /// Returns the description of the most recent failure on this binding.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Returns non-fatal problems recorded against the binding.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub(crate) const fn context(&self) -> &BindingContext {
        &self.context
    }

    pub(crate) const fn context_mut(&mut self) -> &mut BindingContext {
        &mut self.context
    }

    pub(crate) fn record_error(&mut self, error: &BrokerError) {
        self.error_message = Some(error.to_string());
    }

    pub(crate) fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub(crate) fn not_established(&self) -> BrokerError {
        BrokerError::BindingNotEstablished {
            binding: self.id(),
            state: self.state(),
        }
    }

    pub(crate) fn transfer(&self) -> BrokerResult<Arc<dyn ValueTransfer<V>>> {
        self.capabilities
            .as_ref()
            .map(|capabilities| Arc::clone(&capabilities.transfer))
            .ok_or_else(|| self.not_established())
    }

    pub(crate) fn lifecycle(&self) -> BrokerResult<Arc<dyn LifecycleCapability>> {
        self.capabilities
            .as_ref()
            .map(|capabilities| Arc::clone(&capabilities.lifecycle))
            .ok_or_else(|| self.not_established())
    }

    #[cfg(test)]
    pub(crate) const fn holds_driver_user(&self) -> bool {
        matches!(
            &self.capabilities,
            Some(BoundCapabilities {
                driver_user: Some(_),
                ..
            })
        )
    }

    /// Moves the capabilities out, leaving the binding released.
    pub(crate) const fn release_capabilities(&mut self) -> Option<BoundCapabilities<V>> {
        self.capabilities.take()
    }
}

impl<V: TransferValue> fmt::Debug for Binding<V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Binding")
            .field("id", &self.id())
            .field("target", self.target())
            .field("state", &self.state())
            .field("context_state", &self.context_state)
            .field("timeout", &self.timeout())
            .field("error_message", &self.error_message)
            .finish_non_exhaustive()
    }
}

impl<V: TransferValue> Drop for Binding<V> {
    fn drop(&mut self) {
        if self.capabilities.is_some() {
            warn!(
                binding = %self.id(),
                endpoint = %self.target(),
                "binding dropped without disconnect; its address stays bound"
            );
        }
    }
}
