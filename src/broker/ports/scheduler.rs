//! Port scheduler contract for address binding and exclusive access.

use crate::broker::domain::{BindingId, BindingTarget, PortName, Timeout};
use std::sync::Arc;
use thiserror::Error;

/// Result type for port scheduler operations.
pub type PortSchedulerResult<T> = Result<T, PortSchedulerError>;

/// Owner of the real port, serializing access across every client.
///
/// Implementations must be safe to share between threads: many brokers and
/// many bindings talk to one scheduler concurrently.
pub trait PortScheduler: Send + Sync {
    /// Binds `binding` to a (port, address) pair.
    ///
    /// # Errors
    ///
    /// Returns [`PortSchedulerError::UnknownPort`],
    /// [`PortSchedulerError::AddressOutOfRange`] or
    /// [`PortSchedulerError::Unreachable`] when the target is not available.
    fn bind_address(&self, binding: BindingId, target: &BindingTarget) -> PortSchedulerResult<()>;

    /// Detaches `binding` from its target, dropping any access it still holds.
    ///
    /// # Errors
    ///
    /// Returns [`PortSchedulerError::UnknownBinding`] when the binding is not
    /// bound.
    fn unbind_address(&self, binding: BindingId) -> PortSchedulerResult<()>;

    /// Blocks for at most `timeout` until `binding` holds exclusive access to
    /// its target.
    ///
    /// # Errors
    ///
    /// Returns [`PortSchedulerError::Timeout`] when access was not granted in
    /// time.
    fn acquire_exclusive(&self, binding: BindingId, timeout: Timeout) -> PortSchedulerResult<()>;

    /// Releases exclusive access held by `binding`.
    ///
    /// # Errors
    ///
    /// Returns [`PortSchedulerError::NotHeld`] when the binding does not hold
    /// access.
    fn release_exclusive(&self, binding: BindingId) -> PortSchedulerResult<()>;
}

/// Errors returned by port scheduler implementations.
#[derive(Debug, Clone, Error)]
pub enum PortSchedulerError {
    /// No port with this name is registered.
    #[error("port {0} not found")]
    UnknownPort(PortName),

    /// The address is outside the range the port serves.
    #[error("address {address} is out of range for port {port}")]
    AddressOutOfRange {
        /// Port name.
        port: PortName,
        /// Requested address.
        address: i32,
    },

    /// The port exists but cannot currently be reached.
    #[error("port {port} is unreachable: {reason}")]
    Unreachable {
        /// Port name.
        port: PortName,
        /// Reason string.
        reason: String,
    },

    /// Exclusive access was not granted within the requested bound.
    #[error("exclusive access to {target} not granted within {timeout}")]
    Timeout {
        /// Contended target.
        target: BindingTarget,
        /// Requested bound.
        timeout: Timeout,
    },

    /// The binding is not known to the scheduler.
    #[error("binding {0} is not bound to any address")]
    UnknownBinding(BindingId),

    /// The binding already holds exclusive access.
    #[error("binding {0} already holds exclusive access")]
    AlreadyHeld(BindingId),

    /// The binding does not hold exclusive access.
    #[error("binding {0} does not hold exclusive access")]
    NotHeld(BindingId),

    /// The scheduler refused the request.
    #[error("port scheduler rejected request: {0}")]
    Rejected(String),

    /// Generic runtime failure.
    #[error("port scheduler runtime error: {0}")]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),
}

impl PortSchedulerError {
    /// Wraps a runtime error from the scheduler implementation.
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }

    /// Returns whether the error reports an expired access wait.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
