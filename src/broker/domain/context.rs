//! Per-binding context handed to capability implementations.

use super::{BindingId, BindingTarget, Descriptor, Timeout};

/// Driver-defined state materialized from a descriptor.
///
/// `reason` selects the sub-channel or parameter the driver serves for this
/// binding; transfers on the same address with different reasons are
/// independent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DriverContext {
    descriptor: Descriptor,
    reason: i32,
}

impl DriverContext {
    /// Creates a driver context for `descriptor`.
    #[must_use]
    pub const fn new(descriptor: Descriptor, reason: i32) -> Self {
        Self { descriptor, reason }
    }

    /// Returns the descriptor the context was materialized from.
    #[must_use]
    pub const fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    /// Returns the driver-selected sub-channel.
    #[must_use]
    pub const fn reason(&self) -> i32 {
        self.reason
    }
}

/// State every capability call receives for the binding it serves.
///
/// The timeout is rewritten before each operation, so concurrent operations
/// on one binding are not supported; the broker enforces this through
/// `&mut` access to the owning binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingContext {
    id: BindingId,
    target: BindingTarget,
    timeout: Timeout,
    driver_context: Option<DriverContext>,
}

impl BindingContext {
    /// Creates a context for a fresh binding.
    #[must_use]
    pub fn new(target: BindingTarget, timeout: Timeout) -> Self {
        Self {
            id: BindingId::new(),
            target,
            timeout,
            driver_context: None,
        }
    }

    /// Returns the binding identifier.
    #[must_use]
    pub const fn id(&self) -> BindingId {
        self.id
    }

    /// Returns the bound target.
    #[must_use]
    pub const fn target(&self) -> &BindingTarget {
        &self.target
    }

    /// Returns the timeout of the current or most recent operation.
    #[must_use]
    pub const fn timeout(&self) -> Timeout {
        self.timeout
    }

    /// Returns the attached driver context, if any.
    #[must_use]
    pub const fn driver_context(&self) -> Option<&DriverContext> {
        self.driver_context.as_ref()
    }

    /// Returns the driver sub-channel, defaulting to `0` without a context.
    #[must_use]
    pub fn reason(&self) -> i32 {
        self.driver_context.as_ref().map_or(0, DriverContext::reason)
    }

    pub(crate) const fn set_timeout(&mut self, timeout: Timeout) {
        self.timeout = timeout;
    }

    pub(crate) fn attach_driver_context(&mut self, driver_context: DriverContext) {
        self.driver_context = Some(driver_context);
    }

    pub(crate) const fn detach_driver_context(&mut self) -> Option<DriverContext> {
        self.driver_context.take()
    }
}
