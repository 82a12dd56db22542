//! Capability contracts a port address may implement.

use crate::broker::domain::{BindingContext, CapabilityKind, Descriptor, DriverContext, Timeout};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type for capability operations.
pub type CapabilityResult<T> = Result<T, CapabilityError>;

/// Common lifecycle operations every established binding resolves.
pub trait LifecycleCapability: Send + Sync {
    /// Describes the device serving the binding.
    fn report(&self, context: &BindingContext) -> String;
}

/// Transfer of a single scalar value to or from a port address.
pub trait ValueTransfer<V>: Send + Sync {
    /// Writes `value` to the binding's address.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError`] when the device rejects the write.
    fn write(&self, context: &BindingContext, value: V) -> CapabilityResult<()>;

    /// Reads the current value at the binding's address.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError`] when the device cannot produce a value.
    fn read(&self, context: &BindingContext) -> CapabilityResult<V>;
}

/// Driver-defined per-binding configuration keyed by a descriptor.
pub trait DriverUserCapability: Send + Sync {
    /// Builds a driver context for `descriptor`.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError`] when the driver does not understand the
    /// descriptor.
    fn materialize(
        &self,
        context: &BindingContext,
        descriptor: &Descriptor,
    ) -> CapabilityResult<DriverContext>;

    /// Destroys a driver context built by [`Self::materialize`].
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError`] when the driver cannot release the context.
    fn dematerialize(
        &self,
        context: &BindingContext,
        driver_context: &DriverContext,
    ) -> CapabilityResult<()>;
}

/// Type-erased capability discovered through the registry.
///
/// Each variant owns its implementation together with whatever private
/// state that implementation carries.
#[derive(Clone)]
pub enum CapabilityHandle {
    /// Lifecycle operations.
    Lifecycle(Arc<dyn LifecycleCapability>),
    /// Transfer of `f64` values.
    Float64(Arc<dyn ValueTransfer<f64>>),
    /// Transfer of `i32` values.
    Int32(Arc<dyn ValueTransfer<i32>>),
    /// Driver user context.
    DriverUser(Arc<dyn DriverUserCapability>),
}

impl CapabilityHandle {
    /// Returns the capability kind this handle implements.
    #[must_use]
    pub const fn kind(&self) -> CapabilityKind {
        match self {
            Self::Lifecycle(_) => CapabilityKind::Lifecycle,
            Self::Float64(_) => CapabilityKind::Float64,
            Self::Int32(_) => CapabilityKind::Int32,
            Self::DriverUser(_) => CapabilityKind::DriverUser,
        }
    }

    /// Extracts the lifecycle implementation.
    #[must_use]
    pub fn into_lifecycle(self) -> Option<Arc<dyn LifecycleCapability>> {
        match self {
            Self::Lifecycle(capability) => Some(capability),
            _ => None,
        }
    }

    /// Extracts the driver user implementation.
    #[must_use]
    pub fn into_driver_user(self) -> Option<Arc<dyn DriverUserCapability>> {
        match self {
            Self::DriverUser(capability) => Some(capability),
            _ => None,
        }
    }
}

impl fmt::Debug for CapabilityHandle {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_tuple("CapabilityHandle")
            .field(&self.kind())
            .finish()
    }
}

/// Scalar type with a matching value-transfer capability kind.
pub trait TransferValue: Copy + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Capability kind that transfers this type.
    const KIND: CapabilityKind;

    /// Extracts the transfer implementation for this type from a handle.
    fn transfer_from(handle: CapabilityHandle) -> Option<Arc<dyn ValueTransfer<Self>>>;
}

impl TransferValue for f64 {
    const KIND: CapabilityKind = CapabilityKind::Float64;

    fn transfer_from(handle: CapabilityHandle) -> Option<Arc<dyn ValueTransfer<Self>>> {
        match handle {
            CapabilityHandle::Float64(capability) => Some(capability),
            _ => None,
        }
    }
}

impl TransferValue for i32 {
    const KIND: CapabilityKind = CapabilityKind::Int32;

    fn transfer_from(handle: CapabilityHandle) -> Option<Arc<dyn ValueTransfer<Self>>> {
        match handle {
            CapabilityHandle::Int32(capability) => Some(capability),
            _ => None,
        }
    }
}

/// Errors reported by capability implementations.
#[derive(Debug, Clone, Error)]
pub enum CapabilityError {
    /// The device reported a failure.
    #[error("device reported failure: {0}")]
    Device(String),

    /// The device did not answer within the binding's timeout.
    #[error("device did not respond within {0}")]
    Timeout(Timeout),

    /// The driver does not recognise the descriptor.
    #[error("unknown driver descriptor '{0}'")]
    UnknownDescriptor(Descriptor),

    /// Generic runtime failure.
    #[error("capability runtime error: {0}")]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),
}

impl CapabilityError {
    /// Creates a device failure with a message.
    pub fn device(message: impl Into<String>) -> Self {
        Self::Device(message.into())
    }

    /// Wraps a runtime error from the capability implementation.
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }
}
