//! Service-level error taxonomy for broker operations.

use crate::broker::{
    domain::{
        BindingId, BindingState, BindingTarget, BrokerDomainError, CapabilityKind, Descriptor,
        TeardownStep, Timeout, TransferOperation,
    },
    ports::{CapabilityError, PortSchedulerError},
};
use thiserror::Error;

/// Result type for broker service operations.
pub type BrokerResult<T> = Result<T, BrokerError>;

/// Failure captured from one teardown step.
#[derive(Debug, Clone, Error)]
pub enum TeardownFailure {
    /// The driver user capability failed to destroy its context.
    #[error(transparent)]
    Capability(#[from] CapabilityError),
    /// The port scheduler failed to detach the binding.
    #[error(transparent)]
    Scheduler(#[from] PortSchedulerError),
}

/// Errors returned by broker services.
#[derive(Debug, Clone, Error)]
pub enum BrokerError {
    /// Caller input failed validation.
    #[error(transparent)]
    Domain(#[from] BrokerDomainError),

    /// The port scheduler could not bind the requested address.
    #[error("can't connect to {target}: {source}")]
    AddressBindingFailed {
        /// Requested target.
        target: BindingTarget,
        /// Scheduler failure.
        source: PortSchedulerError,
    },

    /// A mandatory capability is not supported by the target.
    #[error("{kind} capability not supported by {target}")]
    CapabilityMissing {
        /// Bound target.
        target: BindingTarget,
        /// Missing capability kind.
        kind: CapabilityKind,
    },

    /// The driver user capability refused the descriptor.
    #[error("driver context for descriptor '{descriptor}' on {target} failed: {source}")]
    ContextMaterializationFailed {
        /// Bound target.
        target: BindingTarget,
        /// Descriptor supplied at connect time.
        descriptor: Descriptor,
        /// Capability failure.
        source: CapabilityError,
    },

    /// Exclusive access was not granted within the requested bound.
    #[error("exclusive access to {target} not granted within {timeout}")]
    AcquisitionTimeout {
        /// Bound target.
        target: BindingTarget,
        /// Requested bound.
        timeout: Timeout,
    },

    /// The scheduler refused exclusive access for a reason other than time.
    #[error("exclusive access to {target} refused: {source}")]
    AcquisitionFailed {
        /// Bound target.
        target: BindingTarget,
        /// Scheduler failure.
        source: PortSchedulerError,
    },

    /// The value-transfer capability reported a failure.
    #[error("{operation} on {target} failed: {source}")]
    TransferFailed {
        /// Bound target.
        target: BindingTarget,
        /// Attempted transfer direction.
        operation: TransferOperation,
        /// Capability failure.
        source: CapabilityError,
    },

    /// Exclusive access could not be released.
    #[error("releasing exclusive access to {target} failed: {source}")]
    ReleaseFailed {
        /// Bound target.
        target: BindingTarget,
        /// Scheduler failure.
        source: PortSchedulerError,
    },

    /// One or more teardown steps failed; every step still ran.
    #[error(
        "teardown of {target} failed at {step}: {source} ({additional_failures} further failures)"
    )]
    TeardownPartialFailure {
        /// Bound target.
        target: BindingTarget,
        /// First step that failed.
        step: TeardownStep,
        /// Failure of the first failing step.
        source: TeardownFailure,
        /// Number of later steps that also failed.
        additional_failures: usize,
    },

    /// The binding was already released and accepts no further use.
    #[error("binding {binding} is {state}; only established bindings accept operations")]
    BindingNotEstablished {
        /// Binding identifier.
        binding: BindingId,
        /// Current state.
        state: BindingState,
    },
}

impl BrokerError {
    /// Maps a failed exclusive-access request onto the broker taxonomy.
    #[must_use]
    pub fn from_acquisition(
        target: BindingTarget,
        timeout: Timeout,
        source: PortSchedulerError,
    ) -> Self {
        if source.is_timeout() {
            Self::AcquisitionTimeout { target, timeout }
        } else {
            Self::AcquisitionFailed { target, source }
        }
    }
}
