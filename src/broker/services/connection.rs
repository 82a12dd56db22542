//! Binding lifecycle: connect, disconnect and status reporting.

use super::access::{PendingBinding, tear_down};
use super::binding::BoundCapabilities;
use super::{Binding, BrokerContext, BrokerError, BrokerResult};
use crate::broker::{
    domain::{
        BindingContext, BindingTarget, CapabilityKind, ContextState, Descriptor, Diagnostic,
        DiagnosticKind, PortName,
    },
    ports::{
        CapabilityHandle, CapabilityRegistry, DriverUserCapability, PortScheduler, TransferValue,
    },
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Outcome of optional driver-context setup during connect.
struct DriverSetup {
    capability: Option<Arc<dyn DriverUserCapability>>,
    state: ContextState,
    failure: Option<BrokerError>,
}

impl DriverSetup {
    const fn skipped(state: ContextState) -> Self {
        Self {
            capability: None,
            state,
            failure: None,
        }
    }
}

/// Establishes and releases bindings.
///
/// A binding is returned only when the address is bound and both mandatory
/// capabilities (lifecycle and the value family's transfer) were found. Any
/// failure before that point rolls the address binding back.
pub struct ConnectionManager<S, R, C>
where
    S: PortScheduler,
    R: CapabilityRegistry,
    C: Clock + Send + Sync,
{
    context: BrokerContext<S, R, C>,
}

impl<S, R, C> ConnectionManager<S, R, C>
where
    S: PortScheduler,
    R: CapabilityRegistry,
    C: Clock + Send + Sync,
{
    /// Creates a connection manager over `context`.
    #[must_use]
    pub const fn new(context: BrokerContext<S, R, C>) -> Self {
        Self { context }
    }

    /// Returns the collaborator context.
    #[must_use]
    pub const fn context(&self) -> &BrokerContext<S, R, C> {
        &self.context
    }

    /// Connects to `address` on `port` for values of type `V`.
    ///
    /// When `descriptor` is supplied and the target offers a driver user
    /// capability, a driver context is materialized for it. Failing to do so
    /// does not fail the connect; the binding carries a diagnostic instead.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::Domain`] for an invalid port name or
    /// descriptor, [`BrokerError::AddressBindingFailed`] when the scheduler
    /// refuses the address, or [`BrokerError::CapabilityMissing`] when a
    /// mandatory capability is absent.
    pub fn connect<V: TransferValue>(
        &self,
        port: &str,
        address: i32,
        descriptor: Option<&str>,
    ) -> BrokerResult<Binding<V>> {
        let target = BindingTarget::new(PortName::new(port)?, address);
        let descriptor = descriptor.map(Descriptor::new).transpose()?;
        let mut context = BindingContext::new(target, self.context.config().default_timeout());
        let scheduler = self.context.scheduler().as_ref();

        if let Err(source) = scheduler.bind_address(context.id(), context.target()) {
            warn!(endpoint = %context.target(), error = %source, "address binding refused");
            return Err(BrokerError::AddressBindingFailed {
                target: context.target().clone(),
                source,
            });
        }

        let pending = PendingBinding::bound(scheduler, &context);
        let lifecycle = self.require(
            &context,
            CapabilityKind::Lifecycle,
            CapabilityHandle::into_lifecycle,
        )?;
        let transfer = self.require(&context, V::KIND, V::transfer_from)?;
        pending.commit();

        let setup = match &descriptor {
            Some(descriptor) => self.materialize(&mut context, descriptor),
            None => DriverSetup::skipped(ContextState::NotRequested),
        };

        let capabilities = BoundCapabilities {
            lifecycle,
            transfer,
            driver_user: setup.capability,
        };
        let mut binding =
            Binding::established(context, capabilities, setup.state, self.context.clock().utc());
        if let Some(failure) = setup.failure {
            let diagnostic = Diagnostic::new(
                DiagnosticKind::ContextMaterializationFailed,
                failure.to_string(),
                binding.established_at(),
            );
            binding.push_diagnostic(diagnostic);
            binding.record_error(&failure);
        }

        debug!(
            binding = %binding.id(),
            endpoint = %binding.target(),
            context_state = %binding.context_state(),
            "binding established"
        );
        Ok(binding)
    }

    /// Releases every resource held by `binding`.
    ///
    /// Each teardown step runs even when an earlier one fails. The binding
    /// is released afterwards regardless of the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::BindingNotEstablished`] when the binding was
    /// already released, or [`BrokerError::TeardownPartialFailure`] naming
    /// the first step that failed.
    pub fn disconnect<V: TransferValue>(&self, binding: &mut Binding<V>) -> BrokerResult<()> {
        let Some(capabilities) = binding.release_capabilities() else {
            let err = binding.not_established();
            warn!(binding = %binding.id(), error = %err, "disconnect on released binding");
            binding.record_error(&err);
            return Err(err);
        };

        let outcome = tear_down(
            self.context.scheduler().as_ref(),
            binding.context(),
            capabilities.driver_user.as_deref(),
        );
        binding.context_mut().detach_driver_context();

        match &outcome {
            Ok(()) => {
                debug!(binding = %binding.id(), endpoint = %binding.target(), "binding released");
            }
            Err(err) => binding.record_error(err),
        }
        outcome
    }

    /// Returns the lifecycle capability's description of the bound device.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::BindingNotEstablished`] when the binding was
    /// released; the error is also recorded on the binding.
    pub fn report<V: TransferValue>(&self, binding: &mut Binding<V>) -> BrokerResult<String> {
        match binding.lifecycle() {
            Ok(lifecycle) => Ok(lifecycle.report(binding.context())),
            Err(err) => {
                binding.record_error(&err);
                Err(err)
            }
        }
    }

    fn require<T>(
        &self,
        context: &BindingContext,
        kind: CapabilityKind,
        extract: impl FnOnce(CapabilityHandle) -> Option<T>,
    ) -> BrokerResult<T> {
        self.context
            .registry()
            .find_capability(context, kind)
            .and_then(extract)
            .ok_or_else(|| {
                error!(
                    binding = %context.id(),
                    endpoint = %context.target(),
                    capability = %kind,
                    "mandatory capability not supported"
                );
                BrokerError::CapabilityMissing {
                    target: context.target().clone(),
                    kind,
                }
            })
    }

    fn materialize(&self, context: &mut BindingContext, descriptor: &Descriptor) -> DriverSetup {
        let Some(capability) = self
            .context
            .registry()
            .find_capability(context, CapabilityKind::DriverUser)
            .and_then(CapabilityHandle::into_driver_user)
        else {
            debug!(
                binding = %context.id(),
                descriptor = %descriptor,
                "driver user capability not supported; descriptor ignored"
            );
            return DriverSetup::skipped(ContextState::Unsupported);
        };

        match capability.materialize(context, descriptor) {
            Ok(driver_context) => {
                context.attach_driver_context(driver_context);
                DriverSetup {
                    capability: Some(capability),
                    state: ContextState::Attached,
                    failure: None,
                }
            }
            Err(source) => {
                let failure = BrokerError::ContextMaterializationFailed {
                    target: context.target().clone(),
                    descriptor: descriptor.clone(),
                    source,
                };
                warn!(
                    binding = %context.id(),
                    endpoint = %context.target(),
                    descriptor = %descriptor,
                    error = %failure,
                    "driver context not materialized; continuing without it"
                );
                DriverSetup {
                    capability: None,
                    state: ContextState::Failed,
                    failure: Some(failure),
                }
            }
        }
    }
}
