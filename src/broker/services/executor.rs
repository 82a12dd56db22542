//! Synchronous read and write under bounded exclusive access.

use super::access::ExclusiveAccess;
use super::{Binding, BrokerConfig, BrokerContext, BrokerError, BrokerResult};
use crate::broker::{
    domain::{BindingContext, Diagnostic, DiagnosticKind, Timeout, TransferOperation},
    ports::{CapabilityRegistry, CapabilityResult, PortScheduler, TransferValue, ValueTransfer},
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, warn};

/// Successful operation result with any secondary diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Completed<T> {
    value: T,
    diagnostics: Vec<Diagnostic>,
}

impl<T> Completed<T> {
    /// Wraps a value with no diagnostics.
    #[must_use]
    pub const fn new(value: T) -> Self {
        Self {
            value,
            diagnostics: Vec::new(),
        }
    }

    /// Attaches a diagnostic.
    #[must_use]
    pub fn with_diagnostic(mut self, diagnostic: Diagnostic) -> Self {
        self.diagnostics.push(diagnostic);
        self
    }

    /// Returns the transferred value.
    #[must_use]
    pub const fn value(&self) -> &T {
        &self.value
    }

    /// Consumes the result, returning the transferred value.
    #[must_use]
    pub fn into_value(self) -> T {
        self.value
    }

    /// Returns diagnostics recorded for secondary failures.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Returns whether the operation finished without secondary failures.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Runs single transfers on established bindings.
///
/// Each call stores its timeout on the binding, waits at most that long for
/// exclusive access, performs the transfer and releases access again. A
/// timed-out acquisition is reported, never retried.
pub struct SyncExecutor<S, C>
where
    S: PortScheduler,
    C: Clock + Send + Sync,
{
    scheduler: Arc<S>,
    clock: Arc<C>,
    config: BrokerConfig,
}

impl<S, C> SyncExecutor<S, C>
where
    S: PortScheduler,
    C: Clock + Send + Sync,
{
    /// Creates an executor sharing the scheduler and clock of `context`.
    #[must_use]
    pub fn new<R: CapabilityRegistry>(context: &BrokerContext<S, R, C>) -> Self {
        Self {
            scheduler: Arc::clone(context.scheduler()),
            clock: Arc::clone(context.clock()),
            config: *context.config(),
        }
    }

    /// Writes `value` through `binding`, waiting at most `timeout` for
    /// exclusive access.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::BindingNotEstablished`],
    /// [`BrokerError::AcquisitionTimeout`], [`BrokerError::AcquisitionFailed`]
    /// or [`BrokerError::TransferFailed`]. A release failure after a
    /// successful write is reported as a diagnostic, not an error.
    pub fn write<V: TransferValue>(
        &self,
        binding: &mut Binding<V>,
        value: V,
        timeout: Timeout,
    ) -> BrokerResult<Completed<()>> {
        let completed = self.run_locked(binding, TransferOperation::Write, timeout, |io, cx| {
            io.write(cx, value)
        })?;
        self.trace(binding, TransferOperation::Write, value);
        Ok(completed)
    }

    /// Reads a value through `binding`, waiting at most `timeout` for
    /// exclusive access.
    ///
    /// # Errors
    ///
    /// As for [`Self::write`].
    pub fn read<V: TransferValue>(
        &self,
        binding: &mut Binding<V>,
        timeout: Timeout,
    ) -> BrokerResult<Completed<V>> {
        let completed =
            self.run_locked(binding, TransferOperation::Read, timeout, |io, cx| io.read(cx))?;
        self.trace(binding, TransferOperation::Read, *completed.value());
        Ok(completed)
    }

    fn run_locked<V, T, F>(
        &self,
        binding: &mut Binding<V>,
        operation: TransferOperation,
        timeout: Timeout,
        transfer: F,
    ) -> BrokerResult<Completed<T>>
    where
        V: TransferValue,
        F: FnOnce(&dyn ValueTransfer<V>, &BindingContext) -> CapabilityResult<T>,
    {
        let capability = match binding.transfer() {
            Ok(capability) => capability,
            Err(err) => {
                warn!(binding = %binding.id(), error = %err, "operation on released binding");
                binding.record_error(&err);
                return Err(err);
            }
        };
        binding.context_mut().set_timeout(timeout);
        let id = binding.id();

        if let Err(source) = self.scheduler.acquire_exclusive(id, timeout) {
            let err = BrokerError::from_acquisition(binding.target().clone(), timeout, source);
            warn!(
                binding = %id,
                endpoint = %binding.target(),
                timeout = %timeout,
                error = %err,
                "exclusive access not granted"
            );
            binding.record_error(&err);
            return Err(err);
        }

        let access = ExclusiveAccess::granted(self.scheduler.as_ref(), id);
        let transferred = transfer(capability.as_ref(), binding.context());
        let released = access.release();

        match (transferred, released) {
            (Ok(value), Ok(())) => Ok(Completed::new(value)),
            (Ok(value), Err(source)) => {
                let err = BrokerError::ReleaseFailed {
                    target: binding.target().clone(),
                    source,
                };
                warn!(binding = %id, error = %err, "transfer succeeded but unlock failed");
                binding.record_error(&err);
                let diagnostic = Diagnostic::new(
                    DiagnosticKind::ReleaseFailed,
                    err.to_string(),
                    self.clock.utc(),
                );
                Ok(Completed::new(value).with_diagnostic(diagnostic))
            }
            (Err(source), released) => {
                if let Err(release_err) = released {
                    warn!(binding = %id, error = %release_err, "unlock after failed transfer");
                }
                let err = BrokerError::TransferFailed {
                    target: binding.target().clone(),
                    operation,
                    source,
                };
                if self.config.trace_io() {
                    debug!(
                        binding = %id,
                        endpoint = %binding.target(),
                        operation = %operation,
                        status = "failed",
                        error = %err,
                        "device i/o"
                    );
                }
                binding.record_error(&err);
                Err(err)
            }
        }
    }

    fn trace<V: TransferValue>(
        &self,
        binding: &Binding<V>,
        operation: TransferOperation,
        value: V,
    ) {
        if self.config.trace_io() {
            debug!(
                binding = %binding.id(),
                endpoint = %binding.target(),
                operation = %operation,
                status = "ok",
                value = ?value,
                "device i/o"
            );
        }
    }
}
