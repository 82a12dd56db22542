//! Connect, transfer once and disconnect in a single call.

use super::{Binding, BrokerContext, BrokerResult, Completed, ConnectionManager, SyncExecutor};
use crate::broker::{
    domain::{Diagnostic, DiagnosticKind, Timeout},
    ports::{CapabilityRegistry, PortScheduler, TransferValue},
};
use mockable::Clock;
use tracing::{debug, error, warn};

/// Convenience facade for callers that transfer a single value.
///
/// The binding created for the call is always disconnected before the call
/// returns. A teardown failure never replaces the operation's own result.
pub struct OneShot<S, R, C>
where
    S: PortScheduler,
    R: CapabilityRegistry,
    C: Clock + Send + Sync,
{
    connections: ConnectionManager<S, R, C>,
    executor: SyncExecutor<S, C>,
}

impl<S, R, C> OneShot<S, R, C>
where
    S: PortScheduler,
    R: CapabilityRegistry,
    C: Clock + Send + Sync,
{
    /// Creates a facade over `context`.
    #[must_use]
    pub fn new(context: BrokerContext<S, R, C>) -> Self {
        let executor = SyncExecutor::new(&context);
        Self {
            connections: ConnectionManager::new(context),
            executor,
        }
    }

    /// Connects to (`port`, `address`), writes `value` and disconnects.
    ///
    /// # Errors
    ///
    /// Returns the connect error when no binding could be established,
    /// otherwise the write's error.
    pub fn write_once<V: TransferValue>(
        &self,
        port: &str,
        address: i32,
        value: V,
        timeout: Timeout,
        descriptor: Option<&str>,
    ) -> BrokerResult<Completed<()>> {
        let mut scoped = self.scoped(self.connections.connect::<V>(port, address, descriptor)?);
        let outcome = self.executor.write(&mut scoped.binding, value, timeout);
        scoped.finish(outcome)
    }

    /// Connects to (`port`, `address`), reads one value and disconnects.
    ///
    /// # Errors
    ///
    /// Returns the connect error when no binding could be established,
    /// otherwise the read's error.
    pub fn read_once<V: TransferValue>(
        &self,
        port: &str,
        address: i32,
        timeout: Timeout,
        descriptor: Option<&str>,
    ) -> BrokerResult<Completed<V>> {
        let mut scoped = self.scoped(self.connections.connect::<V>(port, address, descriptor)?);
        let outcome = self.executor.read(&mut scoped.binding, timeout);
        scoped.finish(outcome)
    }

    const fn scoped<V: TransferValue>(&self, binding: Binding<V>) -> ScopedBinding<'_, S, R, C, V> {
        ScopedBinding {
            connections: &self.connections,
            binding,
            disconnected: false,
        }
    }
}

/// One-shot binding that is disconnected on every exit path.
///
/// [`Self::finish`] folds the teardown outcome into the operation's result.
/// If the guard is dropped instead (for example while a transfer unwinds)
/// the disconnect still happens and any failure is logged.
struct ScopedBinding<'a, S, R, C, V>
where
    S: PortScheduler,
    R: CapabilityRegistry,
    C: Clock + Send + Sync,
    V: TransferValue,
{
    connections: &'a ConnectionManager<S, R, C>,
    binding: Binding<V>,
    disconnected: bool,
}

impl<S, R, C, V> ScopedBinding<'_, S, R, C, V>
where
    S: PortScheduler,
    R: CapabilityRegistry,
    C: Clock + Send + Sync,
    V: TransferValue,
{
    fn finish<T>(mut self, outcome: BrokerResult<Completed<T>>) -> BrokerResult<Completed<T>> {
        if let Err(err) = &outcome {
            warn!(
                binding = %self.binding.id(),
                endpoint = %self.binding.target(),
                error = %err,
                "one-shot operation failed"
            );
        }

        self.disconnected = true;
        let Err(teardown) = self.connections.disconnect(&mut self.binding) else {
            return outcome;
        };

        match outcome {
            Ok(completed) => {
                warn!(
                    binding = %self.binding.id(),
                    error = %teardown,
                    "teardown failed after success"
                );
                let diagnostic = Diagnostic::new(
                    DiagnosticKind::TeardownFailed,
                    teardown.to_string(),
                    self.connections.context().clock().utc(),
                );
                Ok(completed.with_diagnostic(diagnostic))
            }
            Err(err) => {
                error!(
                    binding = %self.binding.id(),
                    error = %teardown,
                    "teardown failed after error"
                );
                Err(err)
            }
        }
    }
}

impl<S, R, C, V> Drop for ScopedBinding<'_, S, R, C, V>
where
    S: PortScheduler,
    R: CapabilityRegistry,
    C: Clock + Send + Sync,
    V: TransferValue,
{
    fn drop(&mut self) {
        if self.disconnected {
            return;
        }
        debug!(
            binding = %self.binding.id(),
            endpoint = %self.binding.target(),
            "disconnecting abandoned one-shot binding"
        );
        if let Err(err) = self.connections.disconnect(&mut self.binding) {
            error!(binding = %self.binding.id(), error = %err, "one-shot disconnect failed");
        }
    }
}
