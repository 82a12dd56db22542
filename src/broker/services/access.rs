//! Scoped guards that pair scheduler requests with their release.

use super::{BrokerError, BrokerResult, TeardownFailure};
use crate::broker::{
    domain::{BindingContext, BindingId, TeardownStep},
    ports::{DriverUserCapability, PortScheduler, PortSchedulerResult},
};
use tracing::{debug, error};

/// Exclusive access held by one binding.
///
/// [`Self::release`] reports the scheduler's answer; if the guard is dropped
/// instead (for example while a transfer unwinds) the release still happens
/// and any failure is logged.
pub(crate) struct ExclusiveAccess<'a, S: PortScheduler + ?Sized> {
    scheduler: &'a S,
    binding: BindingId,
    released: bool,
}

impl<'a, S: PortScheduler + ?Sized> ExclusiveAccess<'a, S> {
    /// Wraps access the scheduler has already granted to `binding`.
    pub(crate) const fn granted(scheduler: &'a S, binding: BindingId) -> Self {
        Self {
            scheduler,
            binding,
            released: false,
        }
    }

    pub(crate) fn release(mut self) -> PortSchedulerResult<()> {
        self.released = true;
        self.scheduler.release_exclusive(self.binding)
    }
}

impl<S: PortScheduler + ?Sized> Drop for ExclusiveAccess<'_, S> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(err) = self.scheduler.release_exclusive(self.binding) {
            error!(binding = %self.binding, error = %err, "unlock after abandoned transfer failed");
        }
    }
}

/// Address binding that is undone unless setup completes.
///
/// Connect holds one of these while it discovers mandatory capabilities, so
/// every early return rolls back through the same teardown as disconnect.
pub(crate) struct PendingBinding<'a, S: PortScheduler + ?Sized> {
    scheduler: &'a S,
    context: &'a BindingContext,
    armed: bool,
}

impl<'a, S: PortScheduler + ?Sized> PendingBinding<'a, S> {
    /// Guards a context whose address the scheduler has already bound.
    pub(crate) const fn bound(scheduler: &'a S, context: &'a BindingContext) -> Self {
        Self {
            scheduler,
            context,
            armed: true,
        }
    }

    /// Keeps the binding; the caller now owns its teardown.
    pub(crate) fn commit(mut self) {
        self.armed = false;
    }
}

impl<S: PortScheduler + ?Sized> Drop for PendingBinding<'_, S> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        debug!(
            binding = %self.context.id(),
            endpoint = %self.context.target(),
            "rolling back partial connect"
        );
        if let Err(err) = tear_down(self.scheduler, self.context, None) {
            error!(binding = %self.context.id(), error = %err, "connect rollback failed");
        }
    }
}

/// Collects teardown failures while letting every step run.
#[derive(Default)]
struct TeardownLog {
    first: Option<(TeardownStep, TeardownFailure)>,
    additional_failures: usize,
}

impl TeardownLog {
    fn capture(&mut self, context: &BindingContext, step: TeardownStep, failure: TeardownFailure) {
        error!(
            binding = %context.id(),
            endpoint = %context.target(),
            step = %step,
            error = %failure,
            "teardown step failed"
        );
        if self.first.is_none() {
            self.first = Some((step, failure));
        } else {
            self.additional_failures += 1;
        }
    }

    fn finish(self, context: &BindingContext) -> BrokerResult<()> {
        match self.first {
            None => Ok(()),
            Some((step, source)) => Err(BrokerError::TeardownPartialFailure {
                target: context.target().clone(),
                step,
                source,
                additional_failures: self.additional_failures,
            }),
        }
    }
}

/// Runs every teardown step for `context` and returns the first failure.
pub(crate) fn tear_down<S: PortScheduler + ?Sized>(
    scheduler: &S,
    context: &BindingContext,
    driver_user: Option<&dyn DriverUserCapability>,
) -> BrokerResult<()> {
    let mut log = TeardownLog::default();

    if let Some((capability, driver_context)) = driver_user.zip(context.driver_context())
        && let Err(err) = capability.dematerialize(context, driver_context)
    {
        log.capture(context, TeardownStep::DetachDriverContext, err.into());
    }

    if let Err(err) = scheduler.unbind_address(context.id()) {
        log.capture(context, TeardownStep::UnbindAddress, err.into());
    }

    log.finish(context)
}
