//! In-memory port scheduler with real time-bounded exclusive access.

use crate::broker::{
    domain::{BindingId, BindingTarget, PortName, Timeout},
    ports::{PortScheduler, PortSchedulerError, PortSchedulerResult},
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::Instant;

/// Thread-safe in-memory port scheduler.
///
/// Ports are registered with an address count. Exclusive access is arbitrated
/// per (port, address) and waiting callers block on a condition variable, so
/// contention and timeouts behave like a real scheduler. Foreign holders
/// simulate other clients that never give access up.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPortScheduler {
    shared: Arc<SchedulerShared>,
}

#[derive(Debug, Default)]
struct SchedulerShared {
    state: Mutex<SchedulerState>,
    access_released: Condvar,
}

#[derive(Debug, Default)]
struct SchedulerState {
    ports: HashMap<PortName, PortEntry>,
    bindings: HashMap<BindingId, BindingTarget>,
    holders: HashMap<BindingTarget, AccessHolder>,
    failing_unbinds: HashSet<PortName>,
    failing_releases: HashSet<PortName>,
    acquire_requests: usize,
    release_requests: usize,
}

#[derive(Debug)]
struct PortEntry {
    address_count: i32,
    unreachable: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AccessHolder {
    Binding(BindingId),
    Foreign,
}

impl SchedulerState {
    fn target_of(&self, binding: BindingId) -> PortSchedulerResult<BindingTarget> {
        self.bindings
            .get(&binding)
            .cloned()
            .ok_or(PortSchedulerError::UnknownBinding(binding))
    }
}

impl InMemoryPortScheduler {
    /// Creates a scheduler with no ports.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_state(&self) -> PortSchedulerResult<MutexGuard<'_, SchedulerState>> {
        self.shared
            .state
            .lock()
            .map_err(|err| PortSchedulerError::runtime(std::io::Error::other(err.to_string())))
    }

    /// Registers a port serving addresses `0..address_count`.
    ///
    /// Re-registering a port replaces its address range and makes it
    /// reachable again.
    ///
    /// # Errors
    ///
    /// Returns scheduler runtime errors when lock acquisition fails.
    pub fn add_port(&self, port: PortName, address_count: i32) -> PortSchedulerResult<()> {
        let mut state = self.lock_state()?;
        state.ports.insert(
            port,
            PortEntry {
                address_count,
                unreachable: None,
            },
        );
        Ok(())
    }

    /// Marks a registered port as unreachable for new bindings.
    ///
    /// # Errors
    ///
    /// Returns [`PortSchedulerError::UnknownPort`] for unregistered ports and
    /// runtime errors when lock acquisition fails.
    pub fn set_unreachable(
        &self,
        port: &PortName,
        reason: impl Into<String>,
    ) -> PortSchedulerResult<()> {
        let mut state = self.lock_state()?;
        let entry = state
            .ports
            .get_mut(port)
            .ok_or_else(|| PortSchedulerError::UnknownPort(port.clone()))?;
        entry.unreachable = Some(reason.into().trim().to_owned());
        Ok(())
    }

    /// Grants exclusive access on `target` to a client outside this process.
    ///
    /// The foreign hold persists until [`Self::release_foreign`] is called.
    ///
    /// # Errors
    ///
    /// Returns [`PortSchedulerError::Rejected`] when another holder already
    /// owns the target and runtime errors when lock acquisition fails.
    pub fn hold_foreign(&self, target: BindingTarget) -> PortSchedulerResult<()> {
        let mut state = self.lock_state()?;
        if state.holders.contains_key(&target) {
            return Err(PortSchedulerError::Rejected(format!(
                "{target} is already held"
            )));
        }
        state.holders.insert(target, AccessHolder::Foreign);
        Ok(())
    }

    /// Ends a foreign hold and wakes waiting callers.
    ///
    /// # Errors
    ///
    /// Returns runtime errors when lock acquisition fails.
    pub fn release_foreign(&self, target: &BindingTarget) -> PortSchedulerResult<()> {
        let mut state = self.lock_state()?;
        if state.holders.get(target) == Some(&AccessHolder::Foreign) {
            state.holders.remove(target);
            self.shared.access_released.notify_all();
        }
        Ok(())
    }

    /// Makes every later unbind on `port` fail while still detaching the
    /// binding.
    ///
    /// # Errors
    ///
    /// Returns runtime errors when lock acquisition fails.
    pub fn fail_unbinds(&self, port: PortName) -> PortSchedulerResult<()> {
        self.lock_state()?.failing_unbinds.insert(port);
        Ok(())
    }

    /// Makes every later release on `port` fail and leaves access held.
    ///
    /// # Errors
    ///
    /// Returns runtime errors when lock acquisition fails.
    pub fn fail_releases(&self, port: PortName) -> PortSchedulerResult<()> {
        self.lock_state()?.failing_releases.insert(port);
        Ok(())
    }

    /// Returns the number of bindings currently attached to any port.
    ///
    /// # Errors
    ///
    /// Returns runtime errors when lock acquisition fails.
    pub fn outstanding_bindings(&self) -> PortSchedulerResult<usize> {
        Ok(self.lock_state()?.bindings.len())
    }

    /// Returns the number of targets currently held by bindings.
    ///
    /// Foreign holds are not counted.
    ///
    /// # Errors
    ///
    /// Returns runtime errors when lock acquisition fails.
    pub fn held_locks(&self) -> PortSchedulerResult<usize> {
        Ok(self
            .lock_state()?
            .holders
            .values()
            .filter(|holder| matches!(holder, AccessHolder::Binding(_)))
            .count())
    }

    /// Returns how many acquire requests have been received.
    ///
    /// # Errors
    ///
    /// Returns runtime errors when lock acquisition fails.
    pub fn acquire_requests(&self) -> PortSchedulerResult<usize> {
        Ok(self.lock_state()?.acquire_requests)
    }

    /// Returns how many release requests have been received.
    ///
    /// # Errors
    ///
    /// Returns runtime errors when lock acquisition fails.
    pub fn release_requests(&self) -> PortSchedulerResult<usize> {
        Ok(self.lock_state()?.release_requests)
    }
}

impl PortScheduler for InMemoryPortScheduler {
    fn bind_address(&self, binding: BindingId, target: &BindingTarget) -> PortSchedulerResult<()> {
        let mut state = self.lock_state()?;
        let entry = state
            .ports
            .get(target.port())
            .ok_or_else(|| PortSchedulerError::UnknownPort(target.port().clone()))?;

        if let Some(reason) = &entry.unreachable {
            return Err(PortSchedulerError::Unreachable {
                port: target.port().clone(),
                reason: reason.clone(),
            });
        }

        if !(0..entry.address_count).contains(&target.address()) {
            return Err(PortSchedulerError::AddressOutOfRange {
                port: target.port().clone(),
                address: target.address(),
            });
        }

        state.bindings.insert(binding, target.clone());
        Ok(())
    }

    fn unbind_address(&self, binding: BindingId) -> PortSchedulerResult<()> {
        let mut state = self.lock_state()?;
        let target = state
            .bindings
            .remove(&binding)
            .ok_or(PortSchedulerError::UnknownBinding(binding))?;

        if state.holders.get(&target) == Some(&AccessHolder::Binding(binding)) {
            state.holders.remove(&target);
            self.shared.access_released.notify_all();
        }

        if state.failing_unbinds.contains(target.port()) {
            return Err(PortSchedulerError::Rejected(format!(
                "unbind of {target} failed"
            )));
        }
        Ok(())
    }

    fn acquire_exclusive(&self, binding: BindingId, timeout: Timeout) -> PortSchedulerResult<()> {
        let deadline = Instant::now() + timeout.as_duration();
        let mut state = self.lock_state()?;
        state.acquire_requests += 1;
        let target = state.target_of(binding)?;

        loop {
            match state.holders.get(&target).copied() {
                None => {
                    state.holders.insert(target, AccessHolder::Binding(binding));
                    return Ok(());
                }
                Some(AccessHolder::Binding(holder)) if holder == binding => {
                    return Err(PortSchedulerError::AlreadyHeld(binding));
                }
                Some(_) => {}
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(PortSchedulerError::Timeout { target, timeout });
            }

            let (guard, _) = self
                .shared
                .access_released
                .wait_timeout(state, remaining)
                .map_err(|err| {
                    PortSchedulerError::runtime(std::io::Error::other(err.to_string()))
                })?;
            state = guard;
        }
    }

    fn release_exclusive(&self, binding: BindingId) -> PortSchedulerResult<()> {
        let mut state = self.lock_state()?;
        state.release_requests += 1;
        let target = state.target_of(binding)?;

        if state.holders.get(&target) != Some(&AccessHolder::Binding(binding)) {
            return Err(PortSchedulerError::NotHeld(binding));
        }

        if state.failing_releases.contains(target.port()) {
            return Err(PortSchedulerError::Rejected(format!(
                "release of {target} failed"
            )));
        }

        state.holders.remove(&target);
        self.shared.access_released.notify_all();
        Ok(())
    }
}
