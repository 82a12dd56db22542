//! In-memory device that echoes the last value written to each address.

use crate::broker::{
    domain::{BindingContext, Descriptor, DriverContext},
    ports::{
        CapabilityError, CapabilityHandle, CapabilityResult, DriverUserCapability,
        LifecycleCapability, ValueTransfer,
    },
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// In-memory device implementing every capability kind.
///
/// Values are stored per (address, driver reason), so bindings that select
/// different sub-channels through their descriptor never observe each
/// other's writes. Reading a slot that was never written yields the type's
/// default value.
#[derive(Debug, Clone, Default)]
pub struct EchoDevice {
    state: Arc<Mutex<EchoState>>,
}

#[derive(Debug, Default)]
struct EchoState {
    float64_values: HashMap<(i32, i32), f64>,
    int32_values: HashMap<(i32, i32), i32>,
    channels: HashMap<Descriptor, i32>,
    live_contexts: usize,
    transfer_count: usize,
    transfer_failure: Option<String>,
    dematerialize_failure: Option<String>,
}

impl EchoDevice {
    /// Creates a device with no channels and no stored values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_state(&self) -> CapabilityResult<MutexGuard<'_, EchoState>> {
        self.state
            .lock()
            .map_err(|err| CapabilityError::runtime(std::io::Error::other(err.to_string())))
    }

    /// Returns handles for all four capability kinds backed by this device.
    #[must_use]
    pub fn handles(&self) -> Vec<CapabilityHandle> {
        let device = Arc::new(self.clone());
        vec![
            CapabilityHandle::Lifecycle(device.clone()),
            CapabilityHandle::Float64(device.clone()),
            CapabilityHandle::Int32(device.clone()),
            CapabilityHandle::DriverUser(device),
        ]
    }

    /// Declares a descriptor the driver accepts and the sub-channel it maps to.
    ///
    /// # Errors
    ///
    /// Returns capability runtime errors when lock acquisition fails.
    pub fn define_channel(&self, descriptor: Descriptor, reason: i32) -> CapabilityResult<()> {
        self.lock_state()?.channels.insert(descriptor, reason);
        Ok(())
    }

    /// Makes every later read and write fail with `message`.
    ///
    /// # Errors
    ///
    /// Returns capability runtime errors when lock acquisition fails.
    pub fn fail_transfers(&self, message: impl Into<String>) -> CapabilityResult<()> {
        self.lock_state()?.transfer_failure = Some(message.into());
        Ok(())
    }

    /// Makes every later dematerialize fail with `message`.
    ///
    /// # Errors
    ///
    /// Returns capability runtime errors when lock acquisition fails.
    pub fn fail_dematerialize(&self, message: impl Into<String>) -> CapabilityResult<()> {
        self.lock_state()?.dematerialize_failure = Some(message.into());
        Ok(())
    }

    /// Returns how many transfers were attempted, including failed ones.
    ///
    /// # Errors
    ///
    /// Returns capability runtime errors when lock acquisition fails.
    pub fn transfer_count(&self) -> CapabilityResult<usize> {
        Ok(self.lock_state()?.transfer_count)
    }

    /// Returns how many driver contexts are currently materialized.
    ///
    /// # Errors
    ///
    /// Returns capability runtime errors when lock acquisition fails.
    pub fn live_contexts(&self) -> CapabilityResult<usize> {
        Ok(self.lock_state()?.live_contexts)
    }

    fn begin_transfer(&self) -> CapabilityResult<MutexGuard<'_, EchoState>> {
        let mut state = self.lock_state()?;
        state.transfer_count += 1;
        if let Some(message) = &state.transfer_failure {
            return Err(CapabilityError::device(message.clone()));
        }
        Ok(state)
    }
}

fn slot(context: &BindingContext) -> (i32, i32) {
    (context.target().address(), context.reason())
}

impl LifecycleCapability for EchoDevice {
    fn report(&self, context: &BindingContext) -> String {
        match self.lock_state() {
            Ok(state) => format!(
                "echo device serving {}: {} stored values, {} driver contexts",
                context.target(),
                state.float64_values.len() + state.int32_values.len(),
                state.live_contexts
            ),
            Err(err) => format!("echo device serving {}: {err}", context.target()),
        }
    }
}

impl ValueTransfer<f64> for EchoDevice {
    fn write(&self, context: &BindingContext, value: f64) -> CapabilityResult<()> {
        self.begin_transfer()?
            .float64_values
            .insert(slot(context), value);
        Ok(())
    }

    fn read(&self, context: &BindingContext) -> CapabilityResult<f64> {
        let state = self.begin_transfer()?;
        Ok(state
            .float64_values
            .get(&slot(context))
            .copied()
            .unwrap_or_default())
    }
}

impl ValueTransfer<i32> for EchoDevice {
    fn write(&self, context: &BindingContext, value: i32) -> CapabilityResult<()> {
        self.begin_transfer()?
            .int32_values
            .insert(slot(context), value);
        Ok(())
    }

    fn read(&self, context: &BindingContext) -> CapabilityResult<i32> {
        let state = self.begin_transfer()?;
        Ok(state
            .int32_values
            .get(&slot(context))
            .copied()
            .unwrap_or_default())
    }
}

impl DriverUserCapability for EchoDevice {
    fn materialize(
        &self,
        _context: &BindingContext,
        descriptor: &Descriptor,
    ) -> CapabilityResult<DriverContext> {
        let mut state = self.lock_state()?;
        let reason = *state
            .channels
            .get(descriptor)
            .ok_or_else(|| CapabilityError::UnknownDescriptor(descriptor.clone()))?;
        state.live_contexts += 1;
        Ok(DriverContext::new(descriptor.clone(), reason))
    }

    fn dematerialize(
        &self,
        _context: &BindingContext,
        _driver_context: &DriverContext,
    ) -> CapabilityResult<()> {
        let mut state = self.lock_state()?;
        if let Some(message) = &state.dematerialize_failure {
            return Err(CapabilityError::device(message.clone()));
        }
        state.live_contexts = state.live_contexts.saturating_sub(1);
        Ok(())
    }
}
