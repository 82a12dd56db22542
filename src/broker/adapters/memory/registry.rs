//! In-memory capability registry keyed by port.

use crate::broker::{
    domain::{BindingContext, CapabilityKind, PortName},
    ports::{CapabilityHandle, CapabilityRegistry},
};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Thread-safe in-memory capability registry.
///
/// Every address on a port shares the port's capability table, which mirrors
/// how a port driver registers its interfaces once for all addresses.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCapabilityRegistry {
    state: Arc<RwLock<HashMap<PortName, Vec<CapabilityHandle>>>>,
}

impl InMemoryCapabilityRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handle` for `port`, replacing any handle of the same kind.
    pub fn register(&self, port: PortName, handle: CapabilityHandle) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let handles = state.entry(port).or_default();
        handles.retain(|existing| existing.kind() != handle.kind());
        handles.push(handle);
    }

    /// Registers every handle in `handles` for `port`.
    pub fn register_all(
        &self,
        port: &PortName,
        handles: impl IntoIterator<Item = CapabilityHandle>,
    ) {
        for handle in handles {
            self.register(port.clone(), handle);
        }
    }

    /// Removes the handle of `kind` from `port`.
    ///
    /// Returns whether a handle was removed.
    #[must_use]
    pub fn withdraw(&self, port: &PortName, kind: CapabilityKind) -> bool {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let Some(handles) = state.get_mut(port) else {
            return false;
        };
        let before = handles.len();
        handles.retain(|existing| existing.kind() != kind);
        handles.len() != before
    }

    /// Returns the kinds registered for `port`.
    #[must_use]
    pub fn kinds(&self, port: &PortName) -> Vec<CapabilityKind> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state
            .get(port)
            .map(|handles| handles.iter().map(CapabilityHandle::kind).collect())
            .unwrap_or_default()
    }
}

impl CapabilityRegistry for InMemoryCapabilityRegistry {
    fn find_capability(
        &self,
        context: &BindingContext,
        kind: CapabilityKind,
    ) -> Option<CapabilityHandle> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state
            .get(context.target().port())?
            .iter()
            .find(|handle| handle.kind() == kind)
            .cloned()
    }
}
