//! Capability registry port used for discovery at connect time.

use super::CapabilityHandle;
use crate::broker::domain::{BindingContext, CapabilityKind};

/// Lookup of the capabilities a bound port address supports.
///
/// Discovery is a pure query; the registry owns no per-binding state, so
/// nothing needs releasing when a binding is torn down.
pub trait CapabilityRegistry: Send + Sync {
    /// Returns the capability of `kind` available to `context`, if any.
    fn find_capability(
        &self,
        context: &BindingContext,
        kind: CapabilityKind,
    ) -> Option<CapabilityHandle>;
}
