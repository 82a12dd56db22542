//! Domain model for synchronous port access.
//!
//! The broker domain models binding identity and targets, validated timeouts
//! and descriptors, capability kinds, lifecycle states and the diagnostics
//! recorded for non-fatal failures. Infrastructure concerns remain outside
//! this boundary.

mod capability;
mod context;
mod diagnostic;
mod error;
mod ids;
mod state;
mod target;
mod timeout;

pub use capability::CapabilityKind;
pub use context::{BindingContext, DriverContext};
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use error::{BrokerDomainError, ParseBindingStateError, ParseCapabilityKindError};
pub use ids::{BindingId, Descriptor, PortName};
pub use state::{BindingState, ContextState, TeardownStep, TransferOperation};
pub use target::BindingTarget;
pub use timeout::{MAX_TIMEOUT, Timeout};
