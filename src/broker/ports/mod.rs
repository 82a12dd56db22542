//! Port contracts for the broker's external collaborators.

mod capability;
mod registry;
mod scheduler;

pub use capability::{
    CapabilityError, CapabilityHandle, CapabilityResult, DriverUserCapability,
    LifecycleCapability, TransferValue, ValueTransfer,
};
pub use registry::CapabilityRegistry;
pub use scheduler::{PortScheduler, PortSchedulerError, PortSchedulerResult};
