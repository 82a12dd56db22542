//! In-memory adapters for deterministic local flows and tests.

mod device;
mod registry;
mod scheduler;

pub use device::EchoDevice;
pub use registry::InMemoryCapabilityRegistry;
pub use scheduler::InMemoryPortScheduler;
