//! Binding lifecycle and driver-context states.

use super::ParseBindingStateError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a binding visible to callers.
///
/// A binding that failed part-way through connect is never handed out, so
/// there is no half-initialised state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingState {
    /// Every mandatory capability is resolved; operations are accepted.
    Established,
    /// Teardown ran; the binding must not be reused.
    Released,
}

impl BindingState {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Established => "established",
            Self::Released => "released",
        }
    }

    /// Returns whether this state accepts read and write operations.
    #[must_use]
    pub const fn accepts_operations(self) -> bool {
        matches!(self, Self::Established)
    }
}

impl fmt::Display for BindingState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for BindingState {
    type Error = ParseBindingStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "established" => Ok(Self::Established),
            "released" => Ok(Self::Released),
            _ => Err(ParseBindingStateError(value.to_owned())),
        }
    }
}

/// Outcome of the optional driver-context setup performed at connect time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextState {
    /// No descriptor was supplied.
    NotRequested,
    /// A descriptor was supplied but the port has no driver user capability.
    Unsupported,
    /// A driver context was materialized and is attached to the binding.
    Attached,
    /// The capability exists but refused the descriptor.
    Failed,
}

impl ContextState {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotRequested => "not_requested",
            Self::Unsupported => "unsupported",
            Self::Attached => "attached",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ContextState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Direction of a single value transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferOperation {
    /// Value read from the device.
    Read,
    /// Value written to the device.
    Write,
}

impl TransferOperation {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}

impl fmt::Display for TransferOperation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Individual step of binding teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeardownStep {
    /// Destroy the materialized driver context.
    DetachDriverContext,
    /// Detach the binding from the port scheduler.
    UnbindAddress,
}

impl TeardownStep {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DetachDriverContext => "detach_driver_context",
            Self::UnbindAddress => "unbind_address",
        }
    }
}

impl fmt::Display for TeardownStep {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
