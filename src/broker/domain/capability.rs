//! Capability kinds a binding may discover.

use super::ParseCapabilityKindError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of typed operation set a port address may support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityKind {
    /// Common lifecycle operations every binding needs.
    Lifecycle,
    /// Transfer of 64-bit floating point values.
    Float64,
    /// Transfer of 32-bit signed integer values.
    Int32,
    /// Optional driver-defined user context keyed by a descriptor.
    DriverUser,
}

impl CapabilityKind {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lifecycle => "lifecycle",
            Self::Float64 => "float64",
            Self::Int32 => "int32",
            Self::DriverUser => "driver_user",
        }
    }

    /// Returns whether a binding cannot be established without this kind.
    #[must_use]
    pub const fn is_mandatory(self) -> bool {
        !matches!(self, Self::DriverUser)
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for CapabilityKind {
    type Error = ParseCapabilityKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "lifecycle" => Ok(Self::Lifecycle),
            "float64" => Ok(Self::Float64),
            "int32" => Ok(Self::Int32),
            "driver_user" => Ok(Self::DriverUser),
            _ => Err(ParseCapabilityKindError(value.to_owned())),
        }
    }
}
