//! Identifier and validated-name types for port bindings.

use super::BrokerDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Maximum length for a port name.
const MAX_PORT_NAME_LENGTH: usize = 64;

/// Unique identifier for one binding between a caller and a port address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BindingId(Uuid);

impl BindingId {
    /// Creates a new random binding identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a binding identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for BindingId {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<Uuid> for BindingId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for BindingId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Validated name of a communication port.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortName(String);

impl PortName {
    /// Creates a validated port name.
    ///
    /// Surrounding whitespace is trimmed. Port names are case-sensitive.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerDomainError`] when the name is empty, contains
    /// whitespace, or is longer than 64 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, BrokerDomainError> {
        let normalized = value.into().trim().to_owned();

        if normalized.is_empty() {
            return Err(BrokerDomainError::EmptyPortName);
        }

        if normalized.chars().any(char::is_whitespace) {
            return Err(BrokerDomainError::InvalidPortName(normalized));
        }

        if normalized.chars().count() > MAX_PORT_NAME_LENGTH {
            return Err(BrokerDomainError::PortNameTooLong(normalized));
        }

        Ok(Self(normalized))
    }

    /// Returns the port name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PortName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for PortName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Opaque driver configuration string supplied at connect time.
///
/// The broker never interprets a descriptor; it only hands it to the driver
/// user capability, which may select a sub-channel or unit conversion from
/// it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Descriptor(String);

impl Descriptor {
    /// Creates a descriptor from caller input.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerDomainError::EmptyDescriptor`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, BrokerDomainError> {
        let normalized = value.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(BrokerDomainError::EmptyDescriptor);
        }
        Ok(Self(normalized))
    }

    /// Returns the descriptor as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Descriptor {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
