//! Error types for broker domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing broker domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BrokerDomainError {
    /// The port name is empty after trimming.
    #[error("port name must not be empty")]
    EmptyPortName,

    /// The port name contains whitespace.
    #[error("port name '{0}' must not contain whitespace")]
    InvalidPortName(String),

    /// The port name exceeds the 64-character limit.
    #[error("port name exceeds 64 character limit: {0}")]
    PortNameTooLong(String),

    /// The driver descriptor is empty after trimming.
    #[error("driver descriptor must not be empty when provided")]
    EmptyDescriptor,

    /// The timeout is negative or not a finite number of seconds.
    #[error("timeout must be a finite, non-negative number of seconds: {0}")]
    InvalidTimeout(String),

    /// The timeout exceeds the one-day ceiling.
    #[error("timeout exceeds the one day limit: {0}")]
    TimeoutTooLong(String),
}

/// Error returned while parsing binding state from its string form.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown binding state: {0}")]
pub struct ParseBindingStateError(pub String);

/// Error returned while parsing a capability kind from its string form.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown capability kind: {0}")]
pub struct ParseCapabilityKindError(pub String);
