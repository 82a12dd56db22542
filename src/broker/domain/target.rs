//! The (port, address) pair a binding connects to.

use super::PortName;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A port-local address on a named port.
///
/// Many bindings may share one target; the port scheduler arbitrates
/// exclusive access per target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BindingTarget {
    port: PortName,
    address: i32,
}

impl BindingTarget {
    /// Creates a target from a validated port name and an address.
    #[must_use]
    pub const fn new(port: PortName, address: i32) -> Self {
        Self { port, address }
    }

    /// Returns the port name.
    #[must_use]
    pub const fn port(&self) -> &PortName {
        &self.port
    }

    /// Returns the port-local address.
    #[must_use]
    pub const fn address(&self) -> i32 {
        self.address
    }
}

impl fmt::Display for BindingTarget {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "port {} address {}", self.port, self.address)
    }
}
