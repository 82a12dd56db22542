//! Synchronous access to addresses on shared ports.
//!
//! A caller binds to a (port, address) pair, discovers the capabilities the
//! address supports and then performs blocking reads and writes, each under
//! exclusive access that the port scheduler grants for a bounded time. The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
