//! Syncport: synchronous access broker for shared ports.
//!
//! Many clients share a port whose addresses are served by drivers. This
//! crate lets a client bind to one address, discover what the driver there
//! supports and perform blocking value transfers without interfering with
//! other clients of the same port.
//!
//! # Architecture
//!
//! Syncport follows hexagonal architecture principles:
//!
//! - **Domain**: Pure value types and state with no infrastructure dependencies
//! - **Ports**: Trait interfaces for the port scheduler, capability registry
//!   and capabilities
//! - **Adapters**: In-memory implementations of the ports
//! - **Services**: Connection lifecycle, synchronous executor and one-shot
//!   facade
//!
//! # Modules
//!
//! - [`broker`]: Binding lifecycle and bounded synchronous transfers

pub mod broker;
