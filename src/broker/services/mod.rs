//! Broker services: connection lifecycle, synchronous transfers and the
//! one-shot facade, all built from an explicit [`BrokerContext`].

mod access;
mod binding;
mod config;
mod connection;
mod context;
mod error;
mod executor;
mod one_shot;

pub use binding::Binding;
pub use config::BrokerConfig;
pub use connection::ConnectionManager;
pub use context::BrokerContext;
pub use error::{BrokerError, BrokerResult, TeardownFailure};
pub use executor::{Completed, SyncExecutor};
pub use one_shot::OneShot;
