//! Adapter implementations for the broker's scheduler and registry ports.

pub mod memory;
