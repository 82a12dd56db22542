//! Step definitions for the synchronous broker behaviour suite.

pub mod given;
pub mod then;
pub mod world;
