//! Capability provider implementations.

pub mod cohere;
pub mod mock;
