//! Application layer - Use cases and orchestration
//!
//! Contains the emission loop and the services it drives, plus the port
//! definitions for the collaborators it needs (random source, metrics
//! recorder, tracer). Infrastructure adapters implement the ports.

pub mod error;
pub mod ports;
pub mod services;
#[cfg(test)]
mod testing;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
