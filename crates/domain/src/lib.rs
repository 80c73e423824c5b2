//! Domain layer for telegen
//!
//! Contains the vocabulary of one synthetic unit of work: ticks, endpoints,
//! latencies, trace correlation handles and histogram bucket layouts.
//! This layer has no runtime dependencies and performs no I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
