//! Domain entities - Objects with identity and lifecycle

mod endpoint_set;
mod tick;

pub use endpoint_set::EndpointSet;
pub use tick::Tick;
