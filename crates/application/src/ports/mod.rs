//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod metrics_recorder;
mod random_source;
mod tracer_port;

#[cfg(test)]
pub use metrics_recorder::MockMetricsRecorder;
pub use metrics_recorder::MetricsRecorder;
#[cfg(test)]
pub use random_source::MockRandomSource;
pub use random_source::RandomSource;
pub use tracer_port::{ActiveSpan, TracerPort};
