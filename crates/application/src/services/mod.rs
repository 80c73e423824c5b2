//! Application services - Use case implementations

mod emission_loop;
mod log_correlator;
mod span_guard;
mod tracing_emitter;

pub use emission_loop::{EmissionConfig, EmissionLoop, LoopProgress, LoopReport};
pub use log_correlator::{LogCorrelator, TICK_MESSAGE};
pub use span_guard::SpanGuard;
pub use tracing_emitter::{CHILD_SPANS, EmitterConfig, FanOut, ROOT_SPAN, TracingEmitter};
