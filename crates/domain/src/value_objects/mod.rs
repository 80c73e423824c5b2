//! Value Objects - Immutable, identity-less domain primitives

mod endpoint;
mod histogram_buckets;
mod latency;
mod span_context;
mod temperature;

pub use endpoint::{Endpoint, InvalidEndpoint};
pub use histogram_buckets::HistogramBuckets;
pub use latency::{InvalidLatency, Latency};
pub use span_context::{SpanContext, SpanId, TraceId};
pub use temperature::Temperature;
