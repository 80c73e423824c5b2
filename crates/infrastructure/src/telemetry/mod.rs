//! Telemetry and distributed tracing infrastructure
//!
//! Provides the OTLP/gRPC trace pipeline and the [`OtelTracer`] adapter the
//! emission loop starts its spans through.

mod otel;
mod tracer;

pub use otel::{
    TelemetryConfig, TelemetryError, TelemetryGuard, collector_address, init_tracer,
    probe_collector,
};
pub use tracer::OtelTracer;
