//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer.
//! Contains the OTLP tracer, the Prometheus registry, the seeded random
//! source, the log sinks and configuration loading.

pub mod config;
pub mod logging;
pub mod metrics;
pub mod random;
pub mod telemetry;

pub use self::config::{AppConfig, EmissionAppConfig, LoggingConfig, ServerConfig};
pub use logging::{LoggingGuard, RotatingFileWriter, RotationPolicy, init_logging};
pub use self::metrics::{MetricsError, PrometheusMetrics};
pub use random::SeededRandomSource;
pub use telemetry::{OtelTracer, TelemetryConfig, TelemetryError, TelemetryGuard, init_tracer};
