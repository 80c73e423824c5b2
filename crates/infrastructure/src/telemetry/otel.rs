//! OpenTelemetry initialization and configuration
//!
//! Sets up the trace pipeline: OTLP/gRPC exporter (plaintext), batch span
//! processor, `service.name` resource. The collector is probed once at
//! startup; whether an unreachable collector is fatal is configurable.

use std::time::Duration;

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource,
    trace::{BatchConfigBuilder, BatchSpanProcessor, SdkTracerProvider},
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpStream;
use tracing::{debug, error, info, warn};

use super::tracer::OtelTracer;

/// Port assumed when the collector endpoint does not name one
const DEFAULT_OTLP_GRPC_PORT: u16 = 4317;

/// Configuration for trace export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// OTLP endpoint URL (e.g., "http://localhost:4317" for gRPC)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Service name for traces
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Export timeout in seconds
    #[serde(default = "default_export_timeout")]
    pub export_timeout_secs: u64,

    /// Startup reachability probe timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Maximum batch size for trace export
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,

    /// Log level filter (e.g., "debug", "telegen=debug,h2=info")
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Whether an unreachable collector at startup aborts the process
    ///
    /// When `false`, the generator keeps running and the batch processor
    /// drops what it cannot export.
    #[serde(default = "default_require_collector")]
    pub require_collector: bool,
}

const fn default_export_timeout() -> u64 {
    10
}

const fn default_connect_timeout() -> u64 {
    5
}

const fn default_max_batch_size() -> usize {
    512
}

fn default_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_service_name() -> String {
    "telegen".to_string()
}

fn default_log_filter() -> String {
    "debug,h2=info,hyper=info,hyper_util=info,tonic=info,tower=info".to_string()
}

const fn default_require_collector() -> bool {
    true
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            service_name: default_service_name(),
            export_timeout_secs: default_export_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            max_batch_size: default_max_batch_size(),
            log_filter: default_log_filter(),
            require_collector: default_require_collector(),
        }
    }
}

/// Guard that shuts down the tracer provider when dropped
///
/// Shutting down flushes the spans still buffered in the batch processor.
pub struct TelemetryGuard {
    provider: Option<SdkTracerProvider>,
    tracer: OtelTracer,
}

impl std::fmt::Debug for TelemetryGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryGuard")
            .field("active", &self.provider.is_some())
            .finish_non_exhaustive()
    }
}

impl TelemetryGuard {
    /// Wrap an already built provider
    pub fn from_provider(provider: SdkTracerProvider, service_name: &str) -> Self {
        let tracer = OtelTracer::new(provider.tracer(service_name.to_string()));
        Self {
            provider: Some(provider),
            tracer,
        }
    }

    /// Tracer adapter for the emission loop
    ///
    /// Clones share one registry of open spans, so a parent started through
    /// one clone is a local parent for children started through another.
    #[must_use]
    pub fn tracer(&self) -> OtelTracer {
        self.tracer.clone()
    }

    /// Flush buffered spans and stop the exporter
    pub fn shutdown(mut self) -> Result<(), TelemetryError> {
        match self.provider.take() {
            Some(provider) => provider
                .shutdown()
                .map_err(|e| TelemetryError::Shutdown(e.to_string())),
            None => Ok(()),
        }
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take() {
            if let Err(e) = provider.shutdown() {
                error!(error = %e, "Failed to shutdown tracer provider");
            }
        }
    }
}

/// Initialize the trace pipeline with the given configuration
///
/// Returns a guard that must be kept alive for the duration of the application.
/// When the guard is dropped, the tracer provider is shut down and pending
/// spans are flushed. Must be called from within a multi-threaded Tokio
/// runtime.
///
/// # Example
///
/// ```ignore
/// use infrastructure::telemetry::{TelemetryConfig, init_tracer};
///
/// #[tokio::main]
/// async fn main() {
///     let guard = init_tracer(&TelemetryConfig::default()).await?;
///     let tracer = guard.tracer();
///     // Application code...
/// }
/// ```
pub async fn init_tracer(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let connect_timeout = Duration::from_secs(config.connect_timeout_secs);
    match probe_collector(&config.endpoint, connect_timeout).await {
        Ok(()) => debug!(endpoint = %config.endpoint, "Trace collector reachable"),
        Err(e) if config.require_collector => return Err(e),
        Err(e) => warn!(
            error = %e,
            "Trace collector unreachable, continuing without a confirmed exporter"
        ),
    }

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&config.endpoint)
        .with_timeout(Duration::from_secs(config.export_timeout_secs))
        .build()
        .map_err(|e| TelemetryError::Exporter(e.to_string()))?;

    let processor = BatchSpanProcessor::builder(exporter)
        .with_batch_config(
            BatchConfigBuilder::default()
                .with_max_export_batch_size(config.max_batch_size)
                .build(),
        )
        .build();

    let resource = Resource::builder()
        .with_service_name(config.service_name.clone())
        .build();

    let provider = SdkTracerProvider::builder()
        .with_span_processor(processor)
        .with_resource(resource)
        .build();

    info!(
        endpoint = %config.endpoint,
        service = %config.service_name,
        batch = config.max_batch_size,
        "Telemetry initialized with OTLP export"
    );

    Ok(TelemetryGuard::from_provider(provider, &config.service_name))
}

/// `host:port` of an OTLP endpoint URL
///
/// The scheme and any path are stripped; the default OTLP/gRPC port is
/// assumed when none is given.
pub fn collector_address(endpoint: &str) -> Result<String, TelemetryError> {
    let without_scheme = endpoint
        .split_once("://")
        .map_or(endpoint, |(_, rest)| rest);
    let authority = without_scheme.split('/').next().unwrap_or_default().trim();

    if authority.is_empty() {
        return Err(TelemetryError::Init(format!(
            "collector endpoint '{endpoint}' has no host"
        )));
    }

    let has_port = authority
        .rsplit_once(':')
        .is_some_and(|(_, port)| port.parse::<u16>().is_ok());
    if has_port {
        Ok(authority.to_string())
    } else {
        Ok(format!("{authority}:{DEFAULT_OTLP_GRPC_PORT}"))
    }
}

/// Check that something accepts TCP connections at the collector endpoint
pub async fn probe_collector(endpoint: &str, timeout: Duration) -> Result<(), TelemetryError> {
    let address = collector_address(endpoint)?;
    let unreachable = |reason: String| TelemetryError::Unreachable {
        endpoint: endpoint.to_string(),
        reason,
    };

    match tokio::time::timeout(timeout, TcpStream::connect(&address)).await {
        Ok(Ok(_stream)) => Ok(()),
        Ok(Err(e)) => Err(unreachable(e.to_string())),
        Err(_) => Err(unreachable(format!(
            "no connection to {address} within {}ms",
            timeout.as_millis()
        ))),
    }
}

/// Error type for telemetry initialization
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Failed to initialize tracing
    #[error("Failed to initialize tracing: {0}")]
    Init(String),

    /// Failed to create OTLP exporter
    #[error("Failed to create OTLP exporter: {0}")]
    Exporter(String),

    /// Collector did not accept a connection at startup
    #[error("Trace collector at {endpoint} is unreachable: {reason}")]
    Unreachable { endpoint: String, reason: String },

    /// Log file could not be opened
    #[error("Failed to open log file: {0}")]
    LogFile(String),

    /// Provider shutdown reported an error
    #[error("Failed to shutdown tracer provider: {0}")]
    Shutdown(String),
}
