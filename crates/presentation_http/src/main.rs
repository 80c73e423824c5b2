//! Telegen server
//!
//! Emits correlated logs, metrics and traces on a fixed tick and serves the
//! metric registry for Prometheus to scrape.

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use application::{EmissionLoop, MetricsRecorder, SpanGuard, TracerPort};
use clap::Parser;
use domain::value_objects::SpanContext;
use infrastructure::{PrometheusMetrics, SeededRandomSource, init_logging, init_tracer};
use presentation_http::{Cli, routes, spawn_emission_task, state::AppState};
use tokio::{net::TcpListener, signal, sync::watch};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Name of the span wrapping the whole process lifetime
const MAIN_SPAN: &str = "main";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = cli.load_config().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    // Initialize logging; the guard flushes the file writer when dropped
    let logging_guard = init_logging(&config.logging, &config.telemetry.log_filter)
        .context("Failed to initialize logging")?;

    let addr = config.server.bind_address();
    info!("📡 Telegen v{} starting...", env!("CARGO_PKG_VERSION"));
    info!(
        metrics_url = %format!("http://{addr}/metrics"),
        collector = %config.telemetry.endpoint,
        service = %config.telemetry.service_name,
        "Configuration loaded"
    );

    // Tracing pipeline; an unreachable collector aborts startup
    let telemetry = init_tracer(&config.telemetry)
        .await
        .context("Failed to initialize trace export")?;
    let tracer: Arc<dyn TracerPort> = Arc::new(telemetry.tracer());

    let main_span = config
        .emission
        .trace_root
        .then(|| SpanGuard::start(tracer.as_ref(), MAIN_SPAN, &SpanContext::empty()));
    let root_context = main_span
        .as_ref()
        .map_or_else(SpanContext::empty, SpanGuard::context);

    // Metrics registry shared by the loop and the scrape handler
    let metrics = Arc::new(
        PrometheusMetrics::with_default_buckets().context("Failed to build metric registry")?,
    );

    let random = Arc::new(SeededRandomSource::new(config.emission.seed));
    if let Some(seed) = config.emission.seed {
        info!(seed, "Using seeded random source");
    }

    let emission_loop = EmissionLoop::new(
        config.emission_config()?,
        random,
        Arc::clone(&metrics) as Arc<dyn MetricsRecorder>,
        Arc::clone(&tracer),
    )?
    .with_root_context(root_context);

    let state = AppState::new(Arc::clone(&metrics), emission_loop.progress());
    let app = routes::create_router(state).layer(TraceLayer::new_for_http());

    // Bind before starting the loop so a taken port fails fast
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind metrics server to {addr}"))?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let emission_handle = spawn_emission_task(emission_loop, shutdown_rx);

    info!("🚀 Serving metrics on http://{}/metrics", addr);

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
        .await;

    // Stop the loop whether the server exited cleanly or not
    let _ = shutdown_tx.send(true);
    match tokio::time::timeout(shutdown_timeout, emission_handle).await {
        Ok(Ok(report)) => info!(
            ticks = report.ticks,
            next_iteration = report.next_iteration,
            "Emission loop finished"
        ),
        Ok(Err(e)) => error!(error = %e, "Emission task failed"),
        Err(_) => warn!(?shutdown_timeout, "Emission loop did not stop in time"),
    }

    // The loop returns only after its last detached child spans have ended,
    // so flushing now exports the whole final tick
    if let Some(span) = main_span {
        span.end();
    }
    if let Err(e) = telemetry.shutdown() {
        error!(error = %e, "Failed to flush spans");
    }

    served.context("Metrics server failed")?;
    info!("👋 Shutdown complete");
    drop(logging_guard);

    Ok(())
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        // Log error but continue waiting - this is a best-effort signal handler
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("📥 Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("📥 Received SIGTERM, initiating graceful shutdown...");
        }
    }

    info!("⏳ Waiting up to {:?} for the current tick to finish...", timeout);
}
