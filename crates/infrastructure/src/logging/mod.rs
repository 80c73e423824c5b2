//! Log sinks
//!
//! Two sinks share one `tracing` subscriber:
//! - console, human-readable, DEBUG and above by default
//! - file, one JSON object per line, INFO and above by default, written
//!   through a non-blocking appender into a [`RotatingFileWriter`]
//!
//! A global `EnvFilter` (`RUST_LOG`, falling back to the configured filter)
//! applies in front of both.

mod rotating;

pub use rotating::{RotatingFileWriter, RotationPolicy};

use tracing::{Subscriber, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, fmt, fmt::MakeWriter, layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::{config::LoggingConfig, telemetry::TelemetryError};

/// Keeps the file appender's worker alive; dropping it flushes pending lines
pub struct LoggingGuard {
    _worker: WorkerGuard,
}

impl std::fmt::Debug for LoggingGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggingGuard").finish_non_exhaustive()
    }
}

/// Install the global subscriber with the console and file sinks
///
/// `filter` is used when `RUST_LOG` is unset. Can only succeed once per
/// process.
pub fn init_logging(config: &LoggingConfig, filter: &str) -> Result<LoggingGuard, TelemetryError> {
    let console_level = parse_level(&config.console_level)?;
    let file_level = parse_level(&config.file_level)?;

    let writer = RotatingFileWriter::open(&config.file_path, config.rotation_policy())
        .map_err(|e| TelemetryError::LogFile(format!("{}: {e}", config.file_path.display())))?;
    let (file_writer, worker) = tracing_appender::non_blocking(writer);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    sink_subscriber(
        env_filter,
        (console_level, std::io::stdout),
        (file_level, file_writer),
    )
    .try_init()
    .map_err(|e| TelemetryError::Init(e.to_string()))?;

    info!(
        file = %config.file_path.display(),
        console_level = %console_level,
        file_level = %file_level,
        max_size_mb = config.max_size_mb,
        max_backups = config.max_backups,
        max_age_days = config.max_age_days,
        "Logging initialized"
    );

    Ok(LoggingGuard { _worker: worker })
}

/// Registry with the global filter, a human-readable console layer and a
/// JSON-lines file layer, each behind its own level
fn sink_subscriber<C, F>(
    env_filter: EnvFilter,
    (console_level, console): (LevelFilter, C),
    (file_level, file): (LevelFilter, F),
) -> impl Subscriber + Send + Sync + 'static
where
    C: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    F: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(console)
        .with_filter(console_level);

    let file_layer = fmt::layer()
        .json()
        .with_ansi(false)
        .with_current_span(false)
        .with_span_list(false)
        .with_writer(file)
        .with_filter(file_level);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
}

/// Parse a level name such as `debug` or `INFO`
pub fn parse_level(level: &str) -> Result<LevelFilter, TelemetryError> {
    level
        .parse::<LevelFilter>()
        .map_err(|e| TelemetryError::Init(format!("invalid log level '{level}': {e}")))
}
