//! Emission loop
//!
//! Drives the generator. Every pass draws a [`Tick`], records the metric
//! series for it, writes the correlated log record, emits the request trace
//! and then sleeps the tick interval:
//!
//! ```text
//! draw ─► counter ─► histogram ─► log ─► gauge ─► trace (root delay) ─► sleep
//! ```
//!
//! Metrics and the log record are written before the trace call of the same
//! tick. Ticks run strictly one after another; detached child spans of one
//! tick may still be open while the next tick starts.

use std::fmt;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use std::time::Duration;

use domain::{
    entities::{EndpointSet, Tick},
    value_objects::{Latency, SpanContext, Temperature},
};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use super::{
    log_correlator::LogCorrelator,
    tracing_emitter::{EmitterConfig, TracingEmitter},
};
use crate::{
    error::ApplicationError,
    ports::{MetricsRecorder, RandomSource, TracerPort},
};

/// Loop settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmissionConfig {
    /// Labels the request counter is attributed to
    pub endpoints: EndpointSet,
    /// Pause after each tick
    pub tick_interval: Duration,
    pub emitter: EmitterConfig,
}

impl EmissionConfig {
    /// Check the settings before the loop starts
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Configuration` for a zero tick interval.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        if self.tick_interval.is_zero() {
            return Err(ApplicationError::Configuration(
                "tick interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for EmissionConfig {
    fn default() -> Self {
        Self {
            endpoints: EndpointSet::default(),
            tick_interval: Duration::from_secs(2),
            emitter: EmitterConfig::default(),
        }
    }
}

/// Tick counter shared with observers such as the health endpoint
#[derive(Debug, Default)]
pub struct LoopProgress {
    ticks: AtomicU64,
}

impl LoopProgress {
    /// Completed ticks so far
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    fn record_tick(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }
}

/// Summary returned when a run stops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopReport {
    /// Ticks completed by this run
    pub ticks: u64,
    /// Iteration the next tick would have used
    pub next_iteration: u64,
}

/// The long-running tick loop
pub struct EmissionLoop {
    config: EmissionConfig,
    random: Arc<dyn RandomSource>,
    metrics: Arc<dyn MetricsRecorder>,
    emitter: TracingEmitter,
    correlator: LogCorrelator,
    root_context: SpanContext,
    iteration: u64,
    progress: Arc<LoopProgress>,
}

impl fmt::Debug for EmissionLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmissionLoop")
            .field("config", &self.config)
            .field("root_context", &self.root_context)
            .field("iteration", &self.iteration)
            .finish_non_exhaustive()
    }
}

impl EmissionLoop {
    /// Create a loop starting at iteration 0 with an empty root context
    ///
    /// # Errors
    ///
    /// Returns an error if `config` does not validate.
    pub fn new(
        config: EmissionConfig,
        random: Arc<dyn RandomSource>,
        metrics: Arc<dyn MetricsRecorder>,
        tracer: Arc<dyn TracerPort>,
    ) -> Result<Self, ApplicationError> {
        config.validate()?;
        let emitter = TracingEmitter::new(tracer, config.emitter);

        Ok(Self {
            config,
            random,
            metrics,
            emitter,
            correlator: LogCorrelator::new(),
            root_context: SpanContext::empty(),
            iteration: 0,
            progress: Arc::new(LoopProgress::default()),
        })
    }

    /// Parent every tick's root span under `context`
    #[must_use]
    pub const fn with_root_context(mut self, context: SpanContext) -> Self {
        self.root_context = context;
        self
    }

    #[must_use]
    pub fn progress(&self) -> Arc<LoopProgress> {
        Arc::clone(&self.progress)
    }

    /// Iteration the next tick will use
    #[must_use]
    pub const fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Draw the values of the next tick without emitting anything
    ///
    /// Draw order is latency, endpoint, temperature, so a seeded source
    /// produces the same sequence of ticks on every run.
    pub fn draw_tick(&self) -> Tick {
        let raw = self.random.uniform(0.0, 1.0);
        let latency = Latency::new(raw).unwrap_or_else(|e| {
            warn!(error = %e, "Random source produced an unusable latency, using zero");
            Latency::ZERO
        });

        let endpoints = &self.config.endpoints;
        let endpoint = endpoints.pick(self.random.index(endpoints.len())).clone();

        let temperature = Temperature::celsius(
            self.random
                .uniform(Temperature::MIN_CELSIUS, Temperature::MAX_CELSIUS),
        );

        Tick::new(self.iteration, latency, endpoint, temperature)
    }

    /// Run one tick, excluding the inter-tick sleep
    #[instrument(skip(self), fields(iteration = self.iteration))]
    pub async fn tick(&mut self) -> Tick {
        let tick = self.draw_tick();

        self.metrics.record_request(tick.endpoint.as_str());
        self.metrics
            .record_latency(&tick.histogram_label(), tick.latency.seconds());
        self.correlator.emit_tick(&tick);
        self.metrics.set_temperature(tick.temperature.value());
        debug!(
            endpoint = %tick.endpoint,
            temperature = tick.temperature.value(),
            "Tick drawn"
        );

        self.emitter.run_tick(&self.root_context).await;

        self.iteration += 1;
        self.progress.record_tick();
        tick
    }

    /// Run exactly `count` ticks, each followed by the tick interval
    pub async fn run_ticks(&mut self, count: u64) -> LoopReport {
        for _ in 0..count {
            self.tick().await;
            tokio::time::sleep(self.config.tick_interval).await;
        }
        LoopReport {
            ticks: count,
            next_iteration: self.iteration,
        }
    }

    /// Run until `shutdown` turns true or its sender is dropped
    ///
    /// A tick in progress is completed; the inter-tick sleep is cut short.
    /// Returns once the last tick's detached child spans have ended, so a
    /// tracer flushed afterwards exports them.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> LoopReport {
        info!(
            endpoints = self.config.endpoints.len(),
            interval_ms = u64::try_from(self.config.tick_interval.as_millis()).unwrap_or(u64::MAX),
            "Emission loop started"
        );

        let mut ticks = 0;
        loop {
            let stopped = *shutdown.borrow() || shutdown.has_changed().is_err();
            if stopped {
                break;
            }

            self.tick().await;
            ticks += 1;

            tokio::select! {
                () = tokio::time::sleep(self.config.tick_interval) => {},
                signalled = shutdown.wait_for(|stop| *stop) => {
                    if signalled.is_err() {
                        debug!("Shutdown sender dropped");
                    }
                    break;
                },
            }
        }
        self.emitter.settle().await;

        info!(ticks, next_iteration = self.iteration, "Emission loop stopped");
        LoopReport {
            ticks,
            next_iteration: self.iteration,
        }
    }
}
