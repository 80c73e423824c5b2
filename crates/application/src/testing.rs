//! In-memory test doubles for the application ports
//!
//! Only compiled for unit tests.

use std::collections::HashMap;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use std::time::Duration;

use domain::value_objects::{SpanContext, SpanId, TraceId};
use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, Layer};

use crate::ports::{ActiveSpan, MetricsRecorder, RandomSource, TracerPort};

// ============================================================================
// Tracer
// ============================================================================

/// What the recording tracer saw for one span
#[derive(Debug, Clone)]
pub struct SpanRecord {
    pub name: &'static str,
    pub context: SpanContext,
    pub parent: SpanContext,
    pub started_at: Instant,
    pub ended_at: Vec<Instant>,
}

impl SpanRecord {
    pub fn end_count(&self) -> usize {
        self.ended_at.len()
    }

    pub fn ended(&self) -> Option<Instant> {
        self.ended_at.first().copied()
    }
}

/// Tracer that records starts and ends, optionally stalling on each call
#[derive(Debug)]
pub struct RecordingTracer {
    next_id: AtomicU64,
    spans: Arc<Mutex<HashMap<SpanId, SpanRecord>>>,
    stall: Option<Duration>,
}

impl RecordingTracer {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            spans: Arc::new(Mutex::new(HashMap::new())),
            stall: None,
        }
    }

    /// Simulate a slow collaborator: every start and end blocks the thread
    pub fn slow(stall: Duration) -> Self {
        Self {
            stall: Some(stall),
            ..Self::new()
        }
    }

    pub fn spans(&self) -> Vec<SpanRecord> {
        let mut spans: Vec<_> = self.spans.lock().values().cloned().collect();
        spans.sort_by_key(|s| s.context.span_id());
        spans
    }

    pub fn named(&self, name: &str) -> Vec<SpanRecord> {
        self.spans().into_iter().filter(|s| s.name == name).collect()
    }

    pub fn started(&self) -> usize {
        self.spans.lock().len()
    }

    pub fn open(&self) -> usize {
        self.spans
            .lock()
            .values()
            .filter(|s| s.ended_at.is_empty())
            .count()
    }

    fn stall(&self) {
        if let Some(stall) = self.stall {
            std::thread::sleep(stall);
        }
    }
}

impl TracerPort for RecordingTracer {
    fn start_span(&self, name: &'static str, parent: &SpanContext) -> Box<dyn ActiveSpan> {
        self.stall();
        let id = SpanId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let trace_id = if parent.is_valid() {
            parent.trace_id()
        } else {
            TraceId::new(u128::from(id.value()))
        };
        let context = SpanContext::new(trace_id, id);

        self.spans.lock().insert(
            id,
            SpanRecord {
                name,
                context,
                parent: *parent,
                started_at: Instant::now(),
                ended_at: Vec::new(),
            },
        );

        Box::new(RecordedSpan {
            context,
            spans: Arc::clone(&self.spans),
            stall: self.stall,
        })
    }
}

struct RecordedSpan {
    context: SpanContext,
    spans: Arc<Mutex<HashMap<SpanId, SpanRecord>>>,
    stall: Option<Duration>,
}

impl ActiveSpan for RecordedSpan {
    fn context(&self) -> SpanContext {
        self.context
    }

    fn end(self: Box<Self>) {
        if let Some(stall) = self.stall {
            std::thread::sleep(stall);
        }
        if let Some(record) = self.spans.lock().get_mut(&self.context.span_id()) {
            record.ended_at.push(Instant::now());
        }
    }
}

// ============================================================================
// Random source
// ============================================================================

/// Random source replaying fixed sequences, cycling when exhausted
#[derive(Debug)]
pub struct ScriptedRandom {
    uniforms: Vec<f64>,
    indices: Vec<usize>,
    uniform_pos: AtomicU64,
    index_pos: AtomicU64,
}

impl ScriptedRandom {
    /// `uniforms` are unit-interval fractions scaled into the requested range
    pub fn new(uniforms: Vec<f64>, indices: Vec<usize>) -> Self {
        Self {
            uniforms,
            indices,
            uniform_pos: AtomicU64::new(0),
            index_pos: AtomicU64::new(0),
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
impl RandomSource for ScriptedRandom {
    fn uniform(&self, min: f64, max: f64) -> f64 {
        let pos = self.uniform_pos.fetch_add(1, Ordering::SeqCst) as usize;
        let fraction = self.uniforms[pos % self.uniforms.len()];
        (max - min).mul_add(fraction, min)
    }

    fn index(&self, len: usize) -> usize {
        let pos = self.index_pos.fetch_add(1, Ordering::SeqCst) as usize;
        self.indices[pos % self.indices.len()] % len.max(1)
    }
}

// ============================================================================
// Metrics
// ============================================================================

/// One call made against the metrics port
#[derive(Debug, Clone, PartialEq)]
pub enum MetricCall {
    Request(String),
    Latency(String, f64),
    Temperature(f64),
}

/// Metrics recorder keeping every call in order
#[derive(Debug, Default)]
pub struct RecordingMetrics {
    calls: Mutex<Vec<MetricCall>>,
}

impl RecordingMetrics {
    pub fn calls(&self) -> Vec<MetricCall> {
        self.calls.lock().clone()
    }

    pub fn request_count(&self, endpoint: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, MetricCall::Request(e) if e == endpoint))
            .count()
    }

    pub fn latencies(&self) -> Vec<(String, f64)> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                MetricCall::Latency(label, value) => Some((label.clone(), *value)),
                _ => None,
            })
            .collect()
    }

    pub fn temperatures(&self) -> Vec<f64> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                MetricCall::Temperature(value) => Some(*value),
                _ => None,
            })
            .collect()
    }
}

impl MetricsRecorder for RecordingMetrics {
    fn record_request(&self, endpoint: &str) {
        self.calls.lock().push(MetricCall::Request(endpoint.to_string()));
    }

    fn record_latency(&self, iteration_label: &str, value: f64) {
        self.calls
            .lock()
            .push(MetricCall::Latency(iteration_label.to_string(), value));
    }

    fn set_temperature(&self, value: f64) {
        self.calls.lock().push(MetricCall::Temperature(value));
    }
}

// ============================================================================
// Log capture
// ============================================================================

/// A captured log event
#[derive(Debug, Clone, Default)]
pub struct CapturedEvent {
    pub level: String,
    pub message: String,
    pub fields: HashMap<String, String>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// `tracing` layer collecting events into memory
#[derive(Debug, Clone, Default)]
pub struct LogCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl LogCapture {
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().clone()
    }

    pub fn with_message(&self, message: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.message == message)
            .collect()
    }
}

impl<S: tracing::Subscriber> Layer<S> for LogCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut captured = CapturedEvent {
            level: event.metadata().level().to_string(),
            ..CapturedEvent::default()
        };
        event.record(&mut captured);
        self.events.lock().push(captured);
    }
}

impl Visit for CapturedEvent {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields
                .insert(field.name().to_string(), format!("{value:?}"));
        }
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.fields.insert(field.name().to_string(), value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.insert(field.name().to_string(), value.to_string());
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.fields.insert(field.name().to_string(), value.to_string());
    }
}

/// Install `capture` as the thread-local subscriber for the guard's lifetime
pub fn capture_logs(capture: &LogCapture) -> tracing::subscriber::DefaultGuard {
    use tracing_subscriber::layer::SubscriberExt;
    tracing::subscriber::set_default(tracing_subscriber::registry().with(capture.clone()))
}
