//! [`TracerPort`] adapter over the OpenTelemetry SDK tracer
//!
//! Span contexts cross the port as plain ids. While a span started here is
//! open, its OpenTelemetry [`Context`] is kept in a registry keyed by those
//! ids, so a child started from the ids gets the live local parent. Ids the
//! tracer does not hold (already ended, or created elsewhere) are attached as
//! a remote span context; the SDK still records the parent and reuses its
//! trace id.

use std::{collections::HashMap, fmt, sync::Arc};

use application::ports::{ActiveSpan, TracerPort};
use domain::value_objects::{SpanContext, SpanId, TraceId};
use opentelemetry::{
    Context,
    trace::{
        Span as _, SpanContext as OtelSpanContext, SpanId as OtelSpanId, TraceContextExt as _,
        TraceFlags, TraceId as OtelTraceId, TraceState, Tracer as _,
    },
};
use opentelemetry_sdk::trace::SdkTracer;
use parking_lot::Mutex;

/// Contexts of the spans this tracer has started and not yet ended
type OpenSpans = Arc<Mutex<HashMap<SpanContext, Context>>>;

/// Starts spans on an SDK tracer
#[derive(Clone)]
pub struct OtelTracer {
    tracer: SdkTracer,
    open: OpenSpans,
}

impl fmt::Debug for OtelTracer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OtelTracer")
            .field("open_spans", &self.open.lock().len())
            .finish_non_exhaustive()
    }
}

impl OtelTracer {
    pub fn new(tracer: SdkTracer) -> Self {
        Self {
            tracer,
            open: Arc::default(),
        }
    }

    fn parent_context(&self, parent: &SpanContext) -> Context {
        if !parent.is_valid() {
            return Context::new();
        }
        self.open.lock().get(parent).cloned().unwrap_or_else(|| {
            Context::new().with_remote_span_context(to_otel(parent))
        })
    }
}

impl TracerPort for OtelTracer {
    fn start_span(&self, name: &'static str, parent: &SpanContext) -> Box<dyn ActiveSpan> {
        let parent_cx = self.parent_context(parent);
        let span = self.tracer.start_with_context(name, &parent_cx);
        let context = from_otel(span.span_context());

        let cx = parent_cx.with_span(span);
        self.open.lock().insert(context, cx.clone());

        Box::new(OtelSpan {
            cx,
            context,
            open: Arc::clone(&self.open),
        })
    }
}

/// An open SDK span, held inside its own context
struct OtelSpan {
    cx: Context,
    context: SpanContext,
    open: OpenSpans,
}

impl ActiveSpan for OtelSpan {
    fn context(&self) -> SpanContext {
        self.context
    }

    fn end(self: Box<Self>) {
        self.cx.span().end();
    }
}

impl Drop for OtelSpan {
    // Unregistering releases the last context clone; an unended span then
    // ends when the SDK span drops.
    fn drop(&mut self) {
        self.open.lock().remove(&self.context);
    }
}

fn to_otel(context: &SpanContext) -> OtelSpanContext {
    OtelSpanContext::new(
        OtelTraceId::from_bytes(context.trace_id().to_bytes()),
        OtelSpanId::from_bytes(context.span_id().to_bytes()),
        TraceFlags::SAMPLED,
        // remote
        true,
        TraceState::default(),
    )
}

fn from_otel(context: &OtelSpanContext) -> SpanContext {
    SpanContext::new(
        TraceId::from_bytes(context.trace_id().to_bytes()),
        SpanId::from_bytes(context.span_id().to_bytes()),
    )
}
