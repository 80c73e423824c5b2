//! RAII wrapper that ends a span exactly once
//!
//! The span is ended either explicitly via [`SpanGuard::end`] or when the
//! guard is dropped, e.g. because the owning task was cancelled.

use std::fmt;

use domain::value_objects::SpanContext;

use crate::ports::{ActiveSpan, TracerPort};

/// An open span that ends when the guard goes away
pub struct SpanGuard {
    name: &'static str,
    context: SpanContext,
    span: Option<Box<dyn ActiveSpan>>,
}

impl SpanGuard {
    /// Start `name` under `parent`
    pub fn start(tracer: &dyn TracerPort, name: &'static str, parent: &SpanContext) -> Self {
        let span = tracer.start_span(name, parent);
        Self {
            name,
            context: span.context(),
            span: Some(span),
        }
    }

    /// Context of the guarded span, for starting children
    #[must_use]
    pub const fn context(&self) -> SpanContext {
        self.context
    }

    /// End the span now
    pub fn end(mut self) {
        self.finish();
    }

    fn finish(&mut self) {
        if let Some(span) = self.span.take() {
            span.end();
        }
    }
}

impl Drop for SpanGuard {
    fn drop(&mut self) {
        self.finish();
    }
}

impl fmt::Debug for SpanGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpanGuard")
            .field("name", &self.name)
            .field("context", &self.context)
            .field("open", &self.span.is_some())
            .finish()
    }
}
