//! Tracer port
//!
//! The minimal tracing capability the emitter needs: start a named span under
//! a parent context, read the span's own context, end it.
//!
//! Ending consumes the span, so a span cannot be ended twice. Use
//! [`crate::services::SpanGuard`] to also end it on early-exit paths.

use domain::value_objects::SpanContext;

/// A started, not yet ended span
pub trait ActiveSpan: Send {
    /// Context identifying this span, for deriving children
    fn context(&self) -> SpanContext;

    /// Record the end time and hand the span to the exporter
    fn end(self: Box<Self>);
}

/// Port for starting spans
pub trait TracerPort: Send + Sync {
    /// Start `name` as a child of `parent`; an empty parent starts a new trace
    fn start_span(&self, name: &'static str, parent: &SpanContext) -> Box<dyn ActiveSpan>;
}
