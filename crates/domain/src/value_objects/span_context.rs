//! Trace correlation handle
//!
//! A `SpanContext` identifies a position in a trace: the trace it belongs to
//! and the span that is currently active. Child operations derive a fresh
//! context from their parent's; the parent's context is never mutated.
//!
//! The all-zero context is the "empty" context. Starting a span under it
//! begins a new trace.
//!
//! # Examples
//!
//! ```
//! use domain::value_objects::{SpanContext, SpanId, TraceId};
//!
//! let root = SpanContext::empty();
//! assert!(!root.is_valid());
//!
//! let cx = SpanContext::new(TraceId::new(7), SpanId::new(1));
//! assert!(cx.is_valid());
//! assert_eq!(cx.trace_id().to_string(), "00000000000000000000000000000007");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// 128-bit trace identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TraceId(u128);

impl TraceId {
    /// The invalid, all-zero trace id
    pub const INVALID: Self = Self(0);

    #[must_use]
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> u128 {
        self.0
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0.to_be_bytes()
    }

    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(u128::from_be_bytes(bytes))
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

/// 64-bit span identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpanId(u64);

impl SpanId {
    /// The invalid, all-zero span id
    pub const INVALID: Self = Self(0);

    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    #[must_use]
    pub const fn from_bytes(bytes: [u8; 8]) -> Self {
        Self(u64::from_be_bytes(bytes))
    }
}

impl fmt::Display for SpanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Correlation handle for the current trace position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpanContext {
    trace_id: TraceId,
    span_id: SpanId,
}

impl SpanContext {
    #[must_use]
    pub const fn new(trace_id: TraceId, span_id: SpanId) -> Self {
        Self { trace_id, span_id }
    }

    /// Context with no active span; spans started under it are trace roots
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            trace_id: TraceId::INVALID,
            span_id: SpanId::INVALID,
        }
    }

    #[must_use]
    pub const fn trace_id(&self) -> TraceId {
        self.trace_id
    }

    #[must_use]
    pub const fn span_id(&self) -> SpanId {
        self.span_id
    }

    /// Both ids are non-zero
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.trace_id.0 != 0 && self.span_id.0 != 0
    }
}

impl Default for SpanContext {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for SpanContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.trace_id, self.span_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_invalid() {
        assert!(!SpanContext::empty().is_valid());
        assert_eq!(SpanContext::default(), SpanContext::empty());
    }

    #[test]
    fn half_filled_is_invalid() {
        let cx = SpanContext::new(TraceId::new(1), SpanId::INVALID);
        assert!(!cx.is_valid());
    }

    #[test]
    fn byte_conversion_is_big_endian() {
        let trace = TraceId::new(0x0102);
        let bytes = trace.to_bytes();
        assert_eq!(bytes[14], 0x01);
        assert_eq!(bytes[15], 0x02);
        assert_eq!(TraceId::from_bytes(bytes), trace);

        let span = SpanId::new(0xabcd);
        assert_eq!(SpanId::from_bytes(span.to_bytes()), span);
    }

    #[test]
    fn display_is_hex() {
        let cx = SpanContext::new(TraceId::new(255), SpanId::new(16));
        assert_eq!(
            cx.to_string(),
            "000000000000000000000000000000ff/0000000000000010"
        );
    }
}
