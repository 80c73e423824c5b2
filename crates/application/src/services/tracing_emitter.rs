//! Tracing emitter
//!
//! Produces the trace of one simulated request: a root span `do-request` with
//! two concurrent child spans `work1` and `work2`.
//!
//! # Trace shape
//!
//! ```text
//! do-request  |=====|              root: own work only (1s)
//!   work1     |==========|         child: 2s, may outlive the root
//!   work2     |==========|
//! ```
//!
//! The root span ends after its own simulated work and does not wait for its
//! children, so child spans overlap but are not nested in time. Both children
//! are started while the root is still open.
//!
//! With [`FanOut::Detached`] (default) `run_tick` returns while the child
//! work is still running; the pending handles are kept until
//! [`TracingEmitter::settle`] joins them. [`FanOut::Joined`] awaits them after
//! the root span has ended, which leaves the root span's duration unchanged
//! but lets callers observe every span closed when `run_tick` returns.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use domain::value_objects::SpanContext;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::span_guard::SpanGuard;
use crate::ports::TracerPort;

/// Name of the root span of every tick
pub const ROOT_SPAN: &str = "do-request";

/// Names of the concurrent child spans of every tick
pub const CHILD_SPANS: [&str; 2] = ["work1", "work2"];

/// How the emitter treats its child tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FanOut {
    /// Spawn and forget; children may still run when the next tick starts
    #[default]
    Detached,
    /// Await the children after the root span has ended
    Joined,
}

/// Simulated durations for the root and child operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmitterConfig {
    /// Root operation's own work
    pub root_work: Duration,
    /// Each child operation's work
    pub child_work: Duration,
    pub fan_out: FanOut,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            root_work: Duration::from_secs(1),
            child_work: Duration::from_secs(2),
            fan_out: FanOut::Detached,
        }
    }
}

/// Emits the root/child span structure of one tick
pub struct TracingEmitter {
    tracer: Arc<dyn TracerPort>,
    config: EmitterConfig,
    /// Detached child tasks that may still be running
    detached: Vec<JoinHandle<()>>,
}

impl fmt::Debug for TracingEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracingEmitter")
            .field("config", &self.config)
            .field("detached", &self.detached.len())
            .finish_non_exhaustive()
    }
}

impl TracingEmitter {
    pub fn new(tracer: Arc<dyn TracerPort>, config: EmitterConfig) -> Self {
        Self {
            tracer,
            config,
            detached: Vec::new(),
        }
    }

    /// Emit one request trace under `parent`
    ///
    /// Returns after the root span has ended (and, with [`FanOut::Joined`],
    /// after both children have ended). Returns the root span's context.
    pub async fn run_tick(&mut self, parent: &SpanContext) -> SpanContext {
        let root = SpanGuard::start(self.tracer.as_ref(), ROOT_SPAN, parent);
        let root_cx = root.context();

        // Children start while the root is still open; only their work is spawned
        let children: Vec<_> = CHILD_SPANS
            .iter()
            .map(|&name| {
                let span = SpanGuard::start(self.tracer.as_ref(), name, &root_cx);
                let work = self.config.child_work;
                tokio::spawn(async move {
                    tokio::time::sleep(work).await;
                    span.end();
                })
            })
            .collect();

        tokio::time::sleep(self.config.root_work).await;
        root.end();

        match self.config.fan_out {
            FanOut::Detached => {
                self.detached.retain(|child| !child.is_finished());
                self.detached.extend(children);
                debug!(root = %root_cx, "Root span ended, child spans detached");
            },
            FanOut::Joined => {
                for child in children {
                    if let Err(e) = child.await {
                        warn!(root = %root_cx, error = %e, "Child span task did not complete");
                    }
                }
            },
        }

        root_cx
    }

    /// Wait for detached children still running, so their spans are ended
    /// before the tracer is flushed
    pub async fn settle(&mut self) {
        let pending = std::mem::take(&mut self.detached);
        if pending.is_empty() {
            return;
        }
        debug!(pending = pending.len(), "Waiting for detached child spans");
        for child in pending {
            if let Err(e) = child.await {
                warn!(error = %e, "Child span task did not complete");
            }
        }
    }
}
