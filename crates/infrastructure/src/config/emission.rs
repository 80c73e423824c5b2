//! Emission loop configuration.

use std::time::Duration;

use application::{ApplicationError, EmissionConfig, EmitterConfig, FanOut};
use domain::entities::EndpointSet;
use serde::{Deserialize, Serialize};

use super::default_true;

/// Settings of the synthetic workload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmissionAppConfig {
    /// Endpoint labels the request counter is attributed to
    #[serde(default = "default_endpoints")]
    pub endpoints: Vec<String>,

    /// Pause after each tick, in milliseconds
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Own work of the `do-request` span, in milliseconds
    #[serde(default = "default_root_work_ms")]
    pub root_work_ms: u64,

    /// Work of each child span, in milliseconds
    #[serde(default = "default_child_work_ms")]
    pub child_work_ms: u64,

    /// Fixed PRNG seed; drawn from the OS when unset
    #[serde(default)]
    pub seed: Option<u64>,

    /// Whether ticks wait for their child spans
    #[serde(default)]
    pub fan_out: FanOut,

    /// Wrap all ticks in a long-lived `main` span
    #[serde(default = "default_true")]
    pub trace_root: bool,
}

fn default_endpoints() -> Vec<String> {
    vec!["/foo".to_string(), "/bar".to_string(), "/baz".to_string()]
}

const fn default_tick_interval_ms() -> u64 {
    2000
}

const fn default_root_work_ms() -> u64 {
    1000
}

const fn default_child_work_ms() -> u64 {
    2000
}

impl EmissionAppConfig {
    /// Convert into the loop's settings
    ///
    /// # Errors
    ///
    /// Returns an error for an empty or malformed endpoint list, or a zero
    /// tick interval.
    pub fn to_emission_config(&self) -> Result<EmissionConfig, ApplicationError> {
        let config = EmissionConfig {
            endpoints: EndpointSet::parse(&self.endpoints)?,
            tick_interval: Duration::from_millis(self.tick_interval_ms),
            emitter: EmitterConfig {
                root_work: Duration::from_millis(self.root_work_ms),
                child_work: Duration::from_millis(self.child_work_ms),
                fan_out: self.fan_out,
            },
        };
        config.validate()?;
        Ok(config)
    }
}

impl Default for EmissionAppConfig {
    fn default() -> Self {
        Self {
            endpoints: default_endpoints(),
            tick_interval_ms: default_tick_interval_ms(),
            root_work_ms: default_root_work_ms(),
            child_work_ms: default_child_work_ms(),
            seed: None,
            fan_out: FanOut::Detached,
            trace_root: true,
        }
    }
}
