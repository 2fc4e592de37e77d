//! Configuration and report schema definitions.
//!
//! `AgentConfig` is built once from the option string and never mutated.
//! `RankedEntry` is the shape of one object in the persisted JSON array;
//! serde keeps the declared field order.

use crate::utils::config::{DEFAULT_OUTPUT_PATH, DEFAULT_TOP_N, LOG_PREFIX};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Immutable agent configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    /// Allow patterns, consumed by the instrumentation layer only
    pub include_patterns: Vec<String>,

    /// Deny patterns, consumed by the instrumentation layer only
    pub exclude_patterns: Vec<String>,

    /// Events shorter than this are dropped
    pub min_duration_nanos: u64,

    /// Maximum number of ranked entries to report (always >= 1)
    pub top_n: usize,

    /// Enable diagnostic logging
    ///
    /// Diagnostics go through `log` at debug level, so the host's logger
    /// must let them through. The CLI raises its filter when this is set.
    pub verbose: bool,

    /// Path for the persisted report
    pub output_path: PathBuf,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
            min_duration_nanos: 0,
            top_n: DEFAULT_TOP_N,
            verbose: false,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

impl AgentConfig {
    /// Recording threshold as a `Duration`
    pub fn min_duration(&self) -> Duration {
        Duration::from_nanos(self.min_duration_nanos)
    }

    /// Startup banner reporting the active configuration
    ///
    /// **Public** - printed once when the agent starts
    pub fn banner(&self) -> String {
        format!(
            "{} active. min={:?}, top={}, verbose={}",
            LOG_PREFIX,
            self.min_duration(),
            self.top_n,
            self.verbose
        )
    }
}

/// One ranked row of a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    /// Call boundary label
    #[serde(rename = "method")]
    pub identifier: String,

    /// Number of recorded calls
    #[serde(rename = "calls")]
    pub call_count: u64,

    /// Mean duration per call in milliseconds
    #[serde(rename = "avg_ms")]
    pub avg_millis: f64,

    /// Accumulated duration in milliseconds
    #[serde(rename = "total_ms")]
    pub total_millis: f64,

    /// Longest single call in milliseconds
    #[serde(rename = "max_ms")]
    pub max_millis: f64,
}

/// Entries ordered by descending total time, at most `top_n` long
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankedReport {
    pub entries: Vec<RankedEntry>,
}

impl RankedReport {
    pub fn new(entries: Vec<RankedEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RankedEntry> {
        self.entries.iter()
    }

    /// Sum of the ranked entries' total time in milliseconds
    pub fn total_millis(&self) -> f64 {
        self.entries.iter().map(|e| e.total_millis).sum()
    }
}

impl<'a> IntoIterator for &'a RankedReport {
    type Item = &'a RankedEntry;
    type IntoIter = std::slice::Iter<'a, RankedEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
