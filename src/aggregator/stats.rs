//! Concurrent per-identifier latency counters.
//!
//! Every instrumented call lands in `StatsAggregator::record`, so this is the
//! hot path. The table is a sharded `DashMap`; the counters inside each
//! record are plain atomics, which lets existing identifiers be updated
//! under a shard read lock without allocating. Nothing on this path logs
//! or touches I/O, so a writer never holds a shard lock while waiting on
//! stderr.

use crate::parser::schema::AgentConfig;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Counters for a single identifier
///
/// Created on the first qualifying event and never removed.
#[derive(Debug, Default)]
pub struct StatRecord {
    call_count: AtomicU64,
    total_nanos: AtomicU64,
    max_nanos: AtomicU64,
}

impl StatRecord {
    /// Fold one observation into the counters
    fn observe(&self, duration_nanos: u64) {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.total_nanos.fetch_add(duration_nanos, Ordering::Relaxed);

        // Retry until our value is stored or a larger one is already there
        let mut current = self.max_nanos.load(Ordering::Relaxed);
        while duration_nanos > current {
            match self.max_nanos.compare_exchange_weak(
                current,
                duration_nanos,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(actual) => current = actual,
            }
        }
    }

    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn total_nanos(&self) -> u64 {
        self.total_nanos.load(Ordering::Relaxed)
    }

    pub fn max_nanos(&self) -> u64 {
        self.max_nanos.load(Ordering::Relaxed)
    }
}

/// Plain copy of a record taken at snapshot time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatSnapshot {
    pub identifier: String,
    pub call_count: u64,
    pub total_nanos: u64,
    pub max_nanos: u64,
}

impl StatSnapshot {
    pub fn new(identifier: impl Into<String>, call_count: u64, total_nanos: u64, max_nanos: u64) -> Self {
        Self {
            identifier: identifier.into(),
            call_count,
            total_nanos,
            max_nanos,
        }
    }
}

/// Thread-safe table of latency counters keyed by identifier
///
/// Share it behind an `Arc` between probes and the reporter. Independent
/// instances do not interact.
#[derive(Debug, Default)]
pub struct StatsAggregator {
    records: DashMap<String, StatRecord>,
    min_duration_nanos: u64,
}

impl StatsAggregator {
    /// Create an aggregator dropping events shorter than `min_duration_nanos`
    pub fn new(min_duration_nanos: u64) -> Self {
        Self {
            records: DashMap::new(),
            min_duration_nanos,
        }
    }

    /// Create an aggregator from the agent configuration
    pub fn with_config(config: &AgentConfig) -> Self {
        Self {
            records: DashMap::new(),
            min_duration_nanos: config.min_duration_nanos,
        }
    }

    /// Record one completed call
    ///
    /// **Public** - hot path, called once per instrumented call
    ///
    /// Events below the threshold are ignored entirely. This never fails
    /// and never panics.
    pub fn record(&self, identifier: &str, duration_nanos: u64) {
        if duration_nanos < self.min_duration_nanos {
            return;
        }

        if let Some(record) = self.records.get(identifier) {
            record.observe(duration_nanos);
            return;
        }

        // First sighting: the entry API holds the shard write lock, so racing
        // threads all end up on the same record.
        self.records
            .entry(identifier.to_owned())
            .or_default()
            .observe(duration_nanos);
    }

    /// Record one completed call measured as a `Duration`
    pub fn record_duration(&self, identifier: &str, elapsed: Duration) {
        let nanos = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
        self.record(identifier, nanos);
    }

    /// Copy all current records, ordered by identifier
    ///
    /// **Public** - safe while other threads keep recording
    ///
    /// Each record is read independently, so the result is not a single
    /// consistent instant across identifiers.
    pub fn snapshot(&self) -> Vec<StatSnapshot> {
        let mut snapshots: Vec<StatSnapshot> = self
            .records
            .iter()
            .map(|entry| {
                let record = entry.value();
                StatSnapshot {
                    identifier: entry.key().clone(),
                    call_count: record.call_count(),
                    total_nanos: record.total_nanos(),
                    max_nanos: record.max_nanos(),
                }
            })
            .collect();

        snapshots.sort_unstable_by(|a, b| a.identifier.cmp(&b.identifier));
        snapshots
    }

    /// Snapshot of a single identifier, if it has been recorded
    pub fn get(&self, identifier: &str) -> Option<StatSnapshot> {
        self.records.get(identifier).map(|record| StatSnapshot {
            identifier: identifier.to_string(),
            call_count: record.call_count(),
            total_nanos: record.total_nanos(),
            max_nanos: record.max_nanos(),
        })
    }

    /// Number of distinct identifiers recorded
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn min_duration_nanos(&self) -> u64 {
        self.min_duration_nanos
    }
}
