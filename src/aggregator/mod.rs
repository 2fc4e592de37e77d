//! Aggregation of call timings into ranked metrics.
//!
//! This module turns the stream of `(identifier, duration)` events into:
//! - Per-identifier counters (calls, total, max)
//! - A ranked view of the slowest identifiers
//! - Distribution statistics for logging

pub mod stats;
pub mod metrics;

// Re-export main types and functions
pub use stats::{StatRecord, StatSnapshot, StatsAggregator};
pub use metrics::{calculate_distribution, create_ranked_entry, rank_entries, LatencyDistribution};
