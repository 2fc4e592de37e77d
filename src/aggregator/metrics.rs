//! Ranking and summary metrics over aggregator snapshots.
//!
//! The slowest identifiers are the ones with the most accumulated time.
//! These are the primary targets for optimization.

use super::stats::StatSnapshot;
use crate::parser::schema::{RankedEntry, RankedReport};
use crate::utils::config::NANOS_PER_MILLI;
use log::debug;
use std::cmp::Ordering;

/// Rank snapshots by accumulated time
///
/// **Public** - main entry point for ranking
///
/// # Arguments
/// * `snapshots` - Records copied from the aggregator
/// * `top_n` - Number of entries to keep (e.g., 10)
///
/// # Returns
/// Report sorted by total time descending. Equal totals are ordered by
/// identifier so the output does not depend on map iteration order.
pub fn rank_entries(snapshots: &[StatSnapshot], top_n: usize) -> RankedReport {
    debug!("Ranking top {} of {} identifiers", top_n, snapshots.len());

    let mut ordered: Vec<&StatSnapshot> = snapshots.iter().collect();
    ordered.sort_by(|a, b| compare_by_total(a, b));

    let entries = ordered
        .into_iter()
        .take(top_n)
        .map(create_ranked_entry)
        .collect();

    RankedReport::new(entries)
}

/// Descending raw total, then ascending identifier
///
/// **Private** - integer comparison keeps the order stable for equal floats
fn compare_by_total(a: &StatSnapshot, b: &StatSnapshot) -> Ordering {
    b.total_nanos
        .cmp(&a.total_nanos)
        .then_with(|| a.identifier.cmp(&b.identifier))
}

/// Derive the millisecond view of a snapshot
///
/// **Public** - used by ranking and tests
pub fn create_ranked_entry(snapshot: &StatSnapshot) -> RankedEntry {
    let total_millis = nanos_to_millis(snapshot.total_nanos);

    RankedEntry {
        identifier: snapshot.identifier.clone(),
        call_count: snapshot.call_count,
        avg_millis: total_millis / snapshot.call_count.max(1) as f64,
        total_millis,
        max_millis: nanos_to_millis(snapshot.max_nanos),
    }
}

fn nanos_to_millis(nanos: u64) -> f64 {
    nanos as f64 / NANOS_PER_MILLI
}

/// Summary of where recorded time went
///
/// **Public** - returned from calculate_distribution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LatencyDistribution {
    /// Distinct identifiers recorded
    pub identifier_count: usize,

    /// Calls across all identifiers
    pub total_calls: u64,

    /// Time across all identifiers
    pub total_nanos: u64,

    /// Mean time per call across all identifiers
    pub mean_nanos_per_call: u64,

    /// Share of total time held by the ranked entries
    pub ranked_percentage: f64,
}

/// Calculate distribution statistics for a snapshot
///
/// **Public** - logged at dump time
///
/// # Arguments
/// * `snapshots` - Full snapshot of the aggregator
/// * `report` - Ranked subset of the same snapshot
pub fn calculate_distribution(snapshots: &[StatSnapshot], report: &RankedReport) -> LatencyDistribution {
    if snapshots.is_empty() {
        return LatencyDistribution::default();
    }

    let total_calls: u64 = snapshots.iter().map(|s| s.call_count).fold(0, u64::saturating_add);
    let total_nanos: u64 = snapshots.iter().map(|s| s.total_nanos).fold(0, u64::saturating_add);
    let total_millis = nanos_to_millis(total_nanos);

    LatencyDistribution {
        identifier_count: snapshots.len(),
        total_calls,
        total_nanos,
        mean_nanos_per_call: total_nanos / total_calls.max(1),
        ranked_percentage: if total_nanos > 0 {
            (report.total_millis() / total_millis * 100.0).min(100.0)
        } else {
            0.0
        },
    }
}

impl LatencyDistribution {
    /// Get human-readable summary
    ///
    /// **Public** - for logging and debugging
    pub fn summary(&self) -> String {
        format!(
            "Identifiers: {} | Calls: {} | Total: {:.3} ms | Mean: {} ns/call | Ranked: {:.1}%",
            self.identifier_count,
            self.total_calls,
            nanos_to_millis(self.total_nanos),
            self.mean_nanos_per_call,
            self.ranked_percentage
        )
    }
}
