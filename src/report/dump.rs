//! Dump implementation.
//!
//! The dump:
//! 1. Snapshots the aggregator
//! 2. Ranks entries by total time
//! 3. Writes the table to the diagnostic stream
//! 4. Persists the JSON report

use crate::aggregator::{calculate_distribution, rank_entries, StatsAggregator};
use crate::output::{render_table, write_report};
use crate::parser::schema::{AgentConfig, RankedReport};
use crate::utils::config::LOG_PREFIX;
use log::{debug, info, warn};
use std::io::Write;
use std::time::Instant;

/// Dump the aggregator to stderr and the configured output path
///
/// **Public** - called once at shutdown
///
/// stderr is locked per write only, never across the snapshot or the
/// file write.
pub fn dump(aggregator: &StatsAggregator, config: &AgentConfig) -> RankedReport {
    dump_to(aggregator, config, &mut std::io::stderr())
}

/// Dump with an explicit diagnostic stream
///
/// **Public** - same as `dump`, used by tests and embedders
///
/// # Arguments
/// * `aggregator` - Counters to report; other threads may still be recording
/// * `config` - Supplies top-N and the output path
/// * `out` - Diagnostic stream receiving the table and export status
///
/// # Returns
/// The ranked report. Failures to write the table or persist the file are
/// reported and never abort the dump.
pub fn dump_to<W: Write>(aggregator: &StatsAggregator, config: &AgentConfig, out: &mut W) -> RankedReport {
    let start_time = Instant::now();

    // Step 1: Snapshot
    let snapshots = aggregator.snapshot();
    debug!("Snapshot holds {} identifiers", snapshots.len());

    // Step 2: Rank
    let report = rank_entries(&snapshots, config.top_n);
    let distribution = calculate_distribution(&snapshots, &report);
    debug!("Latency distribution: {}", distribution.summary());
    if config.verbose {
        for (rank, entry) in report.iter().enumerate() {
            debug!("  {}. {:.3} ms over {} calls: {}", rank + 1, entry.total_millis, entry.call_count, entry.identifier);
        }
    }

    // Step 3: Table, rendered off-stream and written in one call
    let mut table = Vec::new();
    let written = render_table(&report, &mut table)
        .and_then(|()| out.write_all(&table))
        .and_then(|()| out.flush());
    if let Err(e) = written {
        warn!("Failed to write latency table: {}", e);
    }

    // Step 4: Persist
    match write_report(&report, &config.output_path) {
        Ok(()) => {
            let _ = writeln!(out, "{} Exported JSON: {}", LOG_PREFIX, config.output_path.display());
            info!("✓ Report written to: {}", config.output_path.display());
        }
        Err(e) => {
            let _ = writeln!(out, "{} Failed to export JSON: {}", LOG_PREFIX, e);
            warn!("Failed to persist report to {}: {}", config.output_path.display(), e);
        }
    }

    debug!("Dump completed in {:.2}ms", start_time.elapsed().as_secs_f64() * 1_000.0);

    report
}
