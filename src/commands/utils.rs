use crate::output::read_report;
use crate::parser::parse_options;
use crate::utils::config::{DEFAULT_OUTPUT_PATH, OPTIONS_ENV_VAR};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Pick the log filter for the CLI
///
/// `--verbose` or `verbose=true` in the agent options both select debug.
pub fn log_level(cli_verbose: bool, options: Option<&str>) -> &'static str {
    if cli_verbose || parse_options(options).verbose {
        "debug"
    } else {
        "info"
    }
}

/// Validate a persisted report file
pub fn validate_report_file(file_path: PathBuf) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let entries = read_report(&file_path)
        .with_context(|| format!("Failed to read report {}", file_path.display()))?;

    let sorted = entries
        .windows(2)
        .all(|pair| pair[0].total_millis >= pair[1].total_millis);
    if !sorted {
        anyhow::bail!("Report entries are not ordered by descending total_ms");
    }

    let total_calls: u64 = entries.iter().map(|e| e.call_count).sum();

    println!("✓ Valid latency report");
    println!("  Entries: {}", entries.len());
    println!("  Calls: {}", total_calls);
    if let Some(top) = entries.first() {
        println!("  Slowest: {} ({:.3} ms total)", top.identifier, top.total_millis);
    }

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Latency Agent Report Schema");
    println!("Default file: {}", DEFAULT_OUTPUT_PATH);
    println!();

    if show_details {
        println!("Report Structure (JSON array, ordered by descending total_ms):");
        println!("  method: string    - Call boundary identifier");
        println!("  calls: number     - Number of recorded calls");
        println!("  avg_ms: number    - Mean duration per call (ms)");
        println!("  total_ms: number  - Accumulated duration (ms)");
        println!("  max_ms: number    - Longest single call (ms)");
        println!();
        println!("Options ({}): include, exclude, minmicros, top, verbose, output", OPTIONS_ENV_VAR);
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Latency Agent v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Records method latency with bounded memory and reports the slowest calls.");
}
