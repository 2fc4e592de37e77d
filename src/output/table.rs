//! Fixed-width text table for the diagnostic stream.

use crate::parser::schema::{RankedEntry, RankedReport};
use std::io::{self, Write};

pub const HEADER_BANNER: &str = "=== SLOWEST METHODS (by total accumulated time) ===";
pub const FOOTER_BANNER: &str = "========================================================";

/// Render the ranked report as a table
///
/// **Public** - one row per entry between header and footer banners
///
/// # Example
/// ```ignore
/// render_table(&report, &mut std::io::stderr().lock())?;
/// ```
pub fn render_table<W: Write>(report: &RankedReport, out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", HEADER_BANNER)?;
    writeln!(out, "{}", column_header())?;

    for entry in report {
        writeln!(out, "{}", format_row(entry))?;
    }

    writeln!(out, "{}", FOOTER_BANNER)?;
    writeln!(out)?;
    out.flush()
}

/// Render into a string (for logging and tests)
pub fn table_to_string(report: &RankedReport) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail
    let _ = render_table(report, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

fn column_header() -> String {
    format!(
        "{:<8}  {:<8}  {:<12}  {:<12}  {}",
        "calls", "avg(ms)", "total(ms)", "max(ms)", "method"
    )
}

fn format_row(entry: &RankedEntry) -> String {
    format!(
        "{:<8}  {:<8.3}  {:<12.3}  {:<12.3}  {}",
        entry.call_count, entry.avg_millis, entry.total_millis, entry.max_millis, entry.identifier
    )
}
