//! JSON report writer.
//!
//! Encodes a ranked report as a JSON array and writes it to disk.
//! serde_json escapes quotes and control characters in identifiers.

use crate::parser::schema::{RankedEntry, RankedReport};
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Encode a report as pretty-printed JSON bytes
///
/// **Public** - an empty report encodes as `[]`
pub fn encode_report(report: &RankedReport) -> Result<Vec<u8>, OutputError> {
    let mut bytes = serde_json::to_vec_pretty(report).map_err(OutputError::SerializationFailed)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Write a report to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Arguments
/// * `report` - Ranked report to write
/// * `output_path` - Path to output JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
///
/// # Example
/// ```ignore
/// let report = rank_entries(&aggregator.snapshot(), 10);
/// write_report(&report, "latency-metrics.json")?;
/// ```
pub fn write_report(report: &RankedReport, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing report to: {}", output_path.display());

    validate_output_path(output_path)?;

    // Create parent directories if needed
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!("Cannot create directory {}: {}", parent.display(), e))
            })?;
        }
    }

    let bytes = encode_report(report)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&bytes).map_err(OutputError::WriteFailed)?;
    writer.flush().map_err(OutputError::WriteFailed)?;

    debug!("Report written ({} entries, {} bytes)", report.len(), bytes.len());

    Ok(())
}

/// Validate that output path is writable
///
/// **Private** - internal validation
fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    // Refuse to clobber a directory
    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Read a persisted report back
///
/// **Public** - used by the validate command and tests
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_report(input_path: impl AsRef<Path>) -> Result<Vec<RankedEntry>, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading report from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let entries: Vec<RankedEntry> = serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    debug!("Report loaded: {} entries", entries.len());

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::NamedTempFile;

    fn create_test_report() -> RankedReport {
        RankedReport::new(vec![
            RankedEntry {
                identifier: "Repo.find(long)".to_string(),
                call_count: 4,
                avg_millis: 2.5,
                total_millis: 10.0,
                max_millis: 4.0,
            },
            RankedEntry {
                identifier: "Cache.get".to_string(),
                call_count: 1,
                avg_millis: 0.5,
                total_millis: 0.5,
                max_millis: 0.5,
            },
        ])
    }

    #[test]
    fn test_write_and_read_report() {
        let report = create_test_report();
        let temp_file = NamedTempFile::new().unwrap();

        write_report(&report, temp_file.path()).unwrap();
        let loaded = read_report(temp_file.path()).unwrap();

        assert_eq!(loaded, report.entries);
    }

    #[test]
    fn test_encode_empty_report() {
        let bytes = encode_report(&RankedReport::default()).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "[]\n");
    }

    #[test]
    fn test_encode_field_order() {
        let text = String::from_utf8(encode_report(&create_test_report()).unwrap()).unwrap();

        let method = text.find("\"method\"").unwrap();
        let calls = text.find("\"calls\"").unwrap();
        let avg = text.find("\"avg_ms\"").unwrap();
        let total = text.find("\"total_ms\"").unwrap();
        let max = text.find("\"max_ms\"").unwrap();
        assert!(method < calls && calls < avg && avg < total && total < max);
    }

    #[test]
    fn test_encode_escapes_identifier() {
        let report = RankedReport::new(vec![RankedEntry {
            identifier: "say \"hi\"\n\ttab\\".to_string(),
            call_count: 1,
            avg_millis: 1.0,
            total_millis: 1.0,
            max_millis: 1.0,
        }]);

        let text = String::from_utf8(encode_report(&report).unwrap()).unwrap();
        assert!(text.contains(r#""say \"hi\"\n\ttab\\""#));

        let parsed: Vec<RankedEntry> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed[0].identifier, "say \"hi\"\n\ttab\\");
    }

    #[test]
    fn test_validate_output_path_empty() {
        assert!(validate_output_path(Path::new("")).is_err());
    }

    #[test]
    fn test_validate_output_path_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = validate_output_path(temp_dir.path());
        assert!(matches!(result, Err(OutputError::InvalidPath(_))));
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested_path = temp_dir.path().join("nested/dirs/latency.json");

        write_report(&create_test_report(), &nested_path).unwrap();

        assert!(nested_path.exists());
    }

    #[test]
    fn test_read_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = read_report(temp_dir.path().join("missing.json"));
        assert!(matches!(result, Err(OutputError::WriteFailed(_))));
    }
}
