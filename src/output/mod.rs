//! Output writers for ranked reports.
//!
//! This module handles:
//! - JSON reports persisted to disk
//! - Fixed-width text tables for the diagnostic stream

pub mod json;
pub mod table;

// Re-export main functions
pub use json::{encode_report, read_report, write_report};
pub use table::{render_table, table_to_string};
