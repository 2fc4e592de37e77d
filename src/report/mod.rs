//! Terminal report generation.
//!
//! A dump snapshots the aggregator, ranks the slowest identifiers, prints
//! the table to the diagnostic stream and persists the JSON report.

pub mod dump;

pub use dump::{dump, dump_to};
