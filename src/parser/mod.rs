//! Option parsing and schema definitions.
//!
//! This module handles:
//! - Parsing the `key=value;...` agent option string
//! - Defining the immutable agent configuration
//! - Defining the ranked report schema persisted to JSON

pub mod options;
pub mod schema;

// Re-export main types
pub use options::parse_options;
pub use schema::{AgentConfig, RankedEntry, RankedReport};
