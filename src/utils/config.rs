//! Defaults and constants shared by the agent and the CLI.

/// Default path for the persisted JSON report
pub const DEFAULT_OUTPUT_PATH: &str = "latency-metrics.json";

/// Default number of ranked entries in a report
pub const DEFAULT_TOP_N: usize = 10;

/// Environment variable holding the agent option string
pub const OPTIONS_ENV_VAR: &str = "LATENCY_AGENT_OPTS";

/// Prefix for every line the agent writes to the diagnostic stream
pub const LOG_PREFIX: &str = "[latency-agent]";

// Unit conversions
pub const NANOS_PER_MICRO: u64 = 1_000;
pub const NANOS_PER_MILLI: f64 = 1_000_000.0;

// Recognized option keys (matched case-insensitively)
pub const OPTION_KEYS: &[&str] = &["include", "exclude", "minmicros", "top", "verbose", "output"];
