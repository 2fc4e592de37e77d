//! Parser for the agent option string.
//!
//! The host hands the agent a single string of `key=value` pairs separated
//! by `;`. Parsing is best-effort: unknown keys are skipped and malformed
//! values keep their default, so this never fails.

use super::schema::AgentConfig;
use crate::utils::config::{NANOS_PER_MICRO, OPTIONS_ENV_VAR, OPTION_KEYS};
use log::debug;
use std::path::PathBuf;

/// Parse an option string into an `AgentConfig`
///
/// **Public** - main entry point for configuration
///
/// # Arguments
/// * `options` - Raw option string, `None` or empty for defaults
///
/// # Example
/// ```ignore
/// let config = parse_options(Some("include=com.foo,com.bar;top=5;verbose=true"));
/// assert_eq!(config.top_n, 5);
/// ```
pub fn parse_options(options: Option<&str>) -> AgentConfig {
    let mut config = AgentConfig::default();

    let Some(options) = options else {
        return config;
    };

    for (key, value) in split_pairs(options) {
        match key.as_str() {
            "include" => config.include_patterns = split_patterns(value),
            "exclude" => config.exclude_patterns = split_patterns(value),
            "minmicros" => match value.parse::<u64>() {
                Ok(micros) => config.min_duration_nanos = micros.saturating_mul(NANOS_PER_MICRO),
                Err(e) => debug!("Ignoring minmicros={:?}: {}", value, e),
            },
            "top" => match value.parse::<usize>() {
                Ok(top) if top > 0 => config.top_n = top,
                Ok(_) => debug!("Ignoring non-positive top={}", value),
                Err(e) => debug!("Ignoring top={:?}: {}", value, e),
            },
            "verbose" => match parse_bool(value) {
                Some(verbose) => config.verbose = verbose,
                None => debug!("Ignoring verbose={:?}: not a boolean", value),
            },
            "output" => {
                if !value.is_empty() {
                    config.output_path = PathBuf::from(value);
                }
            }
            _ => debug!("Ignoring unknown option: {}", key),
        }
    }

    config
}

impl AgentConfig {
    /// Parse from the `LATENCY_AGENT_OPTS` environment variable
    ///
    /// **Public** - used when the host provides options through the environment
    pub fn from_env() -> Self {
        let options = std::env::var(OPTIONS_ENV_VAR).ok();
        parse_options(options.as_deref())
    }

    /// Parse from an option string
    pub fn from_options(options: &str) -> Self {
        parse_options(Some(options))
    }
}

/// Split the raw string into `(lowercased key, trimmed value)` pairs
///
/// **Private** - segments without `=` are dropped
fn split_pairs(options: &str) -> impl Iterator<Item = (String, &str)> {
    options.split(';').filter_map(|segment| {
        let (key, value) = segment.split_once('=')?;
        let key = key.trim().to_ascii_lowercase();
        if key.is_empty() {
            return None;
        }
        Some((key, value.trim()))
    })
}

/// Split a comma-separated pattern list
///
/// **Private** - blank elements are dropped
fn split_patterns(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a boolean flag, `None` when malformed
fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Check whether a key is one the parser understands
///
/// **Public** - used by the CLI to warn about typos
pub fn is_known_option(key: &str) -> bool {
    let key = key.trim().to_ascii_lowercase();
    OPTION_KEYS.contains(&key.as_str())
}
