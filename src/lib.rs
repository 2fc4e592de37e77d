//! Latency Agent
//!
//! Records how long labeled operations take and reports the slowest
//! ones, with bounded memory and negligible overhead on the hot path.
//!
//! ## Getting Started
//!
//! ```ignore
//! use latency_agent::agent::LatencyAgent;
//!
//! let guard = LatencyAgent::from_env().dump_on_exit();
//! let probe = guard.agent().unwrap().probe();
//!
//! let token = probe.enter();
//! // ... the call being measured ...
//! probe.exit("Service.handle", token);
//! ```
//!
//! Options come from `LATENCY_AGENT_OPTS`, e.g.
//! `minmicros=100;top=20;output=target/latency.json`.

pub mod agent;
pub mod aggregator;
pub mod commands;
pub mod hooks;
pub mod output;
pub mod parser;
pub mod report;
pub mod utils;

pub use agent::{LatencyAgent, ShutdownGuard};
pub use aggregator::{StatSnapshot, StatsAggregator};
pub use hooks::{Probe, Span, Token};
pub use parser::{parse_options, AgentConfig, RankedEntry, RankedReport};
