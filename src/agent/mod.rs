//! Agent lifecycle.
//!
//! `LatencyAgent` is the single construction point: it parses the options,
//! owns the aggregator, hands out probes and runs the terminal dump once.

use crate::aggregator::StatsAggregator;
use crate::hooks::Probe;
use crate::parser::schema::{AgentConfig, RankedReport};
use crate::report::dump;
use crate::utils::config::LOG_PREFIX;
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Running agent
#[derive(Debug)]
pub struct LatencyAgent {
    config: Arc<AgentConfig>,
    aggregator: Arc<StatsAggregator>,
    dumped: AtomicBool,
}

impl LatencyAgent {
    /// Start an agent from an option string
    ///
    /// **Public** - main entry point for embedders
    ///
    /// # Example
    /// ```ignore
    /// let agent = LatencyAgent::start(Some("minmicros=50;top=5"));
    /// let probe = agent.probe();
    /// probe.time("Service.handle", || handle(request));
    /// agent.shutdown();
    /// ```
    pub fn start(options: Option<&str>) -> Self {
        Self::with_config(crate::parser::parse_options(options))
    }

    /// Start an agent from `LATENCY_AGENT_OPTS`
    pub fn from_env() -> Self {
        Self::with_config(AgentConfig::from_env())
    }

    /// Start an agent from an already-built configuration
    pub fn with_config(config: AgentConfig) -> Self {
        if config.verbose {
            eprintln!("{} Verbose mode on, logging agent diagnostics", LOG_PREFIX);
            debug!(
                "Include patterns: {:?}, exclude patterns: {:?}",
                config.include_patterns, config.exclude_patterns
            );
        }

        let aggregator = Arc::new(StatsAggregator::with_config(&config));

        eprintln!("{}", config.banner());
        info!("Latency agent started, report goes to {}", config.output_path.display());

        Self {
            config: Arc::new(config),
            aggregator,
            dumped: AtomicBool::new(false),
        }
    }

    /// Hooks feeding this agent's aggregator
    pub fn probe(&self) -> Probe {
        Probe::new(Arc::clone(&self.aggregator))
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn aggregator(&self) -> &Arc<StatsAggregator> {
        &self.aggregator
    }

    /// Run the terminal dump
    ///
    /// **Public** - only the first call dumps; later calls return `None`
    pub fn shutdown(&self) -> Option<RankedReport> {
        if self.dumped.swap(true, Ordering::AcqRel) {
            debug!("Dump already performed, skipping");
            return None;
        }
        Some(dump(&self.aggregator, &self.config))
    }

    /// Has the terminal dump run
    pub fn is_shut_down(&self) -> bool {
        self.dumped.load(Ordering::Acquire)
    }

    /// Wrap the agent so it dumps when the guard goes out of scope
    ///
    /// Hold the guard in `main` to get a dump at process exit.
    pub fn dump_on_exit(self) -> ShutdownGuard {
        ShutdownGuard { agent: Some(self) }
    }
}

/// Dumps the wrapped agent when dropped
#[must_use = "the dump runs when the guard is dropped"]
#[derive(Debug)]
pub struct ShutdownGuard {
    agent: Option<LatencyAgent>,
}

impl ShutdownGuard {
    pub fn agent(&self) -> Option<&LatencyAgent> {
        self.agent.as_ref()
    }

    /// Dump now and return the report
    pub fn finish(mut self) -> Option<RankedReport> {
        self.agent.take().and_then(|agent| agent.shutdown())
    }
}

impl Drop for ShutdownGuard {
    fn drop(&mut self) {
        if let Some(agent) = self.agent.take() {
            agent.shutdown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options_in(dir: &tempfile::TempDir) -> String {
        format!("top=3;output={}", dir.path().join("agent.json").display())
    }

    #[test]
    fn test_start_applies_options() {
        let agent = LatencyAgent::start(Some("minmicros=5;top=3"));
        assert_eq!(agent.config().top_n, 3);
        assert_eq!(agent.aggregator().min_duration_nanos(), 5_000);
    }

    #[test]
    fn test_probe_feeds_agent() {
        let agent = LatencyAgent::start(None);
        let probe = agent.probe();
        probe.exit("op", probe.enter());
        assert_eq!(agent.aggregator().len(), 1);
    }

    #[test]
    fn test_shutdown_dumps_once() {
        let dir = tempfile::tempdir().unwrap();
        let agent = LatencyAgent::start(Some(&options_in(&dir)));
        agent.aggregator().record("op", 10);

        let first = agent.shutdown();
        assert_eq!(first.map(|r| r.len()), Some(1));
        assert!(agent.is_shut_down());
        assert!(agent.shutdown().is_none());
        assert!(dir.path().join("agent.json").exists());
    }

    #[test]
    fn test_guard_dumps_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        {
            let guard = LatencyAgent::start(Some(&options_in(&dir))).dump_on_exit();
            guard.agent().unwrap().aggregator().record("op", 10);
        }
        assert!(dir.path().join("agent.json").exists());
    }

    #[test]
    fn test_guard_finish_returns_report() {
        let dir = tempfile::tempdir().unwrap();
        let guard = LatencyAgent::start(Some(&options_in(&dir))).dump_on_exit();
        guard.agent().unwrap().aggregator().record("op", 10);

        let report = guard.finish().unwrap();
        assert_eq!(report.entries[0].identifier, "op");
    }
}
