//! Demo command implementation.
//!
//! The demo command:
//! 1. Starts an agent from the option string
//! 2. Runs a synthetic workload on several threads through probes
//! 3. Dumps the ranked report

use crate::agent::LatencyAgent;
use crate::hooks::Probe;
use crate::parser::options::is_known_option;
use crate::parser::schema::RankedReport;
use anyhow::Result;
use log::{info, warn};
use std::hint::black_box;
use std::time::{Duration, Instant};

/// Arguments for the demo command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct DemoArgs {
    /// Agent option string (`key=value;...`)
    pub options: Option<String>,

    /// Worker threads recording concurrently
    pub threads: usize,

    /// Workload iterations per thread
    pub iterations: usize,
}

impl Default for DemoArgs {
    fn default() -> Self {
        Self {
            options: None,
            threads: 4,
            iterations: 200,
        }
    }
}

/// Execute the demo command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// The report produced by the terminal dump
pub fn execute_demo(args: DemoArgs) -> Result<RankedReport> {
    let start_time = Instant::now();

    warn_unknown_options(args.options.as_deref());

    info!("Step 1/3: Starting agent...");
    let agent = LatencyAgent::start(args.options.as_deref());

    info!(
        "Step 2/3: Running workload on {} threads x {} iterations...",
        args.threads, args.iterations
    );
    std::thread::scope(|scope| {
        for worker in 0..args.threads {
            let probe = agent.probe();
            let iterations = args.iterations;
            scope.spawn(move || run_worker(&probe, worker, iterations));
        }
    });

    info!("Step 3/3: Dumping report...");
    let report = agent
        .shutdown()
        .ok_or_else(|| anyhow::anyhow!("Agent was already shut down"))?;

    info!("Demo completed in {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(report)
}

/// One worker's share of the synthetic workload
///
/// **Private** - each operation is timed under its own identifier
fn run_worker(probe: &Probe, worker: usize, iterations: usize) {
    for i in 0..iterations {
        probe.time("demo::Catalog.lookup", || checksum(64 + (i % 16)));

        if i % 4 == 0 {
            let _span = probe.span("demo::Orders.persist");
            std::thread::sleep(Duration::from_micros(50));
        }

        if (i + worker) % 10 == 0 {
            probe.time("demo::Pricing.recompute", || {
                let token = probe.enter();
                let total = checksum(4_096);
                probe.exit("demo::Pricing.loadRules", token);
                total
            });
        }
    }
}

fn checksum(rounds: usize) -> u64 {
    (0..rounds as u64).fold(0u64, |acc, x| black_box(acc.wrapping_mul(31).wrapping_add(x)))
}

/// Warn about option keys the parser will ignore
fn warn_unknown_options(options: Option<&str>) {
    let Some(options) = options else {
        return;
    };

    for segment in options.split(';').filter(|s| !s.trim().is_empty()) {
        let key = segment.split('=').next().unwrap_or_default();
        if !is_known_option(key) {
            warn!("Unknown agent option will be ignored: {}", key.trim());
        }
    }
}

/// Validate demo arguments
///
/// **Public** - can be called before execute_demo for early validation
pub fn validate_args(args: &DemoArgs) -> Result<()> {
    if args.threads == 0 {
        anyhow::bail!("threads must be greater than 0");
    }

    if args.threads > 256 {
        anyhow::bail!("threads is too large (max 256)");
    }

    if args.iterations == 0 {
        anyhow::bail!("iterations must be greater than 0");
    }

    Ok(())
}
