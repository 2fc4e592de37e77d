//! Latency Agent CLI
//!
//! Runs a demo workload through the agent and inspects persisted reports.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use latency_agent::commands::{
    display_schema, display_version, execute_demo, log_level, validate_args, validate_report_file,
    DemoArgs,
};
use latency_agent::utils::config::OPTIONS_ENV_VAR;

/// Latency Agent - method latency recording and ranked reports
#[derive(Parser, Debug)]
#[command(name = "latency-agent")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a synthetic multi-threaded workload and dump its report
    Demo {
        /// Agent options (`key=value;...`)
        #[arg(short, long, env = OPTIONS_ENV_VAR)]
        options: Option<String>,

        /// Number of worker threads
        #[arg(short, long, default_value = "4")]
        threads: usize,

        /// Iterations per worker
        #[arg(short, long, default_value = "200")]
        iterations: usize,
    },

    /// Validate a persisted report file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display report schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging, agent options may ask for verbose diagnostics too
    let agent_options = match &cli.command {
        Commands::Demo { options, .. } => options.as_deref(),
        _ => None,
    };
    let level = log_level(cli.verbose, agent_options);
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    // Execute command
    match cli.command {
        Commands::Demo {
            options,
            threads,
            iterations,
        } => {
            let args = DemoArgs {
                options,
                threads,
                iterations,
            };

            // Validate args first
            validate_args(&args)?;

            execute_demo(args)?;
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
