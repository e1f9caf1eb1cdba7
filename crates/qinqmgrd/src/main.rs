//! qinqmgrd - Q-in-Q Provisioning Manager Daemon
//!
//! Entry point for the qinqmgrd daemon.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use qinqmgrd::{run_daemon, DaemonOptions, CONFIG_ENV, DEFAULT_QUEUE_DEPTH};

/// Installs Q-in-Q tenant isolation rules on attaching switches.
#[derive(Debug, Parser)]
#[command(name = "qinqmgrd", version, about)]
struct Args {
    /// Group table (YAML, or JSON with a .json extension)
    #[arg(short, long, env = CONFIG_ENV)]
    config: PathBuf,

    /// Switch inventory to replay as attach events
    #[arg(short, long)]
    inventory: Option<PathBuf>,

    /// Pending add-flow requests allowed before submissions fail
    #[arg(long, default_value_t = DEFAULT_QUEUE_DEPTH)]
    queue_depth: usize,

    /// Log level when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Initializes tracing/logging subsystem
///
/// Logs go to stderr; stdout carries the submitted flows.
fn init_logging(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("invalid log level '{}'", level))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to set tracing subscriber: {}", e))
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = init_logging(&args.log_level) {
        eprintln!("qinqmgrd: {:#}", e);
        return ExitCode::FAILURE;
    }

    info!("--- Starting qinqmgrd ---");

    let options = DaemonOptions {
        config: args.config,
        inventory: args.inventory,
        queue_depth: args.queue_depth,
    };

    match run_daemon(options, tokio::io::stdout()).await {
        Ok(summary) => {
            info!(
                switches = summary.switches,
                installed = summary.installed,
                skipped = summary.skipped,
                failed = summary.failed,
                "qinqmgrd exiting normally"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("qinqmgrd error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
