//! oltmgrd daemon entry point.
//!
//! Builds the topology from a YAML file, applies provisioning requests and
//! optionally dumps the resulting abstract chassis state as JSON.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use olt_backend::{LoggingBackend, ProvisioningBackend};
use olt_orch::ProvisionOrch;
use oltmgrd::{dump_onts, load_requests, run_until_idle, OltMgrConfig};

/// Abstract OLT provisioning daemon
#[derive(Parser, Debug)]
#[command(name = "oltmgrd")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Topology file (YAML)
    #[arg(short = 'c', long)]
    config: PathBuf,

    /// Provisioning requests to apply (JSON or YAML list)
    #[arg(short = 'r', long)]
    requests: Option<PathBuf>,

    /// Print provisioned ONTs as JSON when done
    #[arg(short = 'd', long)]
    dump: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Retries for transient backend failures (overrides the topology file)
    #[arg(long)]
    max_retries: Option<u32>,
}

/// Initialize tracing/logging. RUST_LOG takes precedence over `log_level`.
fn init_logging(log_level: &str, json: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().with_target(true).json())
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_thread_ids(false))
            .init();
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = OltMgrConfig::load(&args.config)
        .with_context(|| format!("loading topology {}", args.config.display()))?;

    let backend: Arc<dyn ProvisioningBackend> = Arc::new(LoggingBackend::new());
    info!("Using {} backend", backend.name());
    let topology = config.build_topology(backend)?;

    let mut orch_config = config.orch_config();
    if let Some(max_retries) = args.max_retries {
        orch_config.max_retries = max_retries;
    }
    let mut orch = ProvisionOrch::new(topology, orch_config);

    if let Some(path) = &args.requests {
        let requests = load_requests(path)
            .with_context(|| format!("loading requests {}", path.display()))?;
        info!("Queued {} request(s) from {}", requests.len(), path.display());
        orch.add_requests(requests);
    }

    run_until_idle(&mut orch, Duration::from_millis(config.orch.retry_interval_ms)).await;

    let stats = orch.stats();
    info!(
        "Processed {} request(s): {} succeeded, {} invalid, {} failed, {} retried",
        stats.processed, stats.succeeded, stats.invalid, stats.failed, stats.retried
    );

    if args.dump {
        let records = dump_onts(orch.topology());
        println!("{}", serde_json::to_string_pretty(&records)?);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args.log_level, args.json_logs);

    info!("--- Starting oltmgrd ---");

    match run(args).await {
        Ok(()) => {
            info!("oltmgrd exiting normally");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("oltmgrd error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
