//! Patient Manager - interactive FHIR Patient client
//!
//! Usage:
//!   patient-manager [--base-url <url>] [--config <file>] [--timeout <secs>] [--log-level <level>]
//!
//! Commands are read line by line from stdin, so a script can be piped in as well.

mod config;
mod console;
mod logging;
mod shell;

use anyhow::Context;
use clap::Parser;
use console::ConsoleSink;
use ferrum_patient_client::{HttpTransport, PatientSession};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::config::ClientConfig;
use crate::shell::Shell;

#[derive(Parser, Debug)]
#[command(name = "patient-manager")]
#[command(about = "Create, search, update and delete FHIR Patient resources")]
#[command(version)]
struct Args {
    /// FHIR server base URL (overrides configuration)
    #[arg(short, long)]
    base_url: Option<String>,

    /// Configuration file (defaults to ./patient-manager.{toml,yaml,json} when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Request timeout in seconds (overrides configuration)
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Log level for this application (overrides configuration)
    #[arg(long)]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config =
        ClientConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    apply_overrides(&mut config, &args);
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    let _logging_guard =
        logging::init_logging(&config.logging).context("Failed to initialize logging")?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = %config.fhir.base_url,
        timeout_seconds = config.fhir.timeout_seconds,
        "Starting patient manager"
    );

    let transport = HttpTransport::with_timeout(Duration::from_secs(config.fhir.timeout_seconds))
        .context("Failed to build HTTP client")?;
    let session = PatientSession::new(
        config.fhir.base_url.trim(),
        Arc::new(transport),
        Arc::new(ConsoleSink),
    );

    let input = BufReader::new(tokio::io::stdin()).lines();
    Shell::new(session, input).run().await?;

    tracing::info!("Patient manager finished");
    Ok(())
}

fn apply_overrides(config: &mut ClientConfig, args: &Args) {
    if let Some(base_url) = &args.base_url {
        config.fhir.base_url = base_url.clone();
    }
    if let Some(timeout) = args.timeout {
        config.fhir.timeout_seconds = timeout;
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    if args.log_json {
        config.logging.json = true;
    }
}
