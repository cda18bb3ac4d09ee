use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Result};
use clap::Parser;
use manifest_core::config::DbConfig;
use manifest_core::db;
use manifest_core::pipeline::{execute_run, RunRequest};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about = "Passenger manifest ETL pipeline", long_about = None)]
struct Cli {
    /// Path to the passengers CSV file
    #[arg(long)]
    passengers: PathBuf,

    /// Path to a tickets CSV file; placeholder tickets are synthesized
    /// from the passenger rows when omitted
    #[arg(long)]
    tickets: Option<PathBuf>,
}

/// Installs the run-scoped logging context: timestamped lines to stdout
/// and to logs/manifest-etl.log. The returned guard must stay alive until
/// the run ends so buffered file output is flushed.
fn init_logging() -> tracing_appender::non_blocking::WorkerGuard {
    let _ = std::fs::create_dir_all("logs");
    let file_appender = tracing_appender::rolling::never("logs", "manifest-etl.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(std::io::stdout))
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();

    guard
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let _guard = init_logging();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("pipeline failed: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    info!("starting manifest ETL run");

    check_input_files(&cli.passengers, cli.tickets.as_deref())?;

    let config = DbConfig::from_env()?;
    let pool = db::connect(&config).await?;

    let summary = execute_run(
        &pool,
        RunRequest {
            passengers_csv: cli.passengers,
            tickets_csv: cli.tickets,
        },
    )
    .await?;

    info!(
        passengers = summary.passengers,
        tickets = summary.tickets,
        "pipeline completed successfully"
    );
    Ok(())
}

/// Input paths are verified before any database work happens.
fn check_input_files(passengers: &Path, tickets: Option<&Path>) -> Result<()> {
    if !passengers.is_file() {
        bail!("passengers file not found: {}", passengers.display());
    }
    if let Some(tickets) = tickets {
        if !tickets.is_file() {
            bail!("tickets file not found: {}", tickets.display());
        }
    }
    Ok(())
}
