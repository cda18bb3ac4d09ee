use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use manifest_parser::{parse_passengers, parse_tickets};

use crate::db::DbPool;
use crate::normalize::build_batch;
use crate::types::SummaryRow;
use crate::{promote, report, staging};

/// Inputs for one pipeline run. Path existence has already been checked by
/// the caller before any database work started.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub passengers_csv: PathBuf,
    pub tickets_csv: Option<PathBuf>,
}

#[derive(Debug)]
pub struct RunSummary {
    pub passengers: usize,
    pub tickets: usize,
    pub summary: Vec<SummaryRow>,
}

/// Runs the full extract → stage → promote → report sequence. Each
/// transactional stage commits before the next begins; the first error
/// terminates the run.
pub async fn execute_run(pool: &DbPool, request: RunRequest) -> Result<RunSummary> {
    let contents = std::fs::read_to_string(&request.passengers_csv)
        .with_context(|| format!("failed to read {}", request.passengers_csv.display()))?;
    let passengers = parse_passengers(&contents)
        .with_context(|| format!("failed to parse {}", request.passengers_csv.display()))?;
    info!(
        rows = passengers.len(),
        path = %request.passengers_csv.display(),
        "passengers CSV loaded"
    );

    let tickets = match &request.tickets_csv {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let tickets = parse_tickets(&contents)
                .with_context(|| format!("failed to parse {}", path.display()))?;
            info!(rows = tickets.len(), path = %path.display(), "tickets CSV loaded");
            Some(tickets)
        }
        None => None,
    };

    let batch = build_batch(passengers, tickets);
    staging::load_to_staging(pool, &batch).await?;
    let counts = promote::promote(pool).await?;

    let summary = report::fetch_summary(pool).await?;
    report::log_summary(&summary);

    Ok(RunSummary {
        passengers: counts.passengers,
        tickets: counts.tickets,
        summary,
    })
}
