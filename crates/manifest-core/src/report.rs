use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::info;

use crate::db::DbPool;
use crate::types::SummaryRow;

/// Reads the precomputed `analytics_summary` view, busiest groups first.
/// The aggregation itself lives in the view definition.
pub async fn fetch_summary(pool: &DbPool) -> Result<Vec<SummaryRow>> {
    sqlx::query_as(
        r#"
            SELECT sex, embarked, avg_age, passenger_count
            FROM analytics_summary
            ORDER BY passenger_count DESC
        "#,
    )
    .fetch_all(pool)
    .await
    .context("failed to read analytics_summary")
}

/// Renders the summary rows as a Sex | Port | Avg Age | Count table.
pub fn render(rows: &[SummaryRow]) -> String {
    let mut table = Table::new();
    table.set_header(["Sex", "Port", "Avg Age", "Count"]);
    for row in rows {
        table.add_row([
            row.sex.clone(),
            row.embarked.clone(),
            format!("{:.1}", row.avg_age),
            row.passenger_count.to_string(),
        ]);
    }
    table.to_string()
}

/// Emits the rendered report through the log stream, one line at a time so
/// every line carries a timestamp.
pub fn log_summary(rows: &[SummaryRow]) {
    info!("analytics results ({} groups):", rows.len());
    for line in render(rows).lines() {
        info!("{line}");
    }
}
