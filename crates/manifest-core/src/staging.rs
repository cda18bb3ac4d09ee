use anyhow::{Context, Result};
use tracing::info;

use crate::db::DbPool;
use crate::normalize::RecordBatch;

/// Replaces the contents of both staging tables with the batch, atomically.
/// Either both table loads land or neither does.
pub async fn load_to_staging(pool: &DbPool, batch: &RecordBatch) -> Result<()> {
    let mut tx = pool
        .begin()
        .await
        .context("failed to open staging transaction")?;

    sqlx::query("TRUNCATE TABLE staging_passengers, staging_tickets RESTART IDENTITY")
        .execute(&mut *tx)
        .await
        .context("failed to truncate staging tables")?;

    for passenger in &batch.passengers {
        sqlx::query(
            r#"
                INSERT INTO staging_passengers
                    (passenger_id, name, sex, age, sibsp, parch, fare, embarked)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(passenger.passenger_id)
        .bind(&passenger.name)
        .bind(&passenger.sex)
        .bind(passenger.age)
        .bind(passenger.sibsp)
        .bind(passenger.parch)
        .bind(passenger.fare)
        .bind(&passenger.embarked)
        .execute(&mut *tx)
        .await
        .context("failed to insert into staging_passengers")?;
    }

    for ticket in &batch.tickets {
        sqlx::query(
            r#"
                INSERT INTO staging_tickets (ticket_id, passenger_id, ticket, class, cabin)
                VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(ticket.ticket_id)
        .bind(ticket.passenger_id)
        .bind(&ticket.ticket_number)
        .bind(ticket.class)
        .bind(&ticket.cabin)
        .execute(&mut *tx)
        .await
        .context("failed to insert into staging_tickets")?;
    }

    tx.commit()
        .await
        .context("failed to commit staging transaction")?;

    info!(
        passengers = batch.passengers.len(),
        tickets = batch.tickets.len(),
        "staging tables loaded"
    );
    Ok(())
}
