use anyhow::{Context, Result};
use tracing::info;

use crate::db::DbPool;
use crate::types::{Passenger, StagedPassenger, StagedTicket};

/// Age applied when a staged passenger has none.
const DEFAULT_AGE: f64 = 30.0;
/// Embarkation port applied when a staged passenger has none.
const DEFAULT_EMBARKED: &str = "S";

#[derive(Debug, Clone, Copy)]
pub struct PromotionCounts {
    pub passengers: usize,
    pub tickets: usize,
}

/// Applies the imputation rules to one staged passenger row.
///
/// family_size counts the passenger themself, so it is at least 1 even when
/// both sibsp and parch are missing.
pub fn promote_passenger(row: StagedPassenger) -> Passenger {
    Passenger {
        passenger_id: row.passenger_id,
        name: row.name.map(|name| name.trim().to_string()),
        sex: row.sex.map(|sex| sex.to_lowercase()),
        age: row.age.unwrap_or(DEFAULT_AGE),
        family_size: row.sibsp.unwrap_or(0) + row.parch.unwrap_or(0) + 1,
        embarked: row.embarked.unwrap_or_else(|| DEFAULT_EMBARKED.to_string()),
    }
}

/// Moves staged rows into the final tables inside one transaction.
///
/// Finals are cleared first (tickets before passengers, respecting the
/// referential relationship), then every staged passenger and ticket is
/// upserted keyed on its primary key, so re-running with identical staging
/// contents yields identical final contents.
pub async fn promote(pool: &DbPool) -> Result<PromotionCounts> {
    let mut tx = pool
        .begin()
        .await
        .context("failed to open promotion transaction")?;

    sqlx::query("DELETE FROM tickets")
        .execute(&mut *tx)
        .await
        .context("failed to clear tickets")?;
    sqlx::query("DELETE FROM passengers")
        .execute(&mut *tx)
        .await
        .context("failed to clear passengers")?;

    let staged: Vec<StagedPassenger> = sqlx::query_as(
        "SELECT passenger_id, name, sex, age, sibsp, parch, fare, embarked FROM staging_passengers",
    )
    .fetch_all(&mut *tx)
    .await
    .context("failed to read staging_passengers")?;

    let passenger_count = staged.len();
    for row in staged {
        let passenger = promote_passenger(row);
        sqlx::query(
            r#"
                INSERT INTO passengers (passenger_id, name, sex, age, family_size, embarked)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (passenger_id) DO UPDATE SET
                    name = EXCLUDED.name,
                    sex = EXCLUDED.sex,
                    age = EXCLUDED.age,
                    family_size = EXCLUDED.family_size,
                    embarked = EXCLUDED.embarked
            "#,
        )
        .bind(passenger.passenger_id)
        .bind(&passenger.name)
        .bind(&passenger.sex)
        .bind(passenger.age)
        .bind(passenger.family_size)
        .bind(&passenger.embarked)
        .execute(&mut *tx)
        .await
        .context("failed to upsert into passengers")?;
    }

    let staged_tickets: Vec<StagedTicket> = sqlx::query_as(
        "SELECT ticket_id, passenger_id, ticket AS ticket_number, class, cabin FROM staging_tickets",
    )
    .fetch_all(&mut *tx)
    .await
    .context("failed to read staging_tickets")?;

    // The ticket/passenger link is intentionally unenforced; a staged
    // ticket whose passenger is absent from the final table still lands.
    let ticket_count = staged_tickets.len();
    for ticket in staged_tickets {
        sqlx::query(
            r#"
                INSERT INTO tickets (ticket_id, passenger_id, ticket_number, class, cabin)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (ticket_id) DO UPDATE SET
                    passenger_id = EXCLUDED.passenger_id,
                    ticket_number = EXCLUDED.ticket_number,
                    class = EXCLUDED.class,
                    cabin = EXCLUDED.cabin
            "#,
        )
        .bind(ticket.ticket_id)
        .bind(ticket.passenger_id)
        .bind(&ticket.ticket_number)
        .bind(ticket.class)
        .bind(&ticket.cabin)
        .execute(&mut *tx)
        .await
        .context("failed to upsert into tickets")?;
    }

    tx.commit()
        .await
        .context("failed to commit promotion transaction")?;

    info!(
        passengers = passenger_count,
        tickets = ticket_count,
        "staging rows promoted to final tables"
    );
    Ok(PromotionCounts {
        passengers: passenger_count,
        tickets: ticket_count,
    })
}
