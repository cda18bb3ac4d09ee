use std::env;
use std::io::Write;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

use manifest_core::pipeline::{execute_run, RunRequest};
use manifest_core::promote;

const PASSENGERS_CSV: &str = "\
PassengerId,Name,Sex,Age,SibSp,Parch,Embarked
1, Alice ,Female,,1,0,C
2,Bob,Male,40,0,0,
";

const TEST_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS staging_passengers (
    passenger_id BIGINT,
    name TEXT,
    sex TEXT,
    age DOUBLE PRECISION,
    sibsp BIGINT,
    parch BIGINT,
    fare DOUBLE PRECISION,
    embarked TEXT
);
CREATE TABLE IF NOT EXISTS staging_tickets (
    ticket_id BIGINT,
    passenger_id BIGINT,
    ticket TEXT,
    class BIGINT,
    cabin TEXT
);
CREATE TABLE IF NOT EXISTS passengers (
    passenger_id BIGINT PRIMARY KEY,
    name TEXT,
    sex TEXT,
    age DOUBLE PRECISION NOT NULL,
    family_size BIGINT NOT NULL,
    embarked TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS tickets (
    ticket_id BIGINT PRIMARY KEY,
    passenger_id BIGINT NOT NULL,
    ticket_number TEXT NOT NULL,
    class BIGINT NOT NULL,
    cabin TEXT NOT NULL
);
CREATE OR REPLACE VIEW analytics_summary AS
    SELECT sex, embarked, AVG(age) AS avg_age, COUNT(*) AS passenger_count
    FROM passengers
    GROUP BY sex, embarked;
"#;

fn write_csv(dir: &tempfile::TempDir, name: &str, contents: &str) -> Result<std::path::PathBuf> {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path)?;
    file.write_all(contents.as_bytes())?;
    Ok(path)
}

async fn connect_and_reset(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url)
        .await?;

    sqlx::raw_sql(TEST_SCHEMA).execute(&pool).await?;
    sqlx::query("TRUNCATE TABLE staging_passengers, staging_tickets, passengers, tickets")
        .execute(&pool)
        .await?;

    Ok(pool)
}

// The whole scenario runs as one test so the shared tables are never
// touched by two tests at once.
#[tokio::test]
async fn pipeline_roundtrip_when_database_available() -> Result<()> {
    let database_url = match env::var("MANIFEST_TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping pipeline test because MANIFEST_TEST_DATABASE_URL is not set");
            return Ok(());
        }
    };

    let pool = connect_and_reset(&database_url).await?;
    let dir = tempfile::tempdir()?;
    let passengers_csv = write_csv(&dir, "passengers.csv", PASSENGERS_CSV)?;

    let summary = execute_run(
        &pool,
        RunRequest {
            passengers_csv,
            tickets_csv: None,
        },
    )
    .await?;

    assert_eq!(summary.passengers, 2);
    assert_eq!(summary.tickets, 2);

    let rows = sqlx::query(
        "SELECT passenger_id, name, sex, age, family_size, embarked FROM passengers ORDER BY passenger_id",
    )
    .fetch_all(&pool)
    .await?;
    assert_eq!(rows.len(), 2);

    let alice = &rows[0];
    assert_eq!(alice.get::<String, _>("name"), "Alice");
    assert_eq!(alice.get::<String, _>("sex"), "female");
    assert_eq!(alice.get::<f64, _>("age"), 30.0);
    assert_eq!(alice.get::<i64, _>("family_size"), 2);
    assert_eq!(alice.get::<String, _>("embarked"), "C");

    let bob = &rows[1];
    assert_eq!(bob.get::<f64, _>("age"), 40.0);
    assert_eq!(bob.get::<i64, _>("family_size"), 1);
    assert_eq!(bob.get::<String, _>("embarked"), "S");

    let tickets = sqlx::query(
        "SELECT ticket_id, passenger_id, ticket_number, class, cabin FROM tickets ORDER BY ticket_id",
    )
    .fetch_all(&pool)
    .await?;
    assert_eq!(tickets.len(), 2);
    assert_eq!(tickets[0].get::<i64, _>("ticket_id"), 1);
    assert_eq!(tickets[0].get::<String, _>("ticket_number"), "T1");
    assert_eq!(tickets[1].get::<String, _>("ticket_number"), "T2");
    assert_eq!(tickets[0].get::<i64, _>("class"), 3);
    assert_eq!(tickets[0].get::<String, _>("cabin"), "Unknown");

    // Promotion is idempotent: a second pass over identical staging
    // contents leaves the finals unchanged.
    promote::promote(&pool).await?;
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM passengers")
        .fetch_one(&pool)
        .await?;
    assert_eq!(count, 2);
    let alice_age: f64 = sqlx::query_scalar("SELECT age FROM passengers WHERE passenger_id = 1")
        .fetch_one(&pool)
        .await?;
    assert_eq!(alice_age, 30.0);

    let summary_rows = sqlx::query(
        "SELECT sex, embarked, avg_age, passenger_count FROM analytics_summary ORDER BY passenger_count DESC",
    )
    .fetch_all(&pool)
    .await?;
    assert_eq!(summary_rows.len(), 2);

    // A staged ticket with a NULL ticket number cannot be promoted; the
    // whole transaction must roll back, keeping the previous finals.
    sqlx::query(
        "INSERT INTO staging_tickets (ticket_id, passenger_id, ticket, class, cabin) VALUES (99, 1, NULL, 3, 'Unknown')",
    )
    .execute(&pool)
    .await?;

    assert!(promote::promote(&pool).await.is_err());

    let passenger_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM passengers")
        .fetch_one(&pool)
        .await?;
    assert_eq!(passenger_count, 2);
    let ticket_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tickets")
        .fetch_one(&pool)
        .await?;
    assert_eq!(ticket_count, 2);

    Ok(())
}
