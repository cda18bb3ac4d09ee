use serde::Serialize;
use sqlx::FromRow;

/// A passenger row as it comes back out of `staging_passengers`.
#[derive(Debug, Clone, FromRow)]
pub struct StagedPassenger {
    pub passenger_id: i64,
    pub name: Option<String>,
    pub sex: Option<String>,
    pub age: Option<f64>,
    pub sibsp: Option<i64>,
    pub parch: Option<i64>,
    pub fare: Option<f64>,
    pub embarked: Option<String>,
}

/// A ticket row as it comes back out of `staging_tickets`.
#[derive(Debug, Clone, FromRow)]
pub struct StagedTicket {
    pub ticket_id: i64,
    pub passenger_id: i64,
    pub ticket_number: String,
    pub class: i64,
    pub cabin: String,
}

/// The final shape of a passenger after default imputation. Age and
/// embarked are always present; name and sex stay optional because the
/// transform passes missing values through untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Passenger {
    pub passenger_id: i64,
    pub name: Option<String>,
    pub sex: Option<String>,
    pub age: f64,
    pub family_size: i64,
    pub embarked: String,
}

/// One row of the `analytics_summary` view.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SummaryRow {
    pub sex: String,
    pub embarked: String,
    pub avg_age: f64,
    pub passenger_count: i64,
}
