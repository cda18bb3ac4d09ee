use serde::{Deserialize, Serialize};

/// One passenger row in the canonical schema. Non-key fields stay optional
/// so that absent columns and empty cells survive unchanged into staging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassengerRow {
    pub passenger_id: i64,
    pub name: Option<String>,
    pub sex: Option<String>,
    pub age: Option<f64>,
    pub sibsp: Option<i64>,
    pub parch: Option<i64>,
    pub fare: Option<f64>,
    pub embarked: Option<String>,
}

/// One ticket row, either parsed from a tickets CSV or synthesized from the
/// passenger batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketRow {
    pub ticket_id: i64,
    pub passenger_id: i64,
    pub ticket_number: String,
    pub class: i64,
    pub cabin: String,
}
