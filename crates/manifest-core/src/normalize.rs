use manifest_parser::tickets::{PLACEHOLDER_CABIN, PLACEHOLDER_CLASS};
use manifest_parser::{PassengerRow, TicketRow};
use tracing::info;

/// The normalized batch handed to the staging loader.
#[derive(Debug, Clone)]
pub struct RecordBatch {
    pub passengers: Vec<PassengerRow>,
    pub tickets: Vec<TicketRow>,
}

/// Assembles the batch for staging. Tickets are synthesized from the
/// passenger rows when no ticket source was supplied.
pub fn build_batch(passengers: Vec<PassengerRow>, tickets: Option<Vec<TicketRow>>) -> RecordBatch {
    let missing_ages = passengers.iter().filter(|p| p.age.is_none()).count();
    info!(
        rows = passengers.len(),
        missing_ages, "passenger batch prepared; missing ages will be imputed"
    );

    let tickets = tickets.unwrap_or_else(|| synthesize_tickets(&passengers));

    RecordBatch {
        passengers,
        tickets,
    }
}

/// One placeholder ticket per passenger, in passenger row order.
pub fn synthesize_tickets(passengers: &[PassengerRow]) -> Vec<TicketRow> {
    passengers
        .iter()
        .enumerate()
        .map(|(idx, passenger)| TicketRow {
            ticket_id: passenger.passenger_id,
            passenger_id: passenger.passenger_id,
            ticket_number: format!("T{}", idx + 1),
            class: PLACEHOLDER_CLASS,
            cabin: PLACEHOLDER_CABIN.to_string(),
        })
        .collect()
}
