use std::collections::HashSet;

use csv::ReaderBuilder;

use crate::common::{parse_optional_i64, parse_required_i64};
use crate::errors::ParseError;
use crate::model::TicketRow;

const INPUT: &str = "tickets";

pub const PLACEHOLDER_CLASS: i64 = 3;
pub const PLACEHOLDER_CABIN: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnRole {
    TicketId,
    PassengerId,
    TicketNumber,
    Class,
    Cabin,
    Ignored,
}

fn classify_column(name: &str) -> ColumnRole {
    let trimmed = name.trim();
    if trimmed.eq_ignore_ascii_case("ticketid") {
        ColumnRole::TicketId
    } else if trimmed.eq_ignore_ascii_case("passengerid") {
        ColumnRole::PassengerId
    } else if trimmed.eq_ignore_ascii_case("ticket") || trimmed.eq_ignore_ascii_case("ticketnumber")
    {
        ColumnRole::TicketNumber
    } else if trimmed.eq_ignore_ascii_case("class") || trimmed.eq_ignore_ascii_case("pclass") {
        ColumnRole::Class
    } else if trimmed.eq_ignore_ascii_case("cabin") {
        ColumnRole::Cabin
    } else {
        ColumnRole::Ignored
    }
}

/// Parses a tickets CSV.
///
/// TicketId and PassengerId are required per row; the remaining fields fall
/// back to the same placeholders used when tickets are synthesized from the
/// passenger batch. Ticket ids must be unique across the file.
pub fn parse_tickets(content: &str) -> Result<Vec<TicketRow>, ParseError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = reader.records();

    let header = records
        .next()
        .ok_or(ParseError::MissingHeader { input: INPUT })?
        .map_err(|err| ParseError::Csv {
            input: INPUT,
            source: err,
        })?;

    let roles: Vec<ColumnRole> = header.iter().map(classify_column).collect();
    for (role, column) in [
        (ColumnRole::TicketId, "TicketId"),
        (ColumnRole::PassengerId, "PassengerId"),
    ] {
        if !roles.contains(&role) {
            return Err(ParseError::MissingColumn {
                input: INPUT,
                column,
            });
        }
    }

    let mut rows = Vec::new();
    let mut seen_ids: HashSet<i64> = HashSet::new();

    for (row_idx, record) in records.enumerate() {
        let record = record.map_err(|err| ParseError::Csv {
            input: INPUT,
            source: err,
        })?;
        let line_index = row_idx + 2;

        let mut ticket_id = None;
        let mut passenger_id = None;
        let mut ticket_number = None;
        let mut class = None;
        let mut cabin = None;

        for (idx, role) in roles.iter().enumerate() {
            let column = header.get(idx).unwrap_or("");
            let value = record.get(idx).unwrap_or("");
            match role {
                ColumnRole::TicketId => {
                    ticket_id = Some(parse_required_i64(INPUT, value, line_index, column)?);
                }
                ColumnRole::PassengerId => {
                    passenger_id = Some(parse_required_i64(INPUT, value, line_index, column)?);
                }
                ColumnRole::TicketNumber => {
                    let trimmed = value.trim();
                    if !trimmed.is_empty() {
                        ticket_number = Some(trimmed.to_string());
                    }
                }
                ColumnRole::Class => {
                    class = parse_optional_i64(INPUT, value, line_index, column)?;
                }
                ColumnRole::Cabin => {
                    let trimmed = value.trim();
                    if !trimmed.is_empty() {
                        cabin = Some(trimmed.to_string());
                    }
                }
                ColumnRole::Ignored => {}
            }
        }

        let ticket_id = ticket_id.ok_or_else(|| ParseError::DataRow {
            input: INPUT,
            line_index,
            message: "row has no TicketId field".to_string(),
        })?;
        let passenger_id = passenger_id.ok_or_else(|| ParseError::DataRow {
            input: INPUT,
            line_index,
            message: "row has no PassengerId field".to_string(),
        })?;

        if !seen_ids.insert(ticket_id) {
            return Err(ParseError::Validation {
                input: INPUT,
                message: format!("duplicate ticket_id {ticket_id}"),
            });
        }

        rows.push(TicketRow {
            ticket_id,
            passenger_id,
            ticket_number: ticket_number.unwrap_or_else(|| format!("T{}", row_idx + 1)),
            class: class.unwrap_or(PLACEHOLDER_CLASS),
            cabin: cabin.unwrap_or_else(|| PLACEHOLDER_CABIN.to_string()),
        });
    }

    Ok(rows)
}
