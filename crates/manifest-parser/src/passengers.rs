use std::collections::HashSet;

use csv::ReaderBuilder;

use crate::common::{optional_string, parse_optional_f64, parse_optional_i64, parse_required_i64};
use crate::errors::ParseError;
use crate::model::PassengerRow;

const INPUT: &str = "passengers";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnRole {
    PassengerId,
    Name,
    Sex,
    Age,
    SibSp,
    Parch,
    Fare,
    Embarked,
    Ignored,
}

fn classify_column(name: &str) -> ColumnRole {
    let trimmed = name.trim();
    if trimmed.eq_ignore_ascii_case("passengerid") {
        ColumnRole::PassengerId
    } else if trimmed.eq_ignore_ascii_case("name") {
        ColumnRole::Name
    } else if trimmed.eq_ignore_ascii_case("sex") {
        ColumnRole::Sex
    } else if trimmed.eq_ignore_ascii_case("age") {
        ColumnRole::Age
    } else if trimmed.eq_ignore_ascii_case("sibsp") {
        ColumnRole::SibSp
    } else if trimmed.eq_ignore_ascii_case("parch") {
        ColumnRole::Parch
    } else if trimmed.eq_ignore_ascii_case("fare") {
        ColumnRole::Fare
    } else if trimmed.eq_ignore_ascii_case("embarked") {
        ColumnRole::Embarked
    } else {
        ColumnRole::Ignored
    }
}

/// Parses a passengers CSV into canonical rows.
///
/// The header row is classified against the recognized column names;
/// anything unrecognized is dropped. Only the PassengerId column is
/// mandatory, and its values must be unique across the file.
pub fn parse_passengers(content: &str) -> Result<Vec<PassengerRow>, ParseError> {
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
    if !roles.contains(&ColumnRole::PassengerId) {
        return Err(ParseError::MissingColumn {
            input: INPUT,
            column: "PassengerId",
        });
    }

    let mut rows = Vec::new();
    let mut seen_ids: HashSet<i64> = HashSet::new();

    for (row_idx, record) in records.enumerate() {
        let record = record.map_err(|err| ParseError::Csv {
            input: INPUT,
            source: err,
        })?;
        // Header occupies line 1.
        let line_index = row_idx + 2;

        let mut passenger_id = None;
        let mut name = None;
        let mut sex = None;
        let mut age = None;
        let mut sibsp = None;
        let mut parch = None;
        let mut fare = None;
        let mut embarked = None;

        for (idx, role) in roles.iter().enumerate() {
            let column = header.get(idx).unwrap_or("");
            let value = record.get(idx).unwrap_or("");
            match role {
                ColumnRole::PassengerId => {
                    passenger_id = Some(parse_required_i64(INPUT, value, line_index, column)?);
                }
                ColumnRole::Name => name = optional_string(value),
                ColumnRole::Sex => sex = optional_string(value),
                ColumnRole::Age => age = parse_optional_f64(INPUT, value, line_index, column)?,
                ColumnRole::SibSp => sibsp = parse_optional_i64(INPUT, value, line_index, column)?,
                ColumnRole::Parch => parch = parse_optional_i64(INPUT, value, line_index, column)?,
                ColumnRole::Fare => fare = parse_optional_f64(INPUT, value, line_index, column)?,
                ColumnRole::Embarked => embarked = optional_string(value),
                ColumnRole::Ignored => {}
            }
        }

        let passenger_id = passenger_id.ok_or_else(|| ParseError::DataRow {
            input: INPUT,
            line_index,
            message: "row has no PassengerId field".to_string(),
        })?;

        if !seen_ids.insert(passenger_id) {
            return Err(ParseError::Validation {
                input: INPUT,
                message: format!("duplicate passenger_id {passenger_id}"),
            });
        }

        rows.push(PassengerRow {
            passenger_id,
            name,
            sex,
            age,
            sibsp,
            parch,
            fare,
            embarked,
        });
    }

    Ok(rows)
}
