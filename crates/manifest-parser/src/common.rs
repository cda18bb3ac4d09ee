use crate::errors::ParseError;

pub(crate) fn parse_required_i64(
    input: &'static str,
    value: &str,
    line_index: usize,
    column: &str,
) -> Result<i64, ParseError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|err| ParseError::DataRow {
            input,
            line_index,
            message: format!("failed to parse column '{column}' as integer: {err}"),
        })
}

pub(crate) fn parse_optional_i64(
    input: &'static str,
    value: &str,
    line_index: usize,
    column: &str,
) -> Result<Option<i64>, ParseError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    trimmed
        .parse::<i64>()
        .map(Some)
        .map_err(|err| ParseError::DataRow {
            input,
            line_index,
            message: format!("failed to parse column '{column}' as integer: {err}"),
        })
}

pub(crate) fn parse_optional_f64(
    input: &'static str,
    value: &str,
    line_index: usize,
    column: &str,
) -> Result<Option<f64>, ParseError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|err| ParseError::DataRow {
            input,
            line_index,
            message: format!("failed to parse column '{column}' as float: {err}"),
        })
}

/// Empty and whitespace-only cells become `None`; everything else is kept
/// verbatim, surrounding whitespace included.
pub(crate) fn optional_string(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
