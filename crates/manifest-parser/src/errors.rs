use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{input} CSV error: {source}")]
    Csv {
        input: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("{input} file is missing a header row")]
    MissingHeader { input: &'static str },

    #[error("{input} header has no '{column}' column")]
    MissingColumn {
        input: &'static str,
        column: &'static str,
    },

    #[error("{input} data row {line_index} invalid: {message}")]
    DataRow {
        input: &'static str,
        line_index: usize,
        message: String,
    },

    #[error("{input} validation error: {message}")]
    Validation {
        input: &'static str,
        message: String,
    },
}
