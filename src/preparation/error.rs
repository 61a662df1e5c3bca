use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrepareError {
    #[error("Row {row}: column '{column}' is not numeric: {value}")]
    TypeCoercion {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Row {row}: cannot parse timestamp '{value}'")]
    TimestampParse { row: usize, value: String },

    #[error("Row {row}: missing required column '{column}'")]
    MissingField { row: usize, column: String },
}
