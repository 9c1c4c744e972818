use thiserror::Error;

#[derive(Debug, Error)]
pub enum CandleError {
    #[error("invalid decimal for {field}: {value:?}: {source}")]
    InvalidDecimal {
        field: &'static str,
        value: String,
        #[source]
        source: rust_decimal::Error,
    },

    #[error("invalid timestamp for {field}: {value:?}: {source}")]
    InvalidTimestamp {
        field: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

impl CandleError {
    /// Name of the candle field whose input was rejected.
    pub fn field(&self) -> &'static str {
        match self {
            CandleError::InvalidDecimal { field, .. }
            | CandleError::InvalidTimestamp { field, .. } => *field,
        }
    }

    /// Every construction failure is a malformed input string.
    pub fn is_invalid_input_format(&self) -> bool {
        matches!(
            self,
            CandleError::InvalidDecimal { .. } | CandleError::InvalidTimestamp { .. }
        )
    }
}
