use diesel::result::Error as DieselError;
use thiserror::Error;

/// Custom error type for exchange-rate operations
#[derive(Debug, Error)]
pub enum FxError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Exchange rate not found: {0}")]
    RateNotFound(String),
    #[error("Invalid currency code: {0}")]
    InvalidCurrencyCode(String),
    #[error("Save error: {0}")]
    SaveError(String),
}

impl From<DieselError> for FxError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => FxError::RateNotFound("Record not found".to_string()),
            _ => FxError::DatabaseError(err.to_string()),
        }
    }
}

/// Result type for exchange-rate operations
pub type Result<T> = std::result::Result<T, FxError>;
