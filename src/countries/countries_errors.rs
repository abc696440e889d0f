use diesel::result::Error as DieselError;
use thiserror::Error;

/// Custom error type for country-related operations
#[derive(Debug, Error)]
pub enum CountryError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<DieselError> for CountryError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => CountryError::NotFound("Record not found".to_string()),
            _ => CountryError::DatabaseError(err.to_string()),
        }
    }
}

/// Result type for country operations
pub type Result<T> = std::result::Result<T, CountryError>;
