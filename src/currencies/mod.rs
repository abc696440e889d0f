// Module declarations
pub(crate) mod currencies_errors;
pub(crate) mod currencies_model;
pub(crate) mod currencies_repository;
pub(crate) mod currencies_service;

// Re-export the public interface
pub use currencies_model::{Currency, CurrencyDB};
pub use currencies_repository::CurrencyRepository;
pub use currencies_service::CurrencyService;

// Re-export error types for convenience
pub use currencies_errors::{CurrencyError, Result};
