// Module declarations
pub(crate) mod countries_errors;
pub(crate) mod countries_model;
pub(crate) mod countries_repository;
pub(crate) mod countries_service;

// Re-export the public interface
pub use countries_model::{
    Country, CountryDB, CountryDetailed, CountryMaps, CountrySummary, CurrencyWithRates,
};
pub use countries_repository::CountryRepository;
pub use countries_service::CountryService;

// Re-export error types for convenience
pub use countries_errors::{CountryError, Result};
