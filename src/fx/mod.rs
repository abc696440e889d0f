pub(crate) mod fx_errors;
pub(crate) mod fx_model;
pub(crate) mod fx_repository;
pub(crate) mod fx_service;

pub use fx_errors::FxError;
pub use fx_model::{ExchangeRate, ExchangeRateDB, RateSnapshot};
pub use fx_repository::FxRepository;
pub use fx_service::FxService;
