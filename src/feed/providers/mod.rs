pub(crate) mod frankfurter_provider;
pub(crate) mod rest_countries_provider;

pub use frankfurter_provider::FrankfurterProvider;
pub use rest_countries_provider::RestCountriesProvider;
