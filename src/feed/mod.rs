pub(crate) mod feed_errors;
pub(crate) mod feed_models;
pub(crate) mod feed_traits;
pub(crate) mod providers;

// Re-export the public interface
pub use feed_models::{
    CountryFeedMaps, CountryFeedName, CountryFeedRecord, CurrencyFeedRecord, RateFeedResponse,
};
pub use feed_traits::{CountryFeedProvider, RateFeedProvider};
pub use providers::{FrankfurterProvider, RestCountriesProvider};

// Re-export error types for convenience
pub use feed_errors::FeedError;
