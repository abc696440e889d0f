use async_trait::async_trait;

use super::feed_errors::FeedError;
use super::feed_models::{CountryFeedRecord, RateFeedResponse};

#[async_trait]
pub trait CountryFeedProvider: Send + Sync {
    /// Fetches the full country list from the upstream feed.
    async fn fetch_countries(&self) -> Result<Vec<CountryFeedRecord>, FeedError>;
}

#[async_trait]
pub trait RateFeedProvider: Send + Sync {
    /// Fetches today's rates with the given code as base.
    async fn fetch_latest_rates(&self, base: &str) -> Result<RateFeedResponse, FeedError>;
}
