use log::debug;
use reqwest::Client;
use std::time::Duration;

use crate::feed::feed_errors::FeedError;
use crate::feed::feed_models::RateFeedResponse;
use crate::feed::feed_traits::RateFeedProvider;
use async_trait::async_trait;

const BASE_URL: &str = "https://api.frankfurter.dev/v1/latest";
const REQUEST_TIMEOUT_SECS: u64 = 10;

pub struct FrankfurterProvider {
    client: Client,
    base_url: String,
}

impl FrankfurterProvider {
    pub fn new() -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        let base_url = std::env::var("RATE_FEED_URL").unwrap_or_else(|_| BASE_URL.to_string());
        Ok(FrankfurterProvider { client, base_url })
    }

    pub fn with_base_url(base_url: String) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(FrankfurterProvider { client, base_url })
    }
}

#[async_trait]
impl RateFeedProvider for FrankfurterProvider {
    async fn fetch_latest_rates(&self, base: &str) -> Result<RateFeedResponse, FeedError> {
        let url = format!("{}?base={}", self.base_url, base);
        debug!("Fetching latest rates for base {}", base);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(FeedError::ProviderError(format!(
                "Rate feed returned status {} for base {}",
                response.status(),
                base
            )));
        }

        response
            .json::<RateFeedResponse>()
            .await
            .map_err(|e| FeedError::ParsingError(e.to_string()))
    }
}
