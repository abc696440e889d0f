use log::debug;
use reqwest::Client;
use std::time::Duration;

use crate::feed::feed_errors::FeedError;
use crate::feed::feed_models::CountryFeedRecord;
use crate::feed::feed_traits::CountryFeedProvider;
use async_trait::async_trait;

const BASE_URL: &str = "https://restcountries.com/v3.1/all";
const FIELDS: &str = "cca3,name,capital,flag,latlng,timezones,area,languages,currencies,maps";
const REQUEST_TIMEOUT_SECS: u64 = 10;

pub struct RestCountriesProvider {
    client: Client,
    base_url: String,
}

impl RestCountriesProvider {
    pub fn new() -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        let base_url =
            std::env::var("COUNTRY_FEED_URL").unwrap_or_else(|_| BASE_URL.to_string());
        Ok(RestCountriesProvider { client, base_url })
    }

    pub fn with_base_url(base_url: String) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(RestCountriesProvider { client, base_url })
    }
}

#[async_trait]
impl CountryFeedProvider for RestCountriesProvider {
    async fn fetch_countries(&self) -> Result<Vec<CountryFeedRecord>, FeedError> {
        let url = format!("{}?status=true&fields={}", self.base_url, FIELDS);
        debug!("Fetching countries from {}", self.base_url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(FeedError::ProviderError(format!(
                "Country feed returned status {}",
                response.status()
            )));
        }

        let countries = response
            .json::<Vec<CountryFeedRecord>>()
            .await
            .map_err(|e| FeedError::ParsingError(e.to_string()))?;

        debug!("Received {} countries from feed", countries.len());
        Ok(countries)
    }
}
