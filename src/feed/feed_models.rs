use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One country object from the upstream country feed.
///
/// Every field except the 3-letter code is optional on the wire; a record
/// missing its display name is kept at deserialization time and skipped by
/// the reconciler with a warning.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CountryFeedRecord {
    pub cca3: String,
    #[serde(default)]
    pub name: Option<CountryFeedName>,
    #[serde(default)]
    pub capital: Vec<String>,
    #[serde(default)]
    pub flag: String,
    #[serde(default)]
    pub latlng: Vec<f64>,
    #[serde(default)]
    pub timezones: Vec<String>,
    #[serde(default)]
    pub area: f64,
    #[serde(default)]
    pub languages: HashMap<String, String>,
    #[serde(default)]
    pub currencies: HashMap<String, CurrencyFeedRecord>,
    #[serde(default)]
    pub maps: CountryFeedMaps,
}

impl CountryFeedRecord {
    /// Resolves the display name, if the feed supplied one.
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_ref()
            .map(|n| n.common.as_str())
            .filter(|n| !n.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CountryFeedName {
    #[serde(default)]
    pub common: String,
    #[serde(default)]
    pub official: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CurrencyFeedRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CountryFeedMaps {
    #[serde(default)]
    pub google_maps: String,
    #[serde(default)]
    pub open_street_maps: String,
}

/// Latest-rates payload from the upstream rate feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateFeedResponse {
    pub base: String,
    pub date: NaiveDate,
    pub rates: HashMap<String, f64>,
}
