use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::fx::RateSnapshot;

/// Domain model representing a country
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub id: String,
    pub name: String,
    pub capital: Vec<String>,
    pub flag: String,
    pub area: f64,
    pub languages: Vec<String>,
    pub timezones: Vec<String>,
    pub maps: CountryMaps,
    pub latlng: Vec<f64>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CountryMaps {
    pub google_maps: String,
    pub open_street_maps: String,
}

/// Summary view for the country listing surface
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CountrySummary {
    pub id: String,
    pub name: String,
    pub capital: Vec<String>,
    pub flag: String,
    pub area: f64,
    pub latlng: Vec<f64>,
}

impl From<Country> for CountrySummary {
    fn from(country: Country) -> Self {
        Self {
            id: country.id,
            name: country.name,
            capital: country.capital,
            flag: country.flag,
            area: country.area,
            latlng: country.latlng,
        }
    }
}

/// Detailed view for one country, currencies enriched with their most
/// recent rate snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CountryDetailed {
    #[serde(flatten)]
    pub country: Country,
    pub currencies: Vec<CurrencyWithRates>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyWithRates {
    pub code: String,
    pub name: String,
    pub symbol: String,
    pub exchange_rates: Vec<RateSnapshot>,
}

/// Database model for countries; list and map fields are stored as JSON text
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::countries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CountryDB {
    pub id: String,
    pub name: String,
    pub capital: String,
    pub flag: String,
    pub area: f64,
    pub languages: String,
    pub timezones: String,
    pub maps: String,
    pub latlng: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

fn to_json<T: Serialize>(value: &T, fallback: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| fallback.to_string())
}

fn from_json<T: Default + for<'de> Deserialize<'de>>(value: &str) -> T {
    serde_json::from_str(value).unwrap_or_default()
}

impl From<CountryDB> for Country {
    fn from(db: CountryDB) -> Self {
        Self {
            capital: from_json(&db.capital),
            languages: from_json(&db.languages),
            timezones: from_json(&db.timezones),
            maps: from_json(&db.maps),
            latlng: from_json(&db.latlng),
            id: db.id,
            name: db.name,
            flag: db.flag,
            area: db.area,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<Country> for CountryDB {
    fn from(domain: Country) -> Self {
        Self {
            capital: to_json(&domain.capital, "[]"),
            languages: to_json(&domain.languages, "[]"),
            timezones: to_json(&domain.timezones, "[]"),
            maps: to_json(&domain.maps, "{}"),
            latlng: to_json(&domain.latlng, "[]"),
            id: domain.id,
            name: domain.name,
            flag: domain.flag,
            area: domain.area,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }
}

/// Database model for the country-currency association
#[derive(Queryable, Insertable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::countries_currencies)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CountryCurrencyDB {
    pub country_id: String,
    pub currency_code: String,
}
