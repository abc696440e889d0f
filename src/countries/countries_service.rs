use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use log::{debug, warn};
use std::collections::HashSet;
use std::sync::Arc;

use super::countries_model::{
    Country, CountryDetailed, CountryMaps, CountrySummary, CurrencyWithRates,
};
use super::countries_repository::CountryRepository;
use crate::countries::{CountryError, Result};
use crate::currencies::Currency;
use crate::feed::CountryFeedRecord;
use crate::fx::{FxRepository, RateSnapshot};

/// Service for reconciling and querying countries
pub struct CountryService {
    repository: CountryRepository,
    fx_repository: FxRepository,
}

impl CountryService {
    /// Creates a new CountryService instance
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        Self {
            repository: CountryRepository::new(pool.clone()),
            fx_repository: FxRepository::new(pool),
        }
    }

    /// Upserts every country in the feed batch and rewrites each country's
    /// currency associations to exactly match its source record.
    ///
    /// Requires the currency rows for `currencies` to already exist. A
    /// failure on one record is logged with the country's display name and
    /// the loop continues; returns the number of records reconciled.
    pub fn reconcile(
        &self,
        conn: &mut SqliteConnection,
        feed_records: &[CountryFeedRecord],
        currencies: &[Currency],
    ) -> usize {
        let known_codes: HashSet<&str> = currencies.iter().map(|c| c.code.as_str()).collect();
        let mut reconciled = 0;

        for record in feed_records {
            let name = match record.display_name() {
                Some(name) => name.to_string(),
                None => {
                    warn!("Country {} has no valid name, skipping", record.cca3);
                    continue;
                }
            };

            match self.reconcile_one(conn, record, &name, &known_codes) {
                Ok(()) => {
                    debug!("Reconciled country {}", record.cca3);
                    reconciled += 1;
                }
                Err(e) => {
                    warn!("Failed to save country {}: {}", name, e);
                }
            }
        }

        reconciled
    }

    fn reconcile_one(
        &self,
        conn: &mut SqliteConnection,
        record: &CountryFeedRecord,
        name: &str,
        known_codes: &HashSet<&str>,
    ) -> Result<()> {
        if record.cca3.trim().is_empty() {
            return Err(CountryError::InvalidData(
                "Country record has no 3-letter code".to_string(),
            ));
        }

        let mut languages: Vec<String> = record.languages.values().cloned().collect();
        languages.sort();

        let now = chrono::Utc::now().naive_utc();
        let country = Country {
            id: record.cca3.clone(),
            name: name.to_string(),
            capital: record.capital.clone(),
            flag: record.flag.clone(),
            area: record.area,
            languages,
            timezones: record.timezones.clone(),
            maps: CountryMaps {
                google_maps: record.maps.google_maps.clone(),
                open_street_maps: record.maps.open_street_maps.clone(),
            },
            latlng: record.latlng.clone(),
            created_at: now,
            updated_at: now,
        };

        let country = self.repository.upsert(conn, country)?;

        // Association set must end up equal to the codes in the source
        // record, restricted to currencies that were actually reconciled.
        let desired: HashSet<String> = record
            .currencies
            .keys()
            .filter(|code| known_codes.contains(code.as_str()))
            .cloned()
            .collect();
        let current: HashSet<String> = self
            .repository
            .get_currency_codes(conn, &country.id)?
            .into_iter()
            .collect();

        for code in desired.difference(&current) {
            self.repository.link_currency(conn, &country.id, code)?;
        }
        for code in current.difference(&desired) {
            self.repository.unlink_currency(conn, &country.id, code)?;
        }

        Ok(())
    }

    /// Whether the country table holds any rows yet
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.repository.count()? == 0)
    }

    /// Lists all countries as summaries
    pub fn get_countries(&self) -> Result<Vec<CountrySummary>> {
        let countries = self.repository.list()?;
        Ok(countries.into_iter().map(CountrySummary::from).collect())
    }

    /// Retrieves one country by its 3-letter code, with its currencies
    /// enriched by their most recent rate snapshot.
    ///
    /// Returns NotFound when the code is unknown.
    pub fn get_country(&self, country_id: &str) -> Result<CountryDetailed> {
        let country = self.repository.get_by_id(country_id)?;
        let currencies = self.repository.get_currencies(country_id)?;

        let mut enriched = Vec::with_capacity(currencies.len());
        for currency in currencies {
            let exchange_rates = self
                .fx_repository
                .get_latest_rates(&currency.code)
                .map_err(|e| CountryError::DatabaseError(e.to_string()))?
                .into_iter()
                .map(RateSnapshot::from)
                .collect();

            enriched.push(CurrencyWithRates {
                code: currency.code,
                name: currency.name,
                symbol: currency.symbol,
                exchange_rates,
            });
        }

        Ok(CountryDetailed {
            country,
            currencies: enriched,
        })
    }
}
