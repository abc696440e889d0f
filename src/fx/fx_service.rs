use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use futures::future::join_all;
use log::{debug, info, warn};
use num_traits::FromPrimitive;
use rust_decimal::Decimal;
use std::sync::Arc;

use super::fx_errors::FxError;
use super::fx_model::ExchangeRate;
use super::fx_repository::FxRepository;
use crate::currencies::CurrencyRepository;
use crate::db::DbTransactionExecutor;
use crate::errors::Result;
use crate::feed::{RateFeedProvider, RateFeedResponse};

/// Service for ingesting and querying exchange rates
pub struct FxService {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    repository: FxRepository,
    currency_repository: CurrencyRepository,
    provider: Arc<dyn RateFeedProvider>,
}

impl FxService {
    pub fn new(
        pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
        provider: Arc<dyn RateFeedProvider>,
    ) -> Self {
        Self {
            repository: FxRepository::new(pool.clone()),
            currency_repository: CurrencyRepository::new(pool.clone()),
            pool,
            provider,
        }
    }

    /// Fetches latest rates with each code as base, one request per code,
    /// concurrently. A failed request contributes nothing and does not
    /// abort its siblings.
    pub async fn fetch_latest_rates(&self, codes: &[String]) -> Vec<RateFeedResponse> {
        let futures = codes
            .iter()
            .map(|code| async move {
                self.provider
                    .fetch_latest_rates(code)
                    .await
                    .map_err(|e| (code.clone(), e))
            })
            .collect::<Vec<_>>();

        let results = join_all(futures).await;

        let mut responses = Vec::with_capacity(codes.len());
        for result in results {
            match result {
                Ok(response) => responses.push(response),
                Err((code, e)) => {
                    warn!("Failed to fetch rates for base {}: {}", code, e);
                }
            }
        }

        responses
    }

    /// Writes fetched rate responses on the supplied connection.
    ///
    /// A response whose base currency is not in storage is skipped with a
    /// warning. A (base, target, date) triple already present is left
    /// untouched; rate history is never overwritten. Returns the number of
    /// rows inserted.
    pub fn reconcile(
        &self,
        conn: &mut SqliteConnection,
        responses: &[RateFeedResponse],
    ) -> std::result::Result<usize, FxError> {
        let mut inserted = 0;

        for response in responses {
            let base_exists = self
                .currency_repository
                .exists(conn, &response.base)
                .map_err(|e| FxError::DatabaseError(e.to_string()))?;

            if !base_exists {
                warn!("Base currency {} not found, skipping rates", response.base);
                continue;
            }

            for (target, rate) in &response.rates {
                let existing =
                    self.repository
                        .find_rate(conn, &response.base, target, response.date)?;
                if existing.is_some() {
                    continue;
                }

                let rate = match Decimal::from_f64(*rate) {
                    Some(value) => value,
                    None => {
                        warn!(
                            "Rate {}/{} is not a finite number, skipping",
                            response.base, target
                        );
                        continue;
                    }
                };

                let rate = ExchangeRate::new(&response.base, target, rate, response.date);

                match self.repository.insert(conn, rate) {
                    Ok(_) => inserted += 1,
                    Err(e) => {
                        warn!(
                            "Failed to save exchange rate {}/{}: {}",
                            response.base, target, e
                        );
                    }
                }
            }
        }

        Ok(inserted)
    }

    /// Standalone daily rate sync: reads the full code list from storage,
    /// fetches, and writes in its own transaction
    pub async fn sync_latest_rates(&self) -> Result<usize> {
        let codes = self.currency_repository.list_codes()?;

        if codes.is_empty() {
            warn!("No currencies found in database, skipping rate sync");
            return Ok(0);
        }

        info!("Starting exchange rate sync for {} currencies", codes.len());
        let responses = self.fetch_latest_rates(&codes).await;

        let inserted = self.pool.execute(|conn| self.reconcile(conn, &responses))?;
        debug!("Inserted {} new exchange rates", inserted);

        Ok(inserted)
    }

    /// Returns the most recent rate snapshot for the given base currency
    pub fn get_latest_rates(&self, base: &str) -> Result<Vec<ExchangeRate>> {
        validate_currency_code(base)?;
        Ok(self.repository.get_latest_rates(base)?)
    }

    /// Returns rate history for a base over an inclusive date range,
    /// descending by date
    pub fn get_rates_history(
        &self,
        base: &str,
        from_date: chrono::NaiveDate,
        to_date: chrono::NaiveDate,
    ) -> Result<Vec<ExchangeRate>> {
        validate_currency_code(base)?;
        Ok(self.repository.get_rates_history(base, from_date, to_date)?)
    }
}

fn validate_currency_code(code: &str) -> std::result::Result<(), FxError> {
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(FxError::InvalidCurrencyCode(code.to_string()));
    }
    Ok(())
}
