use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::Arc;

use super::currencies_model::Currency;
use super::currencies_repository::CurrencyRepository;
use crate::currencies::Result;
use crate::feed::CurrencyFeedRecord;

/// Service for managing currencies
pub struct CurrencyService {
    repository: CurrencyRepository,
}

impl CurrencyService {
    /// Creates a new CurrencyService instance
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        Self {
            repository: CurrencyRepository::new(pool),
        }
    }

    /// Upserts every currency observed in the current feed batch.
    ///
    /// Returns the canonical set of touched records for downstream linking.
    /// A failure on one code is logged and skipped; the batch continues.
    pub fn reconcile(
        &self,
        conn: &mut SqliteConnection,
        records: &HashMap<String, CurrencyFeedRecord>,
    ) -> Vec<Currency> {
        let mut currencies = Vec::with_capacity(records.len());

        for (code, record) in records {
            let currency = Currency {
                code: code.clone(),
                name: record.name.clone(),
                symbol: record.symbol.clone(),
            };

            match self.repository.upsert(conn, currency) {
                Ok(saved) => {
                    debug!("Reconciled currency {}", saved.code);
                    currencies.push(saved);
                }
                Err(e) => {
                    warn!("Failed to sync currency {}: {}", code, e);
                }
            }
        }

        currencies
    }

    /// Retrieves a currency by its code
    pub fn get_currency(&self, code: &str) -> Result<Currency> {
        self.repository.get_by_code(code)
    }

    /// Lists all currencies
    pub fn get_currencies(&self) -> Result<Vec<Currency>> {
        self.repository.list()
    }

    /// Lists all currency codes in storage
    pub fn get_currency_codes(&self) -> Result<Vec<String>> {
        self.repository.list_codes()
    }
}
