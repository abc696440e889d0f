use log::{debug, error, info, warn};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use super::sync_errors::{Result, SyncError};
use super::sync_model::{SyncRunState, SyncSummary};
use crate::countries::CountryService;
use crate::currencies::CurrencyService;
use crate::db::{DbPool, DbTransactionExecutor};
use crate::errors::Error;
use crate::feed::{CountryFeedProvider, CountryFeedRecord, CurrencyFeedRecord};
use crate::fx::FxService;

/// Orchestrates one full sync run: country feed fetch, then currency,
/// country, and exchange-rate reconciliation inside one transaction.
///
/// Scheduled and manual entry points share the same `run` path and differ
/// only in how the outcome is reported.
pub struct SyncService {
    pool: Arc<DbPool>,
    country_provider: Arc<dyn CountryFeedProvider>,
    currency_service: Arc<CurrencyService>,
    country_service: Arc<CountryService>,
    fx_service: Arc<FxService>,
    running: AtomicBool,
    last_state: RwLock<SyncRunState>,
}

impl SyncService {
    pub fn new(
        pool: Arc<DbPool>,
        country_provider: Arc<dyn CountryFeedProvider>,
        currency_service: Arc<CurrencyService>,
        country_service: Arc<CountryService>,
        fx_service: Arc<FxService>,
    ) -> Self {
        Self {
            pool,
            country_provider,
            currency_service,
            country_service,
            fx_service,
            running: AtomicBool::new(false),
            last_state: RwLock::new(SyncRunState::Idle),
        }
    }

    /// Runs one complete sync. Refuses to start while another run is
    /// active; rolls back every write on an unrecovered error.
    pub async fn run(&self) -> Result<SyncSummary> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(SyncError::AlreadyRunning);
        }

        let result = self.run_inner().await;

        match &result {
            Ok(summary) => {
                self.set_state(SyncRunState::Committed);
                info!(
                    "Sync committed: {} countries, {} currencies, {} new rates",
                    summary.countries_processed,
                    summary.currencies_processed,
                    summary.rates_inserted
                );
            }
            Err(e) => {
                self.set_state(SyncRunState::RolledBack);
                error!("Sync rolled back: {}", e);
            }
        }

        self.running.store(false, Ordering::SeqCst);
        result
    }

    async fn run_inner(&self) -> Result<SyncSummary> {
        self.set_state(SyncRunState::Fetching);

        // Both upstream fetches happen before the transaction opens, so a
        // fetch failure leaves storage untouched.
        let feed = self.country_provider.fetch_countries().await?;
        info!("Fetched {} countries from feed", feed.len());

        let currency_records = merge_currency_records(&feed);
        let codes: Vec<String> = currency_records.keys().cloned().collect();
        let rate_responses = self.fx_service.fetch_latest_rates(&codes).await;

        self.pool
            .execute(|conn| -> Result<SyncSummary> {
                self.set_state(SyncRunState::ReconcilingCurrencies);
                let currencies = self.currency_service.reconcile(conn, &currency_records);

                self.set_state(SyncRunState::ReconcilingCountries);
                let countries_processed =
                    self.country_service.reconcile(conn, &feed, &currencies);

                self.set_state(SyncRunState::ReconcilingRates);
                let rates_inserted = self
                    .fx_service
                    .reconcile(conn, &rate_responses)
                    .map_err(|e| SyncError::DatabaseError(e.to_string()))?;

                Ok(SyncSummary {
                    countries_processed,
                    currencies_processed: currencies.len(),
                    rates_inserted,
                })
            })
            .map_err(|e| match e {
                Error::Sync(sync_err) => sync_err,
                other => SyncError::DatabaseError(other.to_string()),
            })
    }

    /// Scheduled entry point: failures are logged, never propagated
    pub async fn run_scheduled(&self) {
        info!("Starting scheduled country data sync");
        match self.run().await {
            Ok(_) => {}
            Err(SyncError::AlreadyRunning) => {
                warn!("Skipping scheduled sync, a run is already in progress");
            }
            Err(e) => {
                error!("Error syncing countries from feed: {}", e);
            }
        }
    }

    /// Manual entry point: returns the processed-country count and surfaces
    /// any failure to the caller
    pub async fn run_manual(&self) -> Result<usize> {
        let summary = self.run().await?;
        Ok(summary.countries_processed)
    }

    /// Last observed run state
    pub fn last_state(&self) -> SyncRunState {
        self.last_state
            .read()
            .map(|state| *state)
            .unwrap_or(SyncRunState::Idle)
    }

    fn set_state(&self, state: SyncRunState) {
        if let Ok(mut last_state) = self.last_state.write() {
            debug!("Sync state: {} -> {}", *last_state, state);
            *last_state = state;
        }
    }
}

/// Merges the currency maps of all countries in the batch into one
/// code-keyed map; the last country observed wins on duplicate codes.
pub fn merge_currency_records(
    feed: &[CountryFeedRecord],
) -> HashMap<String, CurrencyFeedRecord> {
    let mut merged = HashMap::new();
    for record in feed {
        for (code, currency) in &record.currencies {
            merged.insert(code.clone(), currency.clone());
        }
    }
    merged
}
