use log::{error, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use super::sync_service::SyncService;
use crate::countries::CountryService;
use crate::fx::FxService;

const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);
const DEFAULT_RATES_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Drives the recurring sync runs.
///
/// One full sync on startup when the store is empty, then a fixed full-sync
/// interval and a fixed daily-rates interval. The next tick is the only
/// retry mechanism.
pub struct SyncScheduler {
    sync_service: Arc<SyncService>,
    country_service: Arc<CountryService>,
    fx_service: Arc<FxService>,
    sync_interval: Duration,
    rates_interval: Duration,
}

impl SyncScheduler {
    pub fn new(
        sync_service: Arc<SyncService>,
        country_service: Arc<CountryService>,
        fx_service: Arc<FxService>,
    ) -> Self {
        Self {
            sync_service,
            country_service,
            fx_service,
            sync_interval: DEFAULT_SYNC_INTERVAL,
            rates_interval: DEFAULT_RATES_INTERVAL,
        }
    }

    pub fn with_intervals(mut self, sync_interval: Duration, rates_interval: Duration) -> Self {
        self.sync_interval = sync_interval;
        self.rates_interval = rates_interval;
        self
    }

    /// Spawns the scheduling loop on the current runtime
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.bootstrap().await;

            let mut sync_tick = tokio::time::interval(self.sync_interval);
            let mut rates_tick = tokio::time::interval(self.rates_interval);

            // The first tick of a tokio interval fires immediately
            sync_tick.tick().await;
            rates_tick.tick().await;

            loop {
                tokio::select! {
                    _ = sync_tick.tick() => {
                        self.sync_service.run_scheduled().await;
                    }
                    _ = rates_tick.tick() => {
                        if let Err(e) = self.fx_service.sync_latest_rates().await {
                            error!("Error syncing exchange rates from feed: {}", e);
                        }
                    }
                }
            }
        })
    }

    async fn bootstrap(&self) {
        info!("Initializing country data on startup");
        match self.country_service.is_empty() {
            Ok(true) => {
                info!("Database is empty, running initial sync");
                self.sync_service.run_scheduled().await;
            }
            Ok(false) => {
                info!("Database already contains countries, skipping initial sync");
            }
            Err(e) => {
                error!("Error during country data initialization: {}", e);
            }
        }
    }
}
