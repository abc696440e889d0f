use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use atlas_core::countries::CountryService;
use atlas_core::currencies::CurrencyService;
use atlas_core::db::{self, DbPool};
use atlas_core::feed::{
    CountryFeedProvider, CountryFeedRecord, FeedError, RateFeedProvider, RateFeedResponse,
};
use atlas_core::fx::FxService;
use atlas_core::sync::SyncService;

/// Creates a fresh on-disk SQLite database with migrations applied
pub fn setup_test_pool(test_id: &str) -> Arc<DbPool> {
    let data_dir = std::env::temp_dir()
        .join("atlas-core-tests")
        .join(format!("{}-{}", test_id, uuid::Uuid::new_v4()));
    let data_dir = data_dir.to_string_lossy().to_string();

    let db_path = db::init(&data_dir).expect("Failed to initialize database");
    let pool = db::create_pool(&db_path).expect("Failed to create database pool");
    db::run_migrations(&pool).expect("Failed to run migrations");

    pool
}

/// Country feed stub with swappable records, a failure switch, and an
/// optional response delay
pub struct StubCountryFeed {
    records: Mutex<Vec<CountryFeedRecord>>,
    fail: AtomicBool,
    delay_ms: AtomicU64,
}

impl StubCountryFeed {
    pub fn new(records: Vec<CountryFeedRecord>) -> Arc<Self> {
        Arc::new(Self {
            records: Mutex::new(records),
            fail: AtomicBool::new(false),
            delay_ms: AtomicU64::new(0),
        })
    }

    pub fn set_records(&self, records: Vec<CountryFeedRecord>) {
        *self.records.lock().unwrap() = records;
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Duration) {
        self.delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
    }
}

#[async_trait]
impl CountryFeedProvider for StubCountryFeed {
    async fn fetch_countries(&self) -> Result<Vec<CountryFeedRecord>, FeedError> {
        let delay_ms = self.delay_ms.load(Ordering::SeqCst);
        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(FeedError::ProviderError(
                "Country feed returned status 503".to_string(),
            ));
        }
        Ok(self.records.lock().unwrap().clone())
    }
}

/// Rate feed stub keyed by base code; a missing base behaves as a failed
/// request
pub struct StubRateFeed {
    responses: Mutex<HashMap<String, RateFeedResponse>>,
}

impl StubRateFeed {
    pub fn new(responses: Vec<RateFeedResponse>) -> Arc<Self> {
        let responses = responses
            .into_iter()
            .map(|r| (r.base.clone(), r))
            .collect();
        Arc::new(Self {
            responses: Mutex::new(responses),
        })
    }

    pub fn set_responses(&self, responses: Vec<RateFeedResponse>) {
        *self.responses.lock().unwrap() = responses
            .into_iter()
            .map(|r| (r.base.clone(), r))
            .collect();
    }
}

#[async_trait]
impl RateFeedProvider for StubRateFeed {
    async fn fetch_latest_rates(&self, base: &str) -> Result<RateFeedResponse, FeedError> {
        self.responses
            .lock()
            .unwrap()
            .get(base)
            .cloned()
            .ok_or_else(|| FeedError::NotFound(format!("No rates for base {}", base)))
    }
}

pub struct TestContext {
    pub pool: Arc<DbPool>,
    pub country_feed: Arc<StubCountryFeed>,
    pub rate_feed: Arc<StubRateFeed>,
    pub country_service: Arc<CountryService>,
    pub currency_service: Arc<CurrencyService>,
    pub fx_service: Arc<FxService>,
    pub sync_service: Arc<SyncService>,
}

/// Wires the full service graph over a fresh database and stub feeds
pub fn setup(
    test_id: &str,
    countries: Vec<CountryFeedRecord>,
    rates: Vec<RateFeedResponse>,
) -> TestContext {
    let pool = setup_test_pool(test_id);
    let country_feed = StubCountryFeed::new(countries);
    let rate_feed = StubRateFeed::new(rates);

    let country_service = Arc::new(CountryService::new(pool.clone()));
    let currency_service = Arc::new(CurrencyService::new(pool.clone()));
    let fx_service = Arc::new(FxService::new(pool.clone(), rate_feed.clone()));
    let sync_service = Arc::new(SyncService::new(
        pool.clone(),
        country_feed.clone(),
        currency_service.clone(),
        country_service.clone(),
        fx_service.clone(),
    ));

    TestContext {
        pool,
        country_feed,
        rate_feed,
        country_service,
        currency_service,
        fx_service,
        sync_service,
    }
}
