use chrono::NaiveDate;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::time::Duration;

use atlas_core::countries::{CountryDetailed, CountryError};
use atlas_core::db::DbTransactionExecutor;
use atlas_core::feed::{
    CountryFeedMaps, CountryFeedName, CountryFeedRecord, CurrencyFeedRecord, RateFeedResponse,
};
use atlas_core::sync::{SyncError, SyncRunState};

mod common;

fn country(
    cca3: &str,
    name: &str,
    currencies: &[(&str, &str, &str)],
) -> CountryFeedRecord {
    CountryFeedRecord {
        cca3: cca3.to_string(),
        name: Some(CountryFeedName {
            common: name.to_string(),
            official: name.to_string(),
        }),
        capital: vec![format!("{} City", name)],
        flag: "\u{1F3F3}".to_string(),
        latlng: vec![10.0, 20.0],
        timezones: vec!["UTC".to_string()],
        area: 1000.0,
        languages: HashMap::from([("eng".to_string(), "English".to_string())]),
        currencies: currencies
            .iter()
            .map(|(code, name, symbol)| {
                (
                    code.to_string(),
                    CurrencyFeedRecord {
                        name: name.to_string(),
                        symbol: symbol.to_string(),
                    },
                )
            })
            .collect(),
        maps: CountryFeedMaps {
            google_maps: format!("https://goo.gl/maps/{}", cca3),
            open_street_maps: format!("https://www.openstreetmap.org/relation/{}", cca3),
        },
    }
}

fn default_feed() -> Vec<CountryFeedRecord> {
    vec![
        country("USA", "United States", &[("USD", "United States dollar", "$")]),
        country("FRA", "France", &[("EUR", "Euro", "\u{20AC}")]),
    ]
}

/// Detailed view with the write timestamps zeroed out, so runs can be
/// compared field by field
fn detail_without_timestamps(ctx: &common::TestContext, id: &str) -> CountryDetailed {
    let mut detail = ctx.country_service.get_country(id).unwrap();
    detail.country.created_at = Default::default();
    detail.country.updated_at = Default::default();
    detail
}

fn usd_rates(date: &str, eur: f64) -> RateFeedResponse {
    RateFeedResponse {
        base: "USD".to_string(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        rates: HashMap::from([("EUR".to_string(), eur)]),
    }
}

#[test]
fn initial_sync_populates_store() {
    let ctx = common::setup(
        "initial-sync",
        default_feed(),
        vec![usd_rates("2024-01-01", 0.9)],
    );

    let count = tokio_test::block_on(ctx.sync_service.run_manual()).unwrap();
    assert_eq!(count, 2);
    assert_eq!(ctx.sync_service.last_state(), SyncRunState::Committed);

    let countries = ctx.country_service.get_countries().unwrap();
    assert_eq!(countries.len(), 2);

    let currencies = ctx.currency_service.get_currencies().unwrap();
    assert_eq!(currencies.len(), 2);

    let usa = ctx.country_service.get_country("USA").unwrap();
    assert_eq!(usa.country.name, "United States");
    assert_eq!(usa.currencies.len(), 1);
    assert_eq!(usa.currencies[0].code, "USD");
    assert_eq!(usa.currencies[0].exchange_rates.len(), 1);
    assert_eq!(usa.currencies[0].exchange_rates[0].currency_code, "EUR");
    assert_eq!(usa.currencies[0].exchange_rates[0].rate, dec!(0.9));
    assert_eq!(
        usa.currencies[0].exchange_rates[0].date,
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    );
}

#[test]
fn running_twice_with_unchanged_feed_is_idempotent() {
    let ctx = common::setup(
        "idempotent",
        default_feed(),
        vec![usd_rates("2024-01-01", 0.9)],
    );

    tokio_test::block_on(ctx.sync_service.run_manual()).unwrap();
    let usa_before = detail_without_timestamps(&ctx, "USA");
    let fra_before = detail_without_timestamps(&ctx, "FRA");
    let currencies_before = ctx.currency_service.get_currencies().unwrap();

    tokio_test::block_on(ctx.sync_service.run_manual()).unwrap();

    assert_eq!(usa_before, detail_without_timestamps(&ctx, "USA"));
    assert_eq!(fra_before, detail_without_timestamps(&ctx, "FRA"));
    assert_eq!(currencies_before, ctx.currency_service.get_currencies().unwrap());

    // No duplicate rate rows either
    let usd_rates = ctx.fx_service.get_latest_rates("USD").unwrap();
    assert_eq!(usd_rates.len(), 1);
}

#[test]
fn associations_are_rewritten_to_match_the_source_record() {
    let ctx = common::setup("assoc-rewrite", default_feed(), vec![]);

    tokio_test::block_on(ctx.sync_service.run_manual()).unwrap();
    let usa = ctx.country_service.get_country("USA").unwrap();
    assert_eq!(usa.currencies.len(), 1);
    assert_eq!(usa.currencies[0].code, "USD");

    // The upstream record now carries a different currency set
    ctx.country_feed.set_records(vec![
        country("USA", "United States", &[("EUR", "Euro", "\u{20AC}")]),
        country("FRA", "France", &[("EUR", "Euro", "\u{20AC}")]),
    ]);
    tokio_test::block_on(ctx.sync_service.run_manual()).unwrap();

    let usa = ctx.country_service.get_country("USA").unwrap();
    let codes: Vec<&str> = usa.currencies.iter().map(|c| c.code.as_str()).collect();
    assert_eq!(codes, vec!["EUR"]);

    // The currency row itself is never deleted by the sync path
    assert!(ctx.currency_service.get_currency("USD").is_ok());
}

#[test]
fn rate_history_is_append_only_per_day() {
    let ctx = common::setup(
        "append-only",
        default_feed(),
        vec![usd_rates("2024-01-01", 0.9)],
    );

    tokio_test::block_on(ctx.sync_service.run_manual()).unwrap();
    tokio_test::block_on(ctx.sync_service.run_manual()).unwrap();

    let rates = ctx.fx_service.get_latest_rates("USD").unwrap();
    assert_eq!(rates.len(), 1);
    assert_eq!(rates[0].rate, dec!(0.9));

    // A different value for an already-stored (base, target, date) triple
    // must not overwrite it
    ctx.rate_feed.set_responses(vec![usd_rates("2024-01-01", 0.95)]);
    tokio_test::block_on(ctx.sync_service.run_manual()).unwrap();

    let rates = ctx.fx_service.get_latest_rates("USD").unwrap();
    assert_eq!(rates.len(), 1);
    assert_eq!(rates[0].rate, dec!(0.9));
}

#[test]
fn malformed_country_is_skipped_without_failing_the_run() {
    let mut feed = default_feed();
    feed.insert(
        1,
        CountryFeedRecord {
            cca3: "XXX".to_string(),
            name: None,
            ..Default::default()
        },
    );
    let ctx = common::setup("malformed-record", feed, vec![]);

    let count = tokio_test::block_on(ctx.sync_service.run_manual()).unwrap();

    assert_eq!(count, 2);
    assert_eq!(ctx.sync_service.last_state(), SyncRunState::Committed);
    assert_eq!(ctx.country_service.get_countries().unwrap().len(), 2);
}

#[test]
fn fetch_failure_rolls_back_and_surfaces_to_the_manual_caller() {
    let ctx = common::setup(
        "fetch-failure",
        default_feed(),
        vec![usd_rates("2024-01-01", 0.9)],
    );

    tokio_test::block_on(ctx.sync_service.run_manual()).unwrap();

    ctx.country_feed.set_fail(true);
    let result = tokio_test::block_on(ctx.sync_service.run_manual());
    assert!(matches!(result, Err(SyncError::Fetch(_))));
    assert_eq!(ctx.sync_service.last_state(), SyncRunState::RolledBack);

    // The committed state of the previous run is untouched
    assert_eq!(ctx.country_service.get_countries().unwrap().len(), 2);
    assert_eq!(ctx.fx_service.get_latest_rates("USD").unwrap().len(), 1);
}

#[test]
fn second_concurrent_run_is_refused_while_one_is_active() {
    let ctx = common::setup(
        "concurrent-runs",
        default_feed(),
        vec![usd_rates("2024-01-01", 0.9)],
    );
    ctx.country_feed.set_delay(Duration::from_millis(300));

    tokio_test::block_on(async {
        let first = {
            let sync_service = ctx.sync_service.clone();
            tokio::spawn(async move { sync_service.run_manual().await })
        };

        // Let the first run take the guard and park in its slow fetch
        tokio::time::sleep(Duration::from_millis(50)).await;
        let second = ctx.sync_service.run_manual().await;
        assert!(matches!(second, Err(SyncError::AlreadyRunning)));

        let first = first.await.unwrap();
        assert_eq!(first.unwrap(), 2);
    });

    assert_eq!(ctx.sync_service.last_state(), SyncRunState::Committed);
    assert_eq!(ctx.country_service.get_countries().unwrap().len(), 2);
}

#[test]
fn scheduled_run_failure_is_swallowed_after_rollback() {
    let ctx = common::setup("scheduled-failure", default_feed(), vec![]);
    tokio_test::block_on(ctx.sync_service.run_manual()).unwrap();

    ctx.country_feed.set_fail(true);
    tokio_test::block_on(ctx.sync_service.run_scheduled());

    assert_eq!(ctx.sync_service.last_state(), SyncRunState::RolledBack);
    assert_eq!(ctx.country_service.get_countries().unwrap().len(), 2);
}

#[test]
fn detail_lookup_for_unknown_country_is_not_found() {
    let ctx = common::setup("detail-not-found", default_feed(), vec![]);
    tokio_test::block_on(ctx.sync_service.run_manual()).unwrap();

    let result = ctx.country_service.get_country("ZZZ");
    assert!(matches!(result, Err(CountryError::NotFound(_))));
}

#[test]
fn rate_history_range_is_inclusive_and_descending() {
    let ctx = common::setup(
        "history-range",
        default_feed(),
        vec![usd_rates("2024-01-01", 0.9)],
    );

    tokio_test::block_on(ctx.sync_service.run_manual()).unwrap();
    ctx.rate_feed.set_responses(vec![usd_rates("2024-01-02", 0.91)]);
    tokio_test::block_on(ctx.sync_service.run_manual()).unwrap();

    let from = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let to = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    let history = ctx.fx_service.get_rates_history("USD", from, to).unwrap();

    assert_eq!(history.len(), 2);
    assert_eq!(history[0].date, to);
    assert_eq!(history[0].rate, dec!(0.91));
    assert_eq!(history[1].date, from);
    assert_eq!(history[1].rate, dec!(0.9));
}

#[test]
fn standalone_rate_sync_reads_codes_from_storage() {
    let ctx = common::setup(
        "standalone-rates",
        default_feed(),
        vec![usd_rates("2024-01-01", 0.9)],
    );
    tokio_test::block_on(ctx.sync_service.run_manual()).unwrap();

    // Only USD resolves on the next day; the EUR request fails and must not
    // abort the sync
    ctx.rate_feed.set_responses(vec![usd_rates("2024-01-02", 0.91)]);
    let inserted = tokio_test::block_on(ctx.fx_service.sync_latest_rates()).unwrap();
    assert_eq!(inserted, 1);

    let rates = ctx.fx_service.get_latest_rates("USD").unwrap();
    assert_eq!(rates.len(), 1);
    assert_eq!(rates[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
}

#[test]
fn rates_with_unknown_base_currency_are_skipped() {
    let ctx = common::setup("unknown-base", default_feed(), vec![]);
    tokio_test::block_on(ctx.sync_service.run_manual()).unwrap();

    let stray = RateFeedResponse {
        base: "GBP".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        rates: HashMap::from([("USD".to_string(), 1.27)]),
    };

    let inserted = ctx
        .pool
        .execute(|conn| ctx.fx_service.reconcile(conn, &[stray]))
        .unwrap();

    assert_eq!(inserted, 0);
    assert!(ctx.fx_service.get_latest_rates("GBP").unwrap().is_empty());
}

#[test]
fn non_finite_rates_are_skipped() {
    let ctx = common::setup("non-finite-rate", default_feed(), vec![]);
    tokio_test::block_on(ctx.sync_service.run_manual()).unwrap();

    let response = RateFeedResponse {
        base: "USD".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        rates: HashMap::from([
            ("EUR".to_string(), f64::NAN),
            ("GBP".to_string(), 1.27),
        ]),
    };

    let inserted = ctx
        .pool
        .execute(|conn| ctx.fx_service.reconcile(conn, &[response]))
        .unwrap();
    assert_eq!(inserted, 1);

    let rates = ctx.fx_service.get_latest_rates("USD").unwrap();
    assert_eq!(rates.len(), 1);
    assert_eq!(rates[0].target, "GBP");
    assert_eq!(rates[0].rate, dec!(1.27));
}

#[test]
fn empty_store_skips_standalone_rate_sync() {
    let ctx = common::setup("empty-store-rates", vec![], vec![]);

    let inserted = tokio_test::block_on(ctx.fx_service.sync_latest_rates()).unwrap();
    assert_eq!(inserted, 0);
}
