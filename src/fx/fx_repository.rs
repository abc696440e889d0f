use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use log::error;
use std::sync::Arc;

use super::fx_errors::{FxError, Result};
use super::fx_model::{ExchangeRate, ExchangeRateDB};
use crate::db::get_connection;
use crate::schema::exchange_rates;

pub struct FxRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl FxRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    /// Looks up the rate row for one (base, target, date) triple, on the
    /// supplied connection
    pub fn find_rate(
        &self,
        conn: &mut SqliteConnection,
        base: &str,
        target: &str,
        date: NaiveDate,
    ) -> Result<Option<ExchangeRate>> {
        let rate = exchange_rates::table
            .filter(exchange_rates::base.eq(base))
            .filter(exchange_rates::target.eq(target))
            .filter(exchange_rates::date.eq(date))
            .first::<ExchangeRateDB>(conn)
            .optional()?;

        Ok(rate.map(ExchangeRate::from))
    }

    /// Inserts a new rate row, on the supplied connection.
    ///
    /// Rate history is append-only; callers check for an existing triple
    /// first and the unique index backstops them.
    pub fn insert(&self, conn: &mut SqliteConnection, rate: ExchangeRate) -> Result<ExchangeRate> {
        let rate_db = ExchangeRateDB::from(rate);

        diesel::insert_into(exchange_rates::table)
            .values(&rate_db)
            .execute(conn)
            .map_err(|e| {
                error!(
                    "Failed to insert exchange rate {}/{} on {}: {}",
                    rate_db.base, rate_db.target, rate_db.date, e
                );
                FxError::SaveError(e.to_string())
            })?;

        Ok(rate_db.into())
    }

    /// Returns the rows for the most recent date observed for the given base
    pub fn get_latest_rates(&self, base: &str) -> Result<Vec<ExchangeRate>> {
        let mut conn =
            get_connection(&self.pool).map_err(|e| FxError::DatabaseError(e.to_string()))?;

        let max_date = exchange_rates::table
            .filter(exchange_rates::base.eq(base))
            .select(diesel::dsl::max(exchange_rates::date))
            .first::<Option<NaiveDate>>(&mut conn)?;

        let max_date = match max_date {
            Some(date) => date,
            None => return Ok(Vec::new()),
        };

        let rates = exchange_rates::table
            .filter(exchange_rates::base.eq(base))
            .filter(exchange_rates::date.eq(max_date))
            .order(exchange_rates::target.asc())
            .load::<ExchangeRateDB>(&mut conn)?;

        Ok(rates.into_iter().map(ExchangeRate::from).collect())
    }

    /// Returns rate history for a base over an inclusive date range,
    /// descending by date
    pub fn get_rates_history(
        &self,
        base: &str,
        from_date: NaiveDate,
        to_date: NaiveDate,
    ) -> Result<Vec<ExchangeRate>> {
        let mut conn =
            get_connection(&self.pool).map_err(|e| FxError::DatabaseError(e.to_string()))?;

        let rates = exchange_rates::table
            .filter(exchange_rates::base.eq(base))
            .filter(exchange_rates::date.ge(from_date))
            .filter(exchange_rates::date.le(to_date))
            .order((exchange_rates::date.desc(), exchange_rates::target.asc()))
            .load::<ExchangeRateDB>(&mut conn)?;

        Ok(rates.into_iter().map(ExchangeRate::from).collect())
    }
}
