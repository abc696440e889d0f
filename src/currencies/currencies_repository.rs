use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use crate::currencies::{CurrencyError, Result};
use crate::db::get_connection;
use crate::schema::currencies;

use super::currencies_model::{Currency, CurrencyDB};

/// Repository for managing currency data in the database
pub struct CurrencyRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
}

impl CurrencyRepository {
    /// Creates a new CurrencyRepository instance
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    /// Inserts or updates a currency keyed by its 3-letter code.
    ///
    /// Runs on the supplied connection so it can participate in the sync
    /// transaction.
    pub fn upsert(&self, conn: &mut SqliteConnection, currency: Currency) -> Result<Currency> {
        let currency_db = CurrencyDB::from(currency);

        diesel::insert_into(currencies::table)
            .values(&currency_db)
            .on_conflict(currencies::code)
            .do_update()
            .set((
                currencies::name.eq(&currency_db.name),
                currencies::symbol.eq(&currency_db.symbol),
            ))
            .execute(conn)?;

        Ok(currency_db.into())
    }

    /// Checks whether a currency code exists, on the supplied connection
    pub fn exists(&self, conn: &mut SqliteConnection, currency_code: &str) -> Result<bool> {
        let found = currencies::table
            .find(currency_code)
            .first::<CurrencyDB>(conn)
            .optional()?;
        Ok(found.is_some())
    }

    /// Retrieves a currency by its code
    pub fn get_by_code(&self, currency_code: &str) -> Result<Currency> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| CurrencyError::DatabaseError(e.to_string()))?;

        let currency = currencies::table
            .find(currency_code)
            .first::<CurrencyDB>(&mut conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => CurrencyError::NotFound(format!(
                    "Currency with code {} not found",
                    currency_code
                )),
                _ => CurrencyError::DatabaseError(e.to_string()),
            })?;

        Ok(currency.into())
    }

    /// Lists all currencies ordered by code
    pub fn list(&self) -> Result<Vec<Currency>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| CurrencyError::DatabaseError(e.to_string()))?;

        currencies::table
            .order(currencies::code.asc())
            .load::<CurrencyDB>(&mut conn)
            .map_err(|e| CurrencyError::DatabaseError(e.to_string()))
            .map(|results| results.into_iter().map(Currency::from).collect())
    }

    /// Lists all currency codes ordered by code
    pub fn list_codes(&self) -> Result<Vec<String>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| CurrencyError::DatabaseError(e.to_string()))?;

        currencies::table
            .select(currencies::code)
            .order(currencies::code.asc())
            .load::<String>(&mut conn)
            .map_err(|e| CurrencyError::DatabaseError(e.to_string()))
    }
}
