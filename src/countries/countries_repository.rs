use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use crate::countries::{CountryError, Result};
use crate::currencies::{Currency, CurrencyDB};
use crate::db::get_connection;
use crate::schema::{countries, countries_currencies, currencies};

use super::countries_model::{Country, CountryCurrencyDB, CountryDB};

/// Repository for managing country data in the database
pub struct CountryRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
}

impl CountryRepository {
    /// Creates a new CountryRepository instance
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    /// Inserts or updates a country keyed by its 3-letter id, on the
    /// supplied connection.
    ///
    /// Scalar fields are overwritten, not merged; created_at is preserved
    /// on update.
    pub fn upsert(&self, conn: &mut SqliteConnection, country: Country) -> Result<Country> {
        let country_db = CountryDB::from(country);

        diesel::insert_into(countries::table)
            .values(&country_db)
            .on_conflict(countries::id)
            .do_update()
            .set((
                countries::name.eq(&country_db.name),
                countries::capital.eq(&country_db.capital),
                countries::flag.eq(&country_db.flag),
                countries::area.eq(country_db.area),
                countries::languages.eq(&country_db.languages),
                countries::timezones.eq(&country_db.timezones),
                countries::maps.eq(&country_db.maps),
                countries::latlng.eq(&country_db.latlng),
                countries::updated_at.eq(country_db.updated_at),
            ))
            .execute(conn)?;

        Ok(country_db.into())
    }

    /// Returns the currency codes currently associated with a country, on
    /// the supplied connection
    pub fn get_currency_codes(
        &self,
        conn: &mut SqliteConnection,
        country_id: &str,
    ) -> Result<Vec<String>> {
        let codes = countries_currencies::table
            .filter(countries_currencies::country_id.eq(country_id))
            .select(countries_currencies::currency_code)
            .load::<String>(conn)?;
        Ok(codes)
    }

    /// Adds one country-currency association, on the supplied connection
    pub fn link_currency(
        &self,
        conn: &mut SqliteConnection,
        country_id: &str,
        currency_code: &str,
    ) -> Result<()> {
        let link = CountryCurrencyDB {
            country_id: country_id.to_string(),
            currency_code: currency_code.to_string(),
        };

        diesel::insert_into(countries_currencies::table)
            .values(&link)
            .execute(conn)?;
        Ok(())
    }

    /// Removes one country-currency association, on the supplied connection
    pub fn unlink_currency(
        &self,
        conn: &mut SqliteConnection,
        country_id: &str,
        currency_code: &str,
    ) -> Result<()> {
        diesel::delete(
            countries_currencies::table
                .filter(countries_currencies::country_id.eq(country_id))
                .filter(countries_currencies::currency_code.eq(currency_code)),
        )
        .execute(conn)?;
        Ok(())
    }

    /// Counts the countries in storage
    pub fn count(&self) -> Result<i64> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| CountryError::DatabaseError(e.to_string()))?;

        countries::table
            .count()
            .get_result(&mut conn)
            .map_err(|e| CountryError::DatabaseError(e.to_string()))
    }

    /// Retrieves a country by its 3-letter id
    pub fn get_by_id(&self, country_id: &str) -> Result<Country> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| CountryError::DatabaseError(e.to_string()))?;

        let country = countries::table
            .find(country_id)
            .first::<CountryDB>(&mut conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    CountryError::NotFound(format!("Country with id {} not found", country_id))
                }
                _ => CountryError::DatabaseError(e.to_string()),
            })?;

        Ok(country.into())
    }

    /// Lists all countries ordered by name
    pub fn list(&self) -> Result<Vec<Country>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| CountryError::DatabaseError(e.to_string()))?;

        countries::table
            .order(countries::name.asc())
            .load::<CountryDB>(&mut conn)
            .map_err(|e| CountryError::DatabaseError(e.to_string()))
            .map(|results| results.into_iter().map(Country::from).collect())
    }

    /// Returns the currencies associated with a country
    pub fn get_currencies(&self, country_id: &str) -> Result<Vec<Currency>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| CountryError::DatabaseError(e.to_string()))?;

        countries_currencies::table
            .inner_join(currencies::table)
            .filter(countries_currencies::country_id.eq(country_id))
            .select(CurrencyDB::as_select())
            .order(currencies::code.asc())
            .load::<CurrencyDB>(&mut conn)
            .map_err(|e| CountryError::DatabaseError(e.to_string()))
            .map(|results| results.into_iter().map(Currency::from).collect())
    }
}
