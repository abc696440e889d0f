use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use num_traits::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Domain model for one exchange rate observation.
///
/// A row is identified by its surrogate id; the (base, target, date) triple
/// is unique and immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    pub id: String,
    pub base: String,
    pub target: String,
    pub rate: Decimal,
    pub date: NaiveDate,
    pub created_at: NaiveDateTime,
}

impl ExchangeRate {
    /// Builds a new rate observation with a fresh surrogate id
    pub fn new(base: &str, target: &str, rate: Decimal, date: NaiveDate) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            base: base.to_string(),
            target: target.to_string(),
            rate,
            date,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}

/// Trimmed rate view attached to currencies on the country detail surface
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RateSnapshot {
    pub currency_code: String,
    pub rate: Decimal,
    pub date: NaiveDate,
}

impl From<ExchangeRate> for RateSnapshot {
    fn from(rate: ExchangeRate) -> Self {
        Self {
            currency_code: rate.target,
            rate: rate.rate,
            date: rate.date,
        }
    }
}

/// Database model for exchange rates
#[derive(
    Queryable, Identifiable, Insertable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::exchange_rates)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ExchangeRateDB {
    pub id: String,
    pub base: String,
    pub target: String,
    pub rate: f64,
    pub date: NaiveDate,
    pub created_at: NaiveDateTime,
}

impl From<ExchangeRateDB> for ExchangeRate {
    fn from(db: ExchangeRateDB) -> Self {
        Self {
            id: db.id,
            base: db.base,
            target: db.target,
            rate: Decimal::from_f64(db.rate).unwrap_or_default(),
            date: db.date,
            created_at: db.created_at,
        }
    }
}

impl From<ExchangeRate> for ExchangeRateDB {
    fn from(domain: ExchangeRate) -> Self {
        Self {
            id: domain.id,
            base: domain.base,
            target: domain.target,
            rate: domain.rate.to_f64().unwrap_or_default(),
            date: domain.date,
            created_at: domain.created_at,
        }
    }
}
