use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Domain model representing a currency
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    pub code: String,
    pub name: String,
    pub symbol: String,
}

/// Database model for currencies
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::currencies)]
#[diesel(primary_key(code))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CurrencyDB {
    pub code: String,
    pub name: String,
    pub symbol: String,
}

impl From<CurrencyDB> for Currency {
    fn from(db: CurrencyDB) -> Self {
        Self {
            code: db.code,
            name: db.name,
            symbol: db.symbol,
        }
    }
}

impl From<Currency> for CurrencyDB {
    fn from(domain: Currency) -> Self {
        Self {
            code: domain.code,
            name: domain.name,
            symbol: domain.symbol,
        }
    }
}
