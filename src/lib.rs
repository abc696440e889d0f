pub mod db;

pub mod countries;
pub mod currencies;
pub mod errors;
pub mod feed;
pub mod fx;
pub mod schema;
pub mod sync;

pub use errors::{Error, Result};
