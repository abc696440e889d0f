use serde::Serialize;
use std::fmt;

/// State of one sync run.
///
/// Committed and RolledBack are terminal; any state moves to RolledBack on
/// an unrecovered error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SyncRunState {
    Idle,
    Fetching,
    ReconcilingCurrencies,
    ReconcilingCountries,
    ReconcilingRates,
    Committed,
    RolledBack,
}

impl fmt::Display for SyncRunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncRunState::Idle => "IDLE",
            SyncRunState::Fetching => "FETCHING",
            SyncRunState::ReconcilingCurrencies => "RECONCILING_CURRENCIES",
            SyncRunState::ReconcilingCountries => "RECONCILING_COUNTRIES",
            SyncRunState::ReconcilingRates => "RECONCILING_RATES",
            SyncRunState::Committed => "COMMITTED",
            SyncRunState::RolledBack => "ROLLED_BACK",
        };
        write!(f, "{}", name)
    }
}

/// Outcome of one committed sync run
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SyncSummary {
    pub countries_processed: usize,
    pub currencies_processed: usize,
    pub rates_inserted: usize,
}
