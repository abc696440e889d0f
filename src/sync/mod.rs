pub(crate) mod sync_errors;
pub(crate) mod sync_model;
pub(crate) mod sync_scheduler;
pub(crate) mod sync_service;

// Re-export the public interface
pub use sync_model::{SyncRunState, SyncSummary};
pub use sync_scheduler::SyncScheduler;
pub use sync_service::{merge_currency_records, SyncService};

// Re-export error types for convenience
pub use sync_errors::SyncError;
