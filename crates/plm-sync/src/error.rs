//! Errors for sync operations.

use plm_client::StoreError;
use thiserror::Error;

/// Errors that can occur in sync operations.
///
/// Store failures pass through unmodified; the only errors raised here are
/// precondition checks performed before any store call.
#[derive(Error, Debug, Clone)]
pub enum SyncError {
    #[error("item must have a federated id to be upserted")]
    MissingFederatedId,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;
