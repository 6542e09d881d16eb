//! Item upsert keyed on the federated id.

use crate::error::{SyncError, SyncResult};
use plm_client::{EntityStore, Item, ItemPayload};
use tracing::{debug, instrument};

/// Creates or updates an item, using its federated id as the natural key.
///
/// Fails with [`SyncError::MissingFederatedId`] before any store call if the
/// payload carries no federated id. Otherwise issues exactly one lookup,
/// followed by exactly one update (when a record exists) or one create.
#[instrument(skip(store, item), fields(name = %item.name))]
pub async fn upsert_item(store: &dyn EntityStore, item: &ItemPayload) -> SyncResult<Item> {
    let federated_id = item
        .federated_id
        .as_deref()
        .ok_or(SyncError::MissingFederatedId)?;

    match store.find_item_by_federated_id(federated_id).await? {
        Some(existing) => {
            debug!(item_id = %existing.id, federated_id, "updating existing item");
            Ok(store.update_item(&existing.id, item).await?)
        }
        None => {
            debug!(federated_id, "creating new item");
            Ok(store.create_item(item).await?)
        }
    }
}
