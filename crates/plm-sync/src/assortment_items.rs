//! Placing items in assortments.
//!
//! Assortment membership is created through the assortment's `items`
//! relation; the store has no direct create for assortment-item records.

use crate::error::SyncResult;
use plm_client::{AssortmentItem, AssortmentItemCriteria, EntityStore, LinkAttributes};
use tracing::{debug, instrument};

/// Ensures an assortment-item link exists between the item and the
/// assortment.
///
/// Issues one lookup filtered by both ids; the first match is returned
/// unchanged, otherwise the item is added through the assortment relation.
/// The check and the create are not atomic.
#[instrument(skip(store))]
pub async fn ensure_item_in_assortment(
    store: &dyn EntityStore,
    item_id: &str,
    assortment_id: &str,
) -> SyncResult<AssortmentItem> {
    let page = store
        .find_assortment_items(
            AssortmentItemCriteria::ByAssortmentAndItem {
                assortment_id: assortment_id.to_string(),
                item_id: item_id.to_string(),
            },
            None,
        )
        .await?;

    if let Some(existing) = page.items.into_iter().next() {
        return Ok(existing);
    }

    debug!(item_id, assortment_id, "adding item to assortment");
    Ok(store.add_item_to_assortment(assortment_id, item_id).await?)
}

/// Ensures the assortment membership exists, then updates the join record
/// with the supplied attributes.
#[instrument(skip(store, attrs))]
pub async fn upsert_assortment_item(
    store: &dyn EntityStore,
    attrs: &LinkAttributes,
    item_id: &str,
    assortment_id: &str,
) -> SyncResult<AssortmentItem> {
    let link = ensure_item_in_assortment(store, item_id, assortment_id).await?;
    Ok(store.update_assortment_item(&link.id, attrs).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use plm_client::mock::StoreOp;
    use plm_client::testing::sample_link_attrs;
    use plm_client::{EntityKind, MockEntityStore};

    #[tokio::test]
    async fn test_ensure_adds_item_through_the_relation_when_absent() {
        let store = MockEntityStore::new("mock");

        let link = ensure_item_in_assortment(&store, "i-1", "a-1").await.unwrap();

        assert_eq!(link.item_id, "i-1");
        assert_eq!(link.assortment_id, "a-1");
        assert_eq!(
            store
                .call_count(StoreOp::Find, EntityKind::AssortmentItem)
                .await,
            1
        );
        assert_eq!(
            store
                .call_count(StoreOp::Create, EntityKind::AssortmentItem)
                .await,
            1
        );
    }

    #[tokio::test]
    async fn test_ensure_returns_first_match_without_creating() {
        let store = MockEntityStore::new("mock");
        let existing = store.add_item_to_assortment("a-1", "i-1").await.unwrap();
        store.clear_recorded_calls().await;

        let link = ensure_item_in_assortment(&store, "i-1", "a-1").await.unwrap();

        assert_eq!(link, existing);
        assert_eq!(
            store
                .call_count(StoreOp::Create, EntityKind::AssortmentItem)
                .await,
            0
        );
    }

    #[tokio::test]
    async fn test_upsert_updates_the_membership_record() {
        let store = MockEntityStore::new("mock");

        let updated = upsert_assortment_item(&store, &sample_link_attrs(), "i-1", "a-1")
            .await
            .unwrap();

        assert_eq!(updated.properties["retailPrice"], serde_json::json!(29.99));
        assert_eq!(
            store
                .call_count(StoreOp::Create, EntityKind::AssortmentItem)
                .await,
            1
        );
        assert_eq!(
            store
                .call_count(StoreOp::Update, EntityKind::AssortmentItem)
                .await,
            1
        );
    }
}
