//! End-to-end provisioning of an integration item.

use crate::assortment_items::ensure_item_in_assortment;
use crate::error::SyncResult;
use crate::items::upsert_item;
use crate::project_items::upsert_project_item;
use plm_client::{AssortmentItem, EntityStore, ItemPayload, LinkAttributes};
use tracing::instrument;

/// Upserts an item by federated id, upserts its project link with the given
/// attributes, and ensures the item is a member of the assortment. Returns
/// the assortment-item record.
#[instrument(skip(store, item, attrs), fields(name = %item.name))]
pub async fn provision_assortment_item(
    store: &dyn EntityStore,
    item: &ItemPayload,
    attrs: &LinkAttributes,
    project_id: &str,
    assortment_id: &str,
) -> SyncResult<AssortmentItem> {
    let item = upsert_item(store, item).await?;
    upsert_project_item(store, attrs, &item.id, project_id).await?;
    ensure_item_in_assortment(store, &item.id, assortment_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyncError;
    use plm_client::testing::{sample_item_payload, sample_link_attrs};
    use plm_client::{MockEntityStore, ProjectItemCriteria};

    #[tokio::test]
    async fn test_provision_wires_item_into_project_and_assortment() {
        let store = MockEntityStore::new("mock");

        let link = provision_assortment_item(
            &store,
            &sample_item_payload("Crew Tee", Some("erp:1")),
            &sample_link_attrs(),
            "p-1",
            "a-1",
        )
        .await
        .unwrap();

        let item = store
            .find_item_by_federated_id("erp:1")
            .await
            .unwrap()
            .expect("item should have been upserted");
        assert_eq!(link.item_id, item.id);
        assert_eq!(link.assortment_id, "a-1");

        let project_links = store
            .find_project_items(
                ProjectItemCriteria::ByProjectAndItem {
                    project_id: "p-1".to_string(),
                    item_id: item.id.clone(),
                },
                None,
            )
            .await
            .unwrap();
        assert_eq!(project_links.items.len(), 1);
        assert_eq!(
            project_links.items[0].properties["carryover"],
            serde_json::json!(true)
        );
    }

    #[tokio::test]
    async fn test_provision_is_idempotent_for_the_same_federated_id() {
        let store = MockEntityStore::new("mock");
        let payload = sample_item_payload("Crew Tee", Some("erp:1"));
        let attrs = sample_link_attrs();

        let first = provision_assortment_item(&store, &payload, &attrs, "p-1", "a-1")
            .await
            .unwrap();
        let second = provision_assortment_item(&store, &payload, &attrs, "p-1", "a-1")
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.item_id, second.item_id);
    }

    #[tokio::test]
    async fn test_provision_requires_a_federated_id() {
        let store = MockEntityStore::new("mock");

        let err = provision_assortment_item(
            &store,
            &sample_item_payload("Crew Tee", None),
            &sample_link_attrs(),
            "p-1",
            "a-1",
        )
        .await
        .unwrap_err();

        assert!(matches!(err, SyncError::MissingFederatedId));
        assert!(store.recorded_calls().await.is_empty());
    }
}
