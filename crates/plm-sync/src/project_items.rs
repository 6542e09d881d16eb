//! Placing items in projects.

use crate::error::SyncResult;
use plm_client::{EntityStore, LinkAttributes, ProjectItem, ProjectItemCriteria};
use tracing::{debug, instrument};

/// Ensures a project-item link exists between the item and the project.
///
/// Issues one lookup filtered by both ids; if any link exists, the first
/// match is returned unchanged, otherwise one is created. The check and the
/// create are separate round trips, so concurrent callers can race and
/// produce duplicate links.
#[instrument(skip(store))]
pub async fn ensure_item_in_project(
    store: &dyn EntityStore,
    item_id: &str,
    project_id: &str,
) -> SyncResult<ProjectItem> {
    let page = store
        .find_project_items(
            ProjectItemCriteria::ByProjectAndItem {
                project_id: project_id.to_string(),
                item_id: item_id.to_string(),
            },
            None,
        )
        .await?;

    if let Some(existing) = page.items.into_iter().next() {
        return Ok(existing);
    }

    debug!(item_id, project_id, "creating project-item link");
    Ok(store.create_project_item(item_id, project_id).await?)
}

/// Ensures the project-item link exists, then updates it with the supplied
/// attributes.
#[instrument(skip(store, attrs))]
pub async fn upsert_project_item(
    store: &dyn EntityStore,
    attrs: &LinkAttributes,
    item_id: &str,
    project_id: &str,
) -> SyncResult<ProjectItem> {
    let link = ensure_item_in_project(store, item_id, project_id).await?;
    Ok(store.update_project_item(&link.id, attrs).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use plm_client::mock::StoreOp;
    use plm_client::testing::sample_link_attrs;
    use plm_client::{EntityKind, MockEntityStore};

    #[tokio::test]
    async fn test_ensure_creates_link_when_absent() {
        let store = MockEntityStore::new("mock");

        let link = ensure_item_in_project(&store, "i-1", "p-1").await.unwrap();

        assert_eq!(link.item_id, "i-1");
        assert_eq!(link.project_id, "p-1");
        assert_eq!(
            store.call_count(StoreOp::Find, EntityKind::ProjectItem).await,
            1
        );
        assert_eq!(
            store
                .call_count(StoreOp::Create, EntityKind::ProjectItem)
                .await,
            1
        );
    }

    #[tokio::test]
    async fn test_ensure_returns_first_match_without_creating() {
        let store = MockEntityStore::new("mock");
        let existing = store.create_project_item("i-1", "p-1").await.unwrap();
        store.clear_recorded_calls().await;

        let link = ensure_item_in_project(&store, "i-1", "p-1").await.unwrap();

        assert_eq!(link, existing);
        assert_eq!(
            store.call_count(StoreOp::Find, EntityKind::ProjectItem).await,
            1
        );
        assert_eq!(
            store
                .call_count(StoreOp::Create, EntityKind::ProjectItem)
                .await,
            0
        );
    }

    #[tokio::test]
    async fn test_ensure_only_matches_the_exact_pair() {
        let store = MockEntityStore::new("mock");
        store.create_project_item("i-1", "p-other").await.unwrap();
        store.clear_recorded_calls().await;

        let link = ensure_item_in_project(&store, "i-1", "p-1").await.unwrap();

        assert_eq!(link.project_id, "p-1");
        assert_eq!(
            store
                .call_count(StoreOp::Create, EntityKind::ProjectItem)
                .await,
            1
        );
    }

    #[tokio::test]
    async fn test_upsert_updates_the_ensured_link() {
        let store = MockEntityStore::new("mock");
        let existing = store.create_project_item("i-1", "p-1").await.unwrap();
        store.clear_recorded_calls().await;

        let updated = upsert_project_item(&store, &sample_link_attrs(), "i-1", "p-1")
            .await
            .unwrap();

        assert_eq!(updated.id, existing.id);
        assert_eq!(updated.properties["carryover"], serde_json::json!(true));
        assert_eq!(
            store
                .call_count(StoreOp::Update, EntityKind::ProjectItem)
                .await,
            1
        );
    }
}
