//! Integration assortments under a project.

use crate::error::SyncResult;
use plm_client::{
    collect_pages, Assortment, AssortmentCriteria, AssortmentPayload, AssortmentType, EntityStore,
};
use tracing::{info, instrument};

/// Finds the integration assortment named `"{channel} {division}"` under the
/// project, creating it if absent.
///
/// The store can filter assortments by root workspace; the name and the
/// direct-parent check are applied client-side.
#[instrument(skip(store))]
pub async fn ensure_assortment_for_project(
    store: &dyn EntityStore,
    project_id: &str,
    channel: &str,
    division: &str,
) -> SyncResult<Assortment> {
    let name = format!("{} {}", channel, division);

    let assortments = collect_pages(|cursor| {
        store.find_assortments(
            AssortmentCriteria::ByRootWorkspace(project_id.to_string()),
            cursor,
        )
    })
    .await?;

    if let Some(existing) = assortments
        .into_iter()
        .find(|a| a.name == name && a.workspace_id == project_id)
    {
        return Ok(existing);
    }

    let created = store
        .create_assortment(&AssortmentPayload {
            name,
            workspace_id: project_id.to_string(),
            assortment_type: AssortmentType::Integration,
        })
        .await?;
    info!(assortment_id = %created.id, name = %created.name, "created integration assortment");
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use plm_client::mock::StoreOp;
    use plm_client::{EntityKind, MockEntityStore};

    async fn seed_assortment(store: &MockEntityStore, name: &str, workspace_id: &str) -> Assortment {
        store
            .create_assortment(&AssortmentPayload {
                name: name.to_string(),
                workspace_id: workspace_id.to_string(),
                assortment_type: AssortmentType::Integration,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_returns_existing_assortment_by_name_and_parent() {
        let store = MockEntityStore::new("mock");
        let existing = seed_assortment(&store, "retail womens", "p-1").await;
        store.clear_recorded_calls().await;

        let assortment = ensure_assortment_for_project(&store, "p-1", "retail", "womens")
            .await
            .unwrap();

        assert_eq!(assortment.id, existing.id);
        assert_eq!(
            store
                .call_count(StoreOp::Create, EntityKind::Assortment)
                .await,
            0
        );
    }

    #[tokio::test]
    async fn test_creates_integration_assortment_when_absent() {
        let store = MockEntityStore::new("mock");
        seed_assortment(&store, "wholesale womens", "p-1").await;
        store.clear_recorded_calls().await;

        let assortment = ensure_assortment_for_project(&store, "p-1", "retail", "womens")
            .await
            .unwrap();

        assert_eq!(assortment.name, "retail womens");
        assert_eq!(assortment.workspace_id, "p-1");
        assert_eq!(assortment.assortment_type, AssortmentType::Integration);
        assert_eq!(
            store
                .call_count(StoreOp::Create, EntityKind::Assortment)
                .await,
            1
        );
    }

    #[tokio::test]
    async fn test_same_name_under_other_project_does_not_match() {
        let store = MockEntityStore::new("mock");
        seed_assortment(&store, "retail womens", "p-other").await;
        store.clear_recorded_calls().await;

        let assortment = ensure_assortment_for_project(&store, "p-1", "retail", "womens")
            .await
            .unwrap();

        assert_eq!(assortment.workspace_id, "p-1");
        assert_eq!(
            store
                .call_count(StoreOp::Create, EntityKind::Assortment)
                .await,
            1
        );
    }
}
