//! Season projects.

use crate::error::SyncResult;
use plm_client::{
    collect_pages, EntityStore, Project, ProjectCriteria, ProjectPayload, WorkspaceType,
};
use tracing::{info, instrument};

/// Finds the project named after the season, creating it if absent.
///
/// The store cannot filter workspaces by name, so the full listing is paged
/// through and filtered client-side on name and the PROJECT root type.
#[instrument(skip(store))]
pub async fn ensure_project_for_season(
    store: &dyn EntityStore,
    season: &str,
) -> SyncResult<Project> {
    let projects = collect_pages(|cursor| store.find_projects(ProjectCriteria::All, cursor)).await?;

    if let Some(existing) = projects
        .into_iter()
        .find(|p| p.name == season && p.root_workspace_type == WorkspaceType::Project)
    {
        return Ok(existing);
    }

    let created = store.create_project(&ProjectPayload::project(season)).await?;
    info!(project_id = %created.id, season, "created season project");
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use plm_client::mock::StoreOp;
    use plm_client::{EntityKind, MockEntityStore};

    #[tokio::test]
    async fn test_returns_existing_season_project() {
        let store = MockEntityStore::new("mock");
        let existing = store
            .create_project(&ProjectPayload::project("SS26"))
            .await
            .unwrap();
        store.clear_recorded_calls().await;

        let project = ensure_project_for_season(&store, "SS26").await.unwrap();

        assert_eq!(project.id, existing.id);
        assert_eq!(
            store
                .call_count(StoreOp::Create, EntityKind::Workspace)
                .await,
            0
        );
    }

    #[tokio::test]
    async fn test_creates_project_when_season_is_new() {
        let store = MockEntityStore::new("mock");
        store
            .create_project(&ProjectPayload::project("FW25"))
            .await
            .unwrap();
        store.clear_recorded_calls().await;

        let project = ensure_project_for_season(&store, "SS26").await.unwrap();

        assert_eq!(project.name, "SS26");
        assert_eq!(project.root_workspace_type, WorkspaceType::Project);
        assert_eq!(
            store
                .call_count(StoreOp::Create, EntityKind::Workspace)
                .await,
            1
        );
    }

    #[tokio::test]
    async fn test_ignores_non_project_workspaces_with_matching_name() {
        let store = MockEntityStore::new("mock");
        store
            .create_project(&ProjectPayload {
                name: "SS26".to_string(),
                root_workspace_type: WorkspaceType::Library,
            })
            .await
            .unwrap();
        store.clear_recorded_calls().await;

        let project = ensure_project_for_season(&store, "SS26").await.unwrap();

        assert_eq!(project.root_workspace_type, WorkspaceType::Project);
        assert_eq!(
            store
                .call_count(StoreOp::Create, EntityKind::Workspace)
                .await,
            1
        );
    }

    #[tokio::test]
    async fn test_scans_every_page_of_the_workspace_listing() {
        let store = MockEntityStore::new("mock").with_page_size(2);
        for n in 0..4 {
            store
                .create_project(&ProjectPayload::project(format!("FW2{}", n)))
                .await
                .unwrap();
        }
        let target = store
            .create_project(&ProjectPayload::project("SS26"))
            .await
            .unwrap();
        store.clear_recorded_calls().await;

        let project = ensure_project_for_season(&store, "SS26").await.unwrap();

        assert_eq!(project.id, target.id);
        // 5 records in pages of 2: three full-or-partial pages plus the
        // terminating empty page.
        assert!(store.call_count(StoreOp::Find, EntityKind::Workspace).await >= 3);
    }
}
