//! `EntityStore` implementation over the remote HTTP API.

use crate::criteria::{
    AssortmentCriteria, AssortmentItemCriteria, ItemCriteria, ProjectCriteria, ProjectItemCriteria,
    QueryPairs,
};
use crate::entities::{
    Assortment, AssortmentItem, AssortmentPayload, EntityKind, Item, ItemPayload, LinkAttributes,
    Project, ProjectItem, ProjectPayload,
};
use crate::http::HttpClient;
use crate::pagination::Page;
use crate::traits::{
    require_env, Credentials, EntityStore, StoreConfig, StoreHealth, StoreResult, ENV_BASE_URL,
};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{info, instrument};

/// Client for the remote entity store.
pub struct RemoteEntityStore {
    name: String,
    http: HttpClient,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListEnvelope<T> {
    results: Vec<T>,
    #[serde(default)]
    next_page_key: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectItemBody<'a> {
    item_id: &'a str,
    project_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddItemsBody<'a> {
    item_ids: Vec<&'a str>,
}

#[derive(Deserialize)]
struct HealthBody {
    status: String,
}

impl RemoteEntityStore {
    /// Creates a store client for the given endpoint and credentials.
    pub fn new(config: StoreConfig, credentials: Credentials) -> StoreResult<Self> {
        let name = config.name.clone();
        let http = HttpClient::new(config, credentials)?;
        info!(name = %name, base_url = %http.base_url(), "entity store client initialized");
        Ok(Self { name, http })
    }

    /// Creates a store client from `PLM_STORE_URL` and the credential
    /// environment variables.
    pub fn from_env() -> StoreResult<Self> {
        let base_url = require_env(ENV_BASE_URL)?;
        let credentials = Credentials::from_env()?;
        Self::new(StoreConfig::new("plm-store", base_url), credentials)
    }

    /// Forces a login with the configured credentials. Authenticated calls
    /// otherwise log in lazily on first use.
    pub async fn login(&self) -> StoreResult<()> {
        self.http.login().await
    }

    async fn list<T: DeserializeOwned>(
        &self,
        kind: EntityKind,
        mut query: QueryPairs,
        cursor: Option<String>,
    ) -> StoreResult<Page<T>> {
        if let Some(cursor) = cursor {
            query.push(("nextPageKey", cursor));
        }
        let envelope: ListEnvelope<T> = self
            .http
            .get_json(&format!("entities/{}", kind), &query)
            .await?;
        Ok(Page {
            items: envelope.results,
            next_page_key: envelope.next_page_key,
        })
    }

    async fn create_entity<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        kind: EntityKind,
        body: &B,
    ) -> StoreResult<T> {
        self.http
            .post_json(&format!("entities/{}", kind), body)
            .await
    }

    async fn update_entity<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        kind: EntityKind,
        id: &str,
        body: &B,
    ) -> StoreResult<T> {
        self.http
            .put_json(&format!("entities/{}/{}", kind, id), body)
            .await
    }
}

#[async_trait]
impl EntityStore for RemoteEntityStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn health_check(&self) -> StoreResult<StoreHealth> {
        match self.http.get_json::<HealthBody>("health", &[]).await {
            Ok(body) if body.status == "ok" => Ok(StoreHealth::Healthy),
            Ok(body) => Ok(StoreHealth::Unhealthy(body.status)),
            Err(e) => Ok(StoreHealth::Unhealthy(e.to_string())),
        }
    }

    async fn find_projects(
        &self,
        criteria: ProjectCriteria,
        cursor: Option<String>,
    ) -> StoreResult<Page<Project>> {
        self.list(EntityKind::Workspace, criteria.query_pairs(), cursor)
            .await
    }

    #[instrument(skip(self, payload), fields(name = %payload.name))]
    async fn create_project(&self, payload: &ProjectPayload) -> StoreResult<Project> {
        self.create_entity(EntityKind::Workspace, payload).await
    }

    async fn update_project(&self, id: &str, payload: &ProjectPayload) -> StoreResult<Project> {
        self.update_entity(EntityKind::Workspace, id, payload).await
    }

    async fn find_assortments(
        &self,
        criteria: AssortmentCriteria,
        cursor: Option<String>,
    ) -> StoreResult<Page<Assortment>> {
        self.list(EntityKind::Assortment, criteria.query_pairs(), cursor)
            .await
    }

    #[instrument(skip(self, payload), fields(name = %payload.name))]
    async fn create_assortment(&self, payload: &AssortmentPayload) -> StoreResult<Assortment> {
        self.create_entity(EntityKind::Assortment, payload).await
    }

    async fn update_assortment(
        &self,
        id: &str,
        payload: &AssortmentPayload,
    ) -> StoreResult<Assortment> {
        self.update_entity(EntityKind::Assortment, id, payload)
            .await
    }

    async fn find_items(
        &self,
        criteria: ItemCriteria,
        cursor: Option<String>,
    ) -> StoreResult<Page<Item>> {
        self.list(EntityKind::Item, criteria.query_pairs(), cursor)
            .await
    }

    async fn find_item_by_federated_id(&self, federated_id: &str) -> StoreResult<Option<Item>> {
        let page: Page<Item> = self
            .list(
                EntityKind::Item,
                vec![("federatedId", federated_id.to_string())],
                None,
            )
            .await?;
        Ok(page.items.into_iter().next())
    }

    #[instrument(skip(self, payload), fields(federated_id = ?payload.federated_id))]
    async fn create_item(&self, payload: &ItemPayload) -> StoreResult<Item> {
        self.create_entity(EntityKind::Item, payload).await
    }

    #[instrument(skip(self, payload))]
    async fn update_item(&self, id: &str, payload: &ItemPayload) -> StoreResult<Item> {
        self.update_entity(EntityKind::Item, id, payload).await
    }

    async fn find_project_items(
        &self,
        criteria: ProjectItemCriteria,
        cursor: Option<String>,
    ) -> StoreResult<Page<ProjectItem>> {
        self.list(EntityKind::ProjectItem, criteria.query_pairs(), cursor)
            .await
    }

    async fn create_project_item(
        &self,
        item_id: &str,
        project_id: &str,
    ) -> StoreResult<ProjectItem> {
        let body = ProjectItemBody {
            item_id,
            project_id,
        };
        self.create_entity(EntityKind::ProjectItem, &body).await
    }

    async fn update_project_item(
        &self,
        id: &str,
        attrs: &LinkAttributes,
    ) -> StoreResult<ProjectItem> {
        self.update_entity(EntityKind::ProjectItem, id, attrs).await
    }

    async fn find_assortment_items(
        &self,
        criteria: AssortmentItemCriteria,
        cursor: Option<String>,
    ) -> StoreResult<Page<AssortmentItem>> {
        self.list(EntityKind::AssortmentItem, criteria.query_pairs(), cursor)
            .await
    }

    #[instrument(skip(self))]
    async fn add_item_to_assortment(
        &self,
        assortment_id: &str,
        item_id: &str,
    ) -> StoreResult<AssortmentItem> {
        let body = AddItemsBody {
            item_ids: vec![item_id],
        };
        self.http
            .post_json(
                &format!("entities/{}/{}/items", EntityKind::Assortment, assortment_id),
                &body,
            )
            .await
    }

    async fn update_assortment_item(
        &self,
        id: &str,
        attrs: &LinkAttributes,
    ) -> StoreResult<AssortmentItem> {
        self.update_entity(EntityKind::AssortmentItem, id, attrs)
            .await
    }
}
