//! In-memory mock store for testing.
//!
//! Backs each entity kind with a `HashMap` and records every store call so
//! tests can assert exact call counts for the upsert and ensure-relation
//! contracts. Listings are served in configurable page-size chunks with an
//! offset cursor, ending with an empty page like the real store.

use crate::criteria::{
    AssortmentCriteria, AssortmentItemCriteria, ItemCriteria, ProjectCriteria, ProjectItemCriteria,
};
use crate::entities::{
    Assortment, AssortmentItem, AssortmentPayload, EntityKind, Item, ItemPayload, LinkAttributes,
    Project, ProjectItem, ProjectPayload,
};
use crate::pagination::Page;
use crate::traits::{EntityStore, StoreError, StoreHealth, StoreResult};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// The operation class of a recorded call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Find,
    Create,
    Update,
}

/// One store call observed by the mock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordedCall {
    pub op: StoreOp,
    pub kind: EntityKind,
}

/// Mock entity store for testing.
pub struct MockEntityStore {
    name: String,
    page_size: usize,
    counter: AtomicU64,
    projects: RwLock<HashMap<String, Project>>,
    assortments: RwLock<HashMap<String, Assortment>>,
    items: RwLock<HashMap<String, Item>>,
    project_items: RwLock<HashMap<String, ProjectItem>>,
    assortment_items: RwLock<HashMap<String, AssortmentItem>>,
    calls: RwLock<Vec<RecordedCall>>,
}

impl MockEntityStore {
    /// Creates a new mock store.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            page_size: 500,
            counter: AtomicU64::new(1),
            projects: RwLock::new(HashMap::new()),
            assortments: RwLock::new(HashMap::new()),
            items: RwLock::new(HashMap::new()),
            project_items: RwLock::new(HashMap::new()),
            assortment_items: RwLock::new(HashMap::new()),
            calls: RwLock::new(Vec::new()),
        }
    }

    /// Sets the listing page size, for pagination tests.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    fn next_id(&self) -> String {
        format!("mock-{}", self.counter.fetch_add(1, Ordering::SeqCst))
    }

    async fn record(&self, op: StoreOp, kind: EntityKind) {
        self.calls.write().await.push(RecordedCall { op, kind });
    }

    /// Returns every call observed so far, in order.
    pub async fn recorded_calls(&self) -> Vec<RecordedCall> {
        self.calls.read().await.clone()
    }

    /// Counts recorded calls of one operation class against one kind.
    pub async fn call_count(&self, op: StoreOp, kind: EntityKind) -> usize {
        self.calls
            .read()
            .await
            .iter()
            .filter(|c| c.op == op && c.kind == kind)
            .count()
    }

    /// Forgets recorded calls, typically after seeding fixtures.
    pub async fn clear_recorded_calls(&self) {
        self.calls.write().await.clear();
    }

    fn page_of<T>(&self, mut all: Vec<T>, cursor: Option<String>) -> StoreResult<Page<T>> {
        let offset = match cursor {
            Some(c) => c
                .parse::<usize>()
                .map_err(|_| StoreError::InvalidRequest(format!("bad page key: {}", c)))?,
            None => 0,
        };
        if offset >= all.len() {
            return Ok(Page::empty());
        }
        let end = all.len().min(offset.saturating_add(self.page_size));
        let items: Vec<T> = all.drain(offset..end).collect();
        Ok(Page {
            items,
            next_page_key: Some(end.to_string()),
        })
    }
}

fn project_matches(project: &Project, criteria: &ProjectCriteria) -> bool {
    match criteria {
        ProjectCriteria::All => true,
        ProjectCriteria::ById(id) => project.id == *id,
    }
}

fn assortment_matches(assortment: &Assortment, criteria: &AssortmentCriteria) -> bool {
    match criteria {
        AssortmentCriteria::All => true,
        AssortmentCriteria::ById(id) => assortment.id == *id,
        AssortmentCriteria::ByRootWorkspace(root) => assortment.root_workspace_id == *root,
    }
}

fn item_matches(item: &Item, criteria: &ItemCriteria) -> bool {
    use crate::entities::ItemRole;
    match criteria {
        ItemCriteria::All => true,
        ItemCriteria::ById(id) => item.id == *id,
        ItemCriteria::ByFamily { family_id } => item.item_family_id.as_deref() == Some(family_id),
        ItemCriteria::VariantsInFamily { family_id } => {
            item.item_family_id.as_deref() == Some(family_id)
                && item.role == Some(ItemRole::Variant)
        }
        ItemCriteria::OptionsInFamily {
            family_id,
            option_group,
        } => {
            item.item_family_id.as_deref() == Some(family_id)
                && item.role == Some(ItemRole::Option)
                && item.option_group == Some(*option_group)
        }
    }
}

fn project_item_matches(link: &ProjectItem, criteria: &ProjectItemCriteria) -> bool {
    match criteria {
        ProjectItemCriteria::All => true,
        ProjectItemCriteria::ById(id) => link.id == *id,
        ProjectItemCriteria::ByItem(item_id) => link.item_id == *item_id,
        ProjectItemCriteria::ByProject(project_id) => link.project_id == *project_id,
        ProjectItemCriteria::ByProjectAndItem {
            project_id,
            item_id,
        } => link.project_id == *project_id && link.item_id == *item_id,
    }
}

fn assortment_item_matches(link: &AssortmentItem, criteria: &AssortmentItemCriteria) -> bool {
    match criteria {
        AssortmentItemCriteria::ById(id) => link.id == *id,
        AssortmentItemCriteria::ByAssortment(assortment_id) => {
            link.assortment_id == *assortment_id
        }
        AssortmentItemCriteria::ByItem(item_id) => link.item_id == *item_id,
        AssortmentItemCriteria::ByAssortmentAndItem {
            assortment_id,
            item_id,
        } => link.assortment_id == *assortment_id && link.item_id == *item_id,
    }
}

#[async_trait]
impl EntityStore for MockEntityStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn health_check(&self) -> StoreResult<StoreHealth> {
        Ok(StoreHealth::Healthy)
    }

    async fn find_projects(
        &self,
        criteria: ProjectCriteria,
        cursor: Option<String>,
    ) -> StoreResult<Page<Project>> {
        self.record(StoreOp::Find, EntityKind::Workspace).await;
        let projects = self.projects.read().await;
        let mut matching: Vec<Project> = projects
            .values()
            .filter(|p| project_matches(p, &criteria))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.id.cmp(&b.id));
        self.page_of(matching, cursor)
    }

    async fn create_project(&self, payload: &ProjectPayload) -> StoreResult<Project> {
        self.record(StoreOp::Create, EntityKind::Workspace).await;
        let now = Utc::now();
        let project = Project {
            id: self.next_id(),
            name: payload.name.clone(),
            root_workspace_type: payload.root_workspace_type,
            created_at: Some(now),
            updated_at: Some(now),
        };
        self.projects
            .write()
            .await
            .insert(project.id.clone(), project.clone());
        Ok(project)
    }

    async fn update_project(&self, id: &str, payload: &ProjectPayload) -> StoreResult<Project> {
        self.record(StoreOp::Update, EntityKind::Workspace).await;
        let mut projects = self.projects.write().await;
        let project = projects
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        project.name = payload.name.clone();
        project.root_workspace_type = payload.root_workspace_type;
        project.updated_at = Some(Utc::now());
        Ok(project.clone())
    }

    async fn find_assortments(
        &self,
        criteria: AssortmentCriteria,
        cursor: Option<String>,
    ) -> StoreResult<Page<Assortment>> {
        self.record(StoreOp::Find, EntityKind::Assortment).await;
        let assortments = self.assortments.read().await;
        let mut matching: Vec<Assortment> = assortments
            .values()
            .filter(|a| assortment_matches(a, &criteria))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.id.cmp(&b.id));
        self.page_of(matching, cursor)
    }

    async fn create_assortment(&self, payload: &AssortmentPayload) -> StoreResult<Assortment> {
        self.record(StoreOp::Create, EntityKind::Assortment).await;
        let now = Utc::now();
        let assortment = Assortment {
            id: self.next_id(),
            name: payload.name.clone(),
            workspace_id: payload.workspace_id.clone(),
            root_workspace_id: payload.workspace_id.clone(),
            assortment_type: payload.assortment_type,
            created_at: Some(now),
            updated_at: Some(now),
        };
        self.assortments
            .write()
            .await
            .insert(assortment.id.clone(), assortment.clone());
        Ok(assortment)
    }

    async fn update_assortment(
        &self,
        id: &str,
        payload: &AssortmentPayload,
    ) -> StoreResult<Assortment> {
        self.record(StoreOp::Update, EntityKind::Assortment).await;
        let mut assortments = self.assortments.write().await;
        let assortment = assortments
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        assortment.name = payload.name.clone();
        assortment.workspace_id = payload.workspace_id.clone();
        assortment.assortment_type = payload.assortment_type;
        assortment.updated_at = Some(Utc::now());
        Ok(assortment.clone())
    }

    async fn find_items(
        &self,
        criteria: ItemCriteria,
        cursor: Option<String>,
    ) -> StoreResult<Page<Item>> {
        self.record(StoreOp::Find, EntityKind::Item).await;
        let items = self.items.read().await;
        let mut matching: Vec<Item> = items
            .values()
            .filter(|i| item_matches(i, &criteria))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.id.cmp(&b.id));
        self.page_of(matching, cursor)
    }

    async fn find_item_by_federated_id(&self, federated_id: &str) -> StoreResult<Option<Item>> {
        self.record(StoreOp::Find, EntityKind::Item).await;
        let items = self.items.read().await;
        let mut matching: Vec<&Item> = items
            .values()
            .filter(|i| i.federated_id.as_deref() == Some(federated_id))
            .collect();
        matching.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(matching.first().map(|i| (*i).clone()))
    }

    async fn create_item(&self, payload: &ItemPayload) -> StoreResult<Item> {
        self.record(StoreOp::Create, EntityKind::Item).await;
        let now = Utc::now();
        let item = Item {
            id: self.next_id(),
            name: payload.name.clone(),
            federated_id: payload.federated_id.clone(),
            item_family_id: payload.item_family_id.clone(),
            role: payload.role,
            option_group: payload.option_group,
            created_at: Some(now),
            updated_at: Some(now),
            properties: payload.properties.clone(),
        };
        self.items.write().await.insert(item.id.clone(), item.clone());
        Ok(item)
    }

    async fn update_item(&self, id: &str, payload: &ItemPayload) -> StoreResult<Item> {
        self.record(StoreOp::Update, EntityKind::Item).await;
        let mut items = self.items.write().await;
        let item = items
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        item.name = payload.name.clone();
        item.federated_id = payload.federated_id.clone();
        item.item_family_id = payload.item_family_id.clone();
        item.role = payload.role;
        item.option_group = payload.option_group;
        item.properties = payload.properties.clone();
        item.updated_at = Some(Utc::now());
        Ok(item.clone())
    }

    async fn find_project_items(
        &self,
        criteria: ProjectItemCriteria,
        cursor: Option<String>,
    ) -> StoreResult<Page<ProjectItem>> {
        self.record(StoreOp::Find, EntityKind::ProjectItem).await;
        let links = self.project_items.read().await;
        let mut matching: Vec<ProjectItem> = links
            .values()
            .filter(|l| project_item_matches(l, &criteria))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.id.cmp(&b.id));
        self.page_of(matching, cursor)
    }

    async fn create_project_item(
        &self,
        item_id: &str,
        project_id: &str,
    ) -> StoreResult<ProjectItem> {
        self.record(StoreOp::Create, EntityKind::ProjectItem).await;
        let now = Utc::now();
        let link = ProjectItem {
            id: self.next_id(),
            item_id: item_id.to_string(),
            project_id: project_id.to_string(),
            created_at: Some(now),
            updated_at: Some(now),
            properties: LinkAttributes::new(),
        };
        self.project_items
            .write()
            .await
            .insert(link.id.clone(), link.clone());
        Ok(link)
    }

    async fn update_project_item(
        &self,
        id: &str,
        attrs: &LinkAttributes,
    ) -> StoreResult<ProjectItem> {
        self.record(StoreOp::Update, EntityKind::ProjectItem).await;
        let mut links = self.project_items.write().await;
        let link = links
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        link.properties
            .extend(attrs.iter().map(|(k, v)| (k.clone(), v.clone())));
        link.updated_at = Some(Utc::now());
        Ok(link.clone())
    }

    async fn find_assortment_items(
        &self,
        criteria: AssortmentItemCriteria,
        cursor: Option<String>,
    ) -> StoreResult<Page<AssortmentItem>> {
        self.record(StoreOp::Find, EntityKind::AssortmentItem).await;
        let links = self.assortment_items.read().await;
        let mut matching: Vec<AssortmentItem> = links
            .values()
            .filter(|l| assortment_item_matches(l, &criteria))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.id.cmp(&b.id));
        self.page_of(matching, cursor)
    }

    async fn add_item_to_assortment(
        &self,
        assortment_id: &str,
        item_id: &str,
    ) -> StoreResult<AssortmentItem> {
        self.record(StoreOp::Create, EntityKind::AssortmentItem)
            .await;
        let now = Utc::now();
        let link = AssortmentItem {
            id: self.next_id(),
            assortment_id: assortment_id.to_string(),
            item_id: item_id.to_string(),
            created_at: Some(now),
            updated_at: Some(now),
            properties: LinkAttributes::new(),
        };
        self.assortment_items
            .write()
            .await
            .insert(link.id.clone(), link.clone());
        Ok(link)
    }

    async fn update_assortment_item(
        &self,
        id: &str,
        attrs: &LinkAttributes,
    ) -> StoreResult<AssortmentItem> {
        self.record(StoreOp::Update, EntityKind::AssortmentItem)
            .await;
        let mut links = self.assortment_items.write().await;
        let link = links
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        link.properties
            .extend(attrs.iter().map(|(k, v)| (k.clone(), v.clone())));
        link.updated_at = Some(Utc::now());
        Ok(link.clone())
    }
}
