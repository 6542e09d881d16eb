//! The `EntityStore` trait and its shared configuration and error types.

use crate::criteria::{
    AssortmentCriteria, AssortmentItemCriteria, ItemCriteria, ProjectCriteria, ProjectItemCriteria,
};
use crate::entities::{
    Assortment, AssortmentItem, AssortmentPayload, Item, ItemPayload, LinkAttributes, Project,
    ProjectItem, ProjectPayload,
};
use crate::pagination::Page;
use crate::secret::SecretString;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors surfaced by store implementations.
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Authorization denied: {0}")]
    AuthorizationDenied(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Rate limited: retry after {0} seconds")]
    RateLimited(u64),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Health of a store endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StoreHealth {
    Healthy,
    Unhealthy(String),
    Unknown,
}

/// Configuration for a store endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Client name/identifier, used in logs.
    pub name: String,
    /// Base URL of the store API.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Additional headers to include on every request.
    pub headers: HashMap<String, String>,
}

impl StoreConfig {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            timeout_secs: 30,
            headers: HashMap::new(),
        }
    }
}

/// Environment variable holding the store base URL.
pub const ENV_BASE_URL: &str = "PLM_STORE_URL";
/// Environment variable holding the organization slug.
pub const ENV_ORG: &str = "PLM_STORE_ORG";
/// Environment variable holding the login email.
pub const ENV_EMAIL: &str = "PLM_STORE_EMAIL";
/// Environment variable holding the login password.
pub const ENV_PASSWORD: &str = "PLM_STORE_PASSWORD";

/// Login credentials for the store.
///
/// The password is held in a [`SecretString`] and zeroized on drop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Organization slug.
    pub org: String,
    pub email: String,
    pub password: SecretString,
}

impl Credentials {
    /// Reads credentials from `PLM_STORE_ORG`, `PLM_STORE_EMAIL`, and
    /// `PLM_STORE_PASSWORD`.
    pub fn from_env() -> StoreResult<Self> {
        Ok(Self {
            org: require_env(ENV_ORG)?,
            email: require_env(ENV_EMAIL)?,
            password: SecretString::new(require_env(ENV_PASSWORD)?),
        })
    }
}

pub(crate) fn require_env(key: &str) -> StoreResult<String> {
    std::env::var(key)
        .map_err(|_| StoreError::ConfigError(format!("missing environment variable {}", key)))
}

/// Remote entity store: `get`/`create`/`update` per entity kind, plus the
/// relation path for assortment membership.
///
/// List operations return one page per call; pass the cursor from the
/// previous page to fetch the next one, or use
/// [`collect_pages`](crate::pagination::collect_pages) to drain a listing.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Returns the store client name.
    fn name(&self) -> &str;

    /// Checks the health of the store endpoint.
    async fn health_check(&self) -> StoreResult<StoreHealth>;

    // Projects (workspaces)

    async fn find_projects(
        &self,
        criteria: ProjectCriteria,
        cursor: Option<String>,
    ) -> StoreResult<Page<Project>>;

    async fn create_project(&self, payload: &ProjectPayload) -> StoreResult<Project>;

    async fn update_project(&self, id: &str, payload: &ProjectPayload) -> StoreResult<Project>;

    // Assortments

    async fn find_assortments(
        &self,
        criteria: AssortmentCriteria,
        cursor: Option<String>,
    ) -> StoreResult<Page<Assortment>>;

    async fn create_assortment(&self, payload: &AssortmentPayload) -> StoreResult<Assortment>;

    async fn update_assortment(
        &self,
        id: &str,
        payload: &AssortmentPayload,
    ) -> StoreResult<Assortment>;

    // Items

    async fn find_items(
        &self,
        criteria: ItemCriteria,
        cursor: Option<String>,
    ) -> StoreResult<Page<Item>>;

    /// Looks an item up by its federated id.
    ///
    /// The store guarantees at most one match for a federated id.
    async fn find_item_by_federated_id(&self, federated_id: &str) -> StoreResult<Option<Item>>;

    async fn create_item(&self, payload: &ItemPayload) -> StoreResult<Item>;

    async fn update_item(&self, id: &str, payload: &ItemPayload) -> StoreResult<Item>;

    // Project items

    async fn find_project_items(
        &self,
        criteria: ProjectItemCriteria,
        cursor: Option<String>,
    ) -> StoreResult<Page<ProjectItem>>;

    async fn create_project_item(
        &self,
        item_id: &str,
        project_id: &str,
    ) -> StoreResult<ProjectItem>;

    async fn update_project_item(
        &self,
        id: &str,
        attrs: &LinkAttributes,
    ) -> StoreResult<ProjectItem>;

    // Assortment items

    async fn find_assortment_items(
        &self,
        criteria: AssortmentItemCriteria,
        cursor: Option<String>,
    ) -> StoreResult<Page<AssortmentItem>>;

    /// Adds an item to an assortment through the assortment's `items`
    /// relation, returning the resulting join record. The store has no
    /// direct create for assortment items.
    async fn add_item_to_assortment(
        &self,
        assortment_id: &str,
        item_id: &str,
    ) -> StoreResult<AssortmentItem>;

    async fn update_assortment_item(
        &self,
        id: &str,
        attrs: &LinkAttributes,
    ) -> StoreResult<AssortmentItem>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_config_defaults() {
        let config = StoreConfig::new("test", "https://store.example.com");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.headers.is_empty());
    }

    #[test]
    fn test_credentials_from_env_reports_missing_variable() {
        std::env::remove_var(ENV_ORG);
        let err = Credentials::from_env().unwrap_err();
        match err {
            StoreError::ConfigError(msg) => assert!(msg.contains(ENV_ORG)),
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }
}
