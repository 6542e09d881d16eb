//! # plm-client
//!
//! Typed client SDK for the PLM entity store.
//!
//! The store is a remote service backed by a managed key-value database. It
//! exposes `get`, `create`, and `update` operations per entity kind, plus a
//! relation endpoint for assortment membership. Only a fixed set of filter
//! shapes is supported per kind; those shapes are encoded as the criteria
//! enums in [`criteria`], so illegal filters cannot be expressed.

pub mod criteria;
pub mod entities;
pub mod http;
pub mod mock;
pub mod pagination;
pub mod remote;
pub mod secret;
pub mod testing;
pub mod traits;

// Re-export the trait and core types
pub use traits::{
    Credentials, EntityStore, StoreConfig, StoreError, StoreHealth, StoreResult,
};

// Entity models and payloads
pub use entities::{
    Assortment, AssortmentItem, AssortmentPayload, AssortmentType, EntityKind, Item, ItemPayload,
    ItemRole, LinkAttributes, OptionGroup, Project, ProjectItem, ProjectPayload, WorkspaceType,
};

// Filter shapes
pub use criteria::{
    AssortmentCriteria, AssortmentItemCriteria, ItemCriteria, ProjectCriteria, ProjectItemCriteria,
};

// Pagination
pub use pagination::{collect_pages, Page};

// Implementations
pub use mock::{MockEntityStore, RecordedCall, StoreOp};
pub use remote::RemoteEntityStore;
pub use secret::SecretString;
