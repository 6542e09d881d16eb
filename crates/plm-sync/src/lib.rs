//! # plm-sync
//!
//! Integration operations against the PLM entity store: idempotent upserts
//! keyed on federated ids, and find-or-create helpers for projects,
//! assortments, and the join records that place items in them.
//!
//! Every operation is a plain sequence of store calls with no retries and no
//! concurrency coordination. Find-then-create is not atomic; concurrent runs
//! against the same logical key can race and create duplicate records.

pub mod assortment_items;
pub mod assortments;
pub mod error;
pub mod items;
pub mod project_items;
pub mod projects;
pub mod provision;

pub use assortment_items::{ensure_item_in_assortment, upsert_assortment_item};
pub use assortments::ensure_assortment_for_project;
pub use error::{SyncError, SyncResult};
pub use items::upsert_item;
pub use project_items::{ensure_item_in_project, upsert_project_item};
pub use projects::ensure_project_for_season;
pub use provision::provision_assortment_item;
