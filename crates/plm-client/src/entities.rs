//! Entity models for the PLM store.
//!
//! All entities carry opaque server-assigned string ids and camelCase wire
//! names. Items and the two join kinds accept arbitrary extra properties,
//! which are kept in a flattened map.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Arbitrary extra properties carried by items and join records.
pub type LinkAttributes = HashMap<String, serde_json::Value>;

/// The entity kinds exposed by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    /// Workspace container, specialized here as "project".
    Workspace,
    Assortment,
    Item,
    ProjectItem,
    AssortmentItem,
}

impl EntityKind {
    /// Returns the wire name of the kind, as used in request paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Workspace => "workspace",
            EntityKind::Assortment => "assortment",
            EntityKind::Item => "item",
            EntityKind::ProjectItem => "project-item",
            EntityKind::AssortmentItem => "assortment-item",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Root type tag of a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkspaceType {
    Project,
    Library,
}

/// Type tag of an assortment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssortmentType {
    /// Assortment maintained by an integration, not hand-curated.
    Integration,
    Standard,
}

/// Role of an item within its family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemRole {
    Option,
    Variant,
}

impl ItemRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemRole::Option => "option",
            ItemRole::Variant => "variant",
        }
    }
}

/// Option group of an option-role item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionGroup {
    Color,
    Size,
}

impl OptionGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionGroup::Color => "color",
            OptionGroup::Size => "size",
        }
    }
}

/// A project: the store's workspace container with a PROJECT root type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub root_workspace_type: WorkspaceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for creating or updating a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPayload {
    pub name: String,
    pub root_workspace_type: WorkspaceType,
}

impl ProjectPayload {
    /// Payload for a season project (root type PROJECT).
    pub fn project(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root_workspace_type: WorkspaceType::Project,
        }
    }
}

/// An assortment belonging to a project workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assortment {
    pub id: String,
    pub name: String,
    /// Direct parent workspace.
    pub workspace_id: String,
    /// Root workspace of the hierarchy the assortment lives in.
    pub root_workspace_id: String,
    pub assortment_type: AssortmentType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload for creating or updating an assortment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssortmentPayload {
    pub name: String,
    pub workspace_id: String,
    pub assortment_type: AssortmentType,
}

/// An item, optionally carrying family/role/option-group attributes for
/// variant modeling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub name: String,
    /// The external system's identifier; the natural key for upserts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub federated_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_family_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<ItemRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_group: Option<OptionGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub properties: LinkAttributes,
}

/// Payload for creating or updating an item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPayload {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub federated_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_family_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<ItemRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_group: Option<OptionGroup>,
    #[serde(flatten)]
    pub properties: LinkAttributes,
}

/// Join record linking an item into a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectItem {
    pub id: String,
    pub item_id: String,
    pub project_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub properties: LinkAttributes,
}

/// Join record linking an item into an assortment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssortmentItem {
    pub id: String,
    pub assortment_id: String,
    pub item_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub properties: LinkAttributes,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_kind_wire_names() {
        assert_eq!(EntityKind::Workspace.as_str(), "workspace");
        assert_eq!(EntityKind::ProjectItem.as_str(), "project-item");
        assert_eq!(EntityKind::AssortmentItem.to_string(), "assortment-item");
    }

    #[test]
    fn test_item_serializes_camel_case_with_flattened_properties() {
        let mut properties = LinkAttributes::new();
        properties.insert("seasonCode".to_string(), serde_json::json!("SS26"));

        let payload = ItemPayload {
            name: "Crew Tee".to_string(),
            federated_id: Some("erp:123".to_string()),
            item_family_id: Some("fam-1".to_string()),
            role: Some(ItemRole::Option),
            option_group: Some(OptionGroup::Color),
            properties,
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["federatedId"], "erp:123");
        assert_eq!(value["itemFamilyId"], "fam-1");
        assert_eq!(value["role"], "option");
        assert_eq!(value["optionGroup"], "color");
        assert_eq!(value["seasonCode"], "SS26");
    }

    #[test]
    fn test_workspace_type_wire_value() {
        let payload = ProjectPayload::project("SS26");
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["rootWorkspaceType"], "PROJECT");
    }
}
