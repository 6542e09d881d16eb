//! Filter shapes supported by the store, per entity kind.
//!
//! The backing key-value database serves only pre-indexed access patterns;
//! ad-hoc predicates are not supported. Each enum below enumerates the legal
//! shapes for one kind, so an unsupported filter cannot be constructed.
//! Anything richer has to be emulated by fetching a broader result set and
//! filtering client-side.
//!
//! Note the absence of an unfiltered variant on [`AssortmentItemCriteria`]:
//! the store cannot scan assortment items.

use crate::entities::OptionGroup;

/// Query pairs sent to the store for a filter shape.
pub type QueryPairs = Vec<(&'static str, String)>;

/// Filter shapes for projects (workspaces).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectCriteria {
    All,
    ById(String),
}

impl ProjectCriteria {
    pub fn query_pairs(&self) -> QueryPairs {
        match self {
            ProjectCriteria::All => vec![],
            ProjectCriteria::ById(id) => vec![("id", id.clone())],
        }
    }
}

/// Filter shapes for assortments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssortmentCriteria {
    All,
    ById(String),
    /// All assortments under a root workspace (project).
    ByRootWorkspace(String),
}

impl AssortmentCriteria {
    pub fn query_pairs(&self) -> QueryPairs {
        match self {
            AssortmentCriteria::All => vec![],
            AssortmentCriteria::ById(id) => vec![("id", id.clone())],
            AssortmentCriteria::ByRootWorkspace(root_workspace_id) => {
                vec![("rootWorkspaceId", root_workspace_id.clone())]
            }
        }
    }
}

/// Filter shapes for items.
///
/// Lookup by federated id is a dedicated access path and not part of this
/// enum; see [`EntityStore::find_item_by_federated_id`].
///
/// [`EntityStore::find_item_by_federated_id`]: crate::traits::EntityStore::find_item_by_federated_id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemCriteria {
    All,
    ById(String),
    /// Every item in a family, regardless of role.
    ByFamily { family_id: String },
    /// Variant-role items of a family.
    VariantsInFamily { family_id: String },
    /// Option-role items of a family, within one option group.
    OptionsInFamily {
        family_id: String,
        option_group: OptionGroup,
    },
}

impl ItemCriteria {
    pub fn query_pairs(&self) -> QueryPairs {
        match self {
            ItemCriteria::All => vec![],
            ItemCriteria::ById(id) => vec![("id", id.clone())],
            ItemCriteria::ByFamily { family_id } => vec![("itemFamilyId", family_id.clone())],
            ItemCriteria::VariantsInFamily { family_id } => vec![
                ("itemFamilyId", family_id.clone()),
                ("role", "variant".to_string()),
            ],
            ItemCriteria::OptionsInFamily {
                family_id,
                option_group,
            } => vec![
                ("itemFamilyId", family_id.clone()),
                ("role", "option".to_string()),
                ("optionGroup", option_group.as_str().to_string()),
            ],
        }
    }
}

/// Filter shapes for project-item links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectItemCriteria {
    All,
    ById(String),
    ByItem(String),
    ByProject(String),
    ByProjectAndItem { project_id: String, item_id: String },
}

impl ProjectItemCriteria {
    pub fn query_pairs(&self) -> QueryPairs {
        match self {
            ProjectItemCriteria::All => vec![],
            ProjectItemCriteria::ById(id) => vec![("id", id.clone())],
            ProjectItemCriteria::ByItem(item_id) => vec![("itemId", item_id.clone())],
            ProjectItemCriteria::ByProject(project_id) => {
                vec![("projectId", project_id.clone())]
            }
            ProjectItemCriteria::ByProjectAndItem {
                project_id,
                item_id,
            } => vec![
                ("projectId", project_id.clone()),
                ("itemId", item_id.clone()),
            ],
        }
    }
}

/// Filter shapes for assortment-item links. No unfiltered scan exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssortmentItemCriteria {
    ById(String),
    ByAssortment(String),
    ByItem(String),
    ByAssortmentAndItem {
        assortment_id: String,
        item_id: String,
    },
}

impl AssortmentItemCriteria {
    pub fn query_pairs(&self) -> QueryPairs {
        match self {
            AssortmentItemCriteria::ById(id) => vec![("id", id.clone())],
            AssortmentItemCriteria::ByAssortment(assortment_id) => {
                vec![("assortmentId", assortment_id.clone())]
            }
            AssortmentItemCriteria::ByItem(item_id) => vec![("itemId", item_id.clone())],
            AssortmentItemCriteria::ByAssortmentAndItem {
                assortment_id,
                item_id,
            } => vec![
                ("assortmentId", assortment_id.clone()),
                ("itemId", item_id.clone()),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_criteria_query_pairs() {
        assert!(ProjectCriteria::All.query_pairs().is_empty());
        assert_eq!(
            ProjectCriteria::ById("w-1".to_string()).query_pairs(),
            vec![("id", "w-1".to_string())]
        );
    }

    #[test]
    fn test_item_option_criteria_lowers_role_and_group() {
        let criteria = ItemCriteria::OptionsInFamily {
            family_id: "fam-9".to_string(),
            option_group: OptionGroup::Size,
        };
        assert_eq!(
            criteria.query_pairs(),
            vec![
                ("itemFamilyId", "fam-9".to_string()),
                ("role", "option".to_string()),
                ("optionGroup", "size".to_string()),
            ]
        );
    }

    #[test]
    fn test_join_criteria_carry_both_ids() {
        let criteria = AssortmentItemCriteria::ByAssortmentAndItem {
            assortment_id: "a-1".to_string(),
            item_id: "i-1".to_string(),
        };
        assert_eq!(
            criteria.query_pairs(),
            vec![
                ("assortmentId", "a-1".to_string()),
                ("itemId", "i-1".to_string()),
            ]
        );
    }
}
