//! Spending category model.

use serde::{Deserialize, Serialize};

use super::{CategoryId, ToMany, ToOne};

/// A spending category in Up's fixed two-level hierarchy.
///
/// Top-level categories have no parent; child categories carry a
/// `parent` relationship back to theirs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier (slug, e.g. `"restaurants-and-cafes"`).
    pub id: CategoryId,
    /// Category attributes.
    pub attributes: CategoryAttributes,
    /// Links to related categories.
    #[serde(default)]
    pub relationships: CategoryRelationships,
}

/// Attributes of a [`Category`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryAttributes {
    /// Display name.
    pub name: String,
}

/// Related resources of a [`Category`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRelationships {
    /// Parent category, absent for top-level categories.
    #[serde(default)]
    pub parent: ToOne<CategoryId>,
    /// Child categories, empty for leaf categories.
    #[serde(default)]
    pub children: ToMany<CategoryId>,
}

impl Category {
    /// ID of the parent category, if any.
    #[inline]
    #[must_use]
    pub const fn parent_id(&self) -> Option<&CategoryId> {
        self.relationships.parent.id()
    }

    /// Returns `true` for top-level categories.
    #[inline]
    #[must_use]
    pub const fn is_top_level(&self) -> bool {
        self.parent_id().is_none()
    }
}
