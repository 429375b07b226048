//! Tag model.

use serde::{Deserialize, Serialize};

use super::TagId;

/// A user-defined transaction tag.
///
/// Tags carry no attributes; the identifier is the label itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// The tag's label.
    pub id: TagId,
}

impl Tag {
    /// The user-visible label.
    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        self.id.as_inner()
    }
}
