//! Settings and credential store.
//!
//! A narrow typed interface over the locally stored personal access
//! token and display preferences. Components receive a store at
//! construction instead of reading ambient global state, and react to
//! external changes through an explicit subscription mechanism.

#[cfg(feature = "settings-file")]
mod file;
mod memory;

#[cfg(feature = "settings-file")]
pub use file::FileSettings;
pub use memory::InMemorySettings;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::filter::FilterState;
use crate::models::CategoryId;

/// How timestamps are rendered in transaction lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DateStyle {
    /// Calendar dates, e.g. `16 Jan 2024`.
    #[default]
    Absolute,
    /// Relative phrasing, e.g. `3 days ago`.
    Relative,
}

/// Last-used transaction filters, restored at screen construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedFilters {
    /// Last category filter, if any.
    pub category: Option<CategoryId>,
    /// Whether held transactions were hidden.
    pub settled_only: bool,
}

impl SavedFilters {
    /// Reconstructs the equivalent [`FilterState`].
    #[inline]
    #[must_use]
    pub fn to_filter_state(&self) -> FilterState {
        let mut filter = FilterState::new().settled_only(self.settled_only);
        if let Some(category) = &self.category {
            filter = filter.category(category.clone());
        }
        filter
    }
}

/// Which stored value a change notification refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsChange {
    /// The access token was replaced or cleared.
    Token,
    /// The date rendering preference changed.
    DateStyle,
    /// The saved filters changed.
    SavedFilters,
}

/// Callback invoked after a settings value is successfully written.
pub type ChangeListener = Box<dyn Fn(SettingsChange) + Send + Sync>;

/// Typed store for the access token and display preferences.
///
/// All methods take `&self`; implementations use interior mutability
/// for thread-safe access. Writes notify subscribed listeners after the
/// new value is durable.
pub trait SettingsStore: core::fmt::Debug + Send + Sync {
    /// Returns the stored access token, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to read.
    fn token(&self) -> Result<Option<SecretString>>;

    /// Stores or clears the access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to write.
    fn set_token(&self, token: Option<SecretString>) -> Result<()>;

    /// Returns the date rendering preference.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to read.
    fn date_style(&self) -> Result<DateStyle>;

    /// Stores the date rendering preference.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to write.
    fn set_date_style(&self, style: DateStyle) -> Result<()>;

    /// Returns the last-used transaction filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to read.
    fn saved_filters(&self) -> Result<SavedFilters>;

    /// Stores the last-used transaction filters.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to write.
    fn set_saved_filters(&self, filters: SavedFilters) -> Result<()>;

    /// Registers a listener invoked after every successful write.
    fn subscribe(&self, listener: ChangeListener);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saved_filters_reconstruct_filter_state() {
        let saved = SavedFilters {
            category: Some(CategoryId::new("takeaway".to_owned())),
            settled_only: true,
        };
        let filter = saved.to_filter_state();
        assert_eq!(
            filter.category,
            Some(CategoryId::new("takeaway".to_owned()))
        );
        assert!(filter.settled_only);
        assert!(!filter.is_identity());
    }

    #[test]
    fn default_saved_filters_are_identity() {
        let filter = SavedFilters::default().to_filter_state();
        assert!(filter.is_identity());
    }

    #[test]
    fn date_style_serde_roundtrip() {
        let json = serde_json::to_string(&DateStyle::Relative).unwrap();
        assert_eq!(json, r#""relative""#);
        let deserialized: DateStyle = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, DateStyle::Relative);
        assert_eq!(DateStyle::default(), DateStyle::Absolute);
    }
}
