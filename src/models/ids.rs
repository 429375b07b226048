//! Newtype wrappers for entity identifiers.
//!
//! These prevent accidentally mixing up IDs of different resource types
//! at compile time. All Up API identifiers are opaque strings.

use serde::{Deserialize, Serialize};

/// Macro to define a newtype ID wrapping a `String` inner type.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier from the given string.
            #[inline]
            #[must_use]
            pub const fn new(value: String) -> Self {
                Self(value)
            }

            /// Returns a reference to the inner string.
            #[inline]
            #[must_use]
            pub fn as_inner(&self) -> &str {
                &self.0
            }

            /// Consumes the wrapper and returns the inner string.
            #[inline]
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            #[inline]
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<String> for $name {
            #[inline]
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            #[inline]
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }
    };
}

define_string_id! {
    /// Unique identifier for an account (UUID string).
    AccountId
}

define_string_id! {
    /// Unique identifier for a transaction (UUID string).
    TransactionId
}

define_string_id! {
    /// Unique identifier for a spending category (slug string,
    /// e.g. `"restaurants-and-cafes"`).
    CategoryId
}

define_string_id! {
    /// Unique identifier for a tag. Tags have no attributes; the
    /// identifier is the user-visible label itself.
    TagId
}

define_string_id! {
    /// Unique identifier for a webhook (UUID string).
    WebhookId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_id_serde_roundtrip() {
        let id = AccountId::new("2be1c9de-7a89-4e8f-8077-f535150b588d".to_owned());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""2be1c9de-7a89-4e8f-8077-f535150b588d""#);
        let deserialized: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, id);
    }

    #[test]
    fn category_id_is_a_slug() {
        let id: CategoryId = serde_json::from_str(r#""takeaway""#).unwrap();
        assert_eq!(id.as_inner(), "takeaway");
    }

    #[test]
    fn tag_id_display_is_label() {
        let id = TagId::new("Holiday".to_owned());
        assert_eq!(id.to_string(), "Holiday");
    }

    #[test]
    fn id_from_inner() {
        let id: TransactionId = "tx-1".into();
        assert_eq!(id.as_inner(), "tx-1");

        let id: WebhookId = "wh-1".to_owned().into();
        assert_eq!(id.into_inner(), "wh-1");
    }

    #[test]
    fn different_id_types_are_distinct() {
        let _account = AccountId::new("x".to_owned());
        let _category = CategoryId::new("x".to_owned());
        let _tag = TagId::new("x".to_owned());
    }
}
