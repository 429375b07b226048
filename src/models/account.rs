//! Account model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AccountId, AccountKind, Money, OwnershipType};

/// An Up account (transactional or saver).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier (UUID).
    pub id: AccountId,
    /// Account attributes.
    pub attributes: AccountAttributes,
}

/// Attributes of an [`Account`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountAttributes {
    /// User-assigned display name.
    pub display_name: String,
    /// Saver or transactional.
    pub account_type: AccountKind,
    /// Individual or joint (2Up).
    pub ownership_type: OwnershipType,
    /// Current balance.
    pub balance: Money,
    /// When the account was first opened.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_account() {
        let json = r#"{
            "id": "2be1c9de-7a89-4e8f-8077-f535150b588d",
            "attributes": {
                "displayName": "Spending",
                "accountType": "TRANSACTIONAL",
                "ownershipType": "INDIVIDUAL",
                "balance": {
                    "currencyCode": "AUD",
                    "value": "102.36",
                    "valueInBaseUnits": 10236
                },
                "createdAt": "2021-09-23T01:12:00+10:00"
            }
        }"#;
        let account: Account = serde_json::from_str(json).unwrap();
        assert_eq!(account.attributes.display_name, "Spending");
        assert_eq!(account.attributes.account_type, AccountKind::Transactional);
        assert_eq!(account.attributes.balance.value_in_base_units, 10236);
    }

    #[test]
    fn deserialize_joint_saver() {
        let json = r#"{
            "id": "a7d3c9a2-0000-0000-0000-000000000001",
            "attributes": {
                "displayName": "Rainy Day",
                "accountType": "SAVER",
                "ownershipType": "JOINT",
                "balance": {
                    "currencyCode": "AUD",
                    "value": "2500.00",
                    "valueInBaseUnits": 250000
                },
                "createdAt": "2020-01-01T00:00:00Z"
            }
        }"#;
        let account: Account = serde_json::from_str(json).unwrap();
        assert_eq!(account.attributes.account_type, AccountKind::Saver);
        assert_eq!(account.attributes.ownership_type, OwnershipType::Joint);
    }

    #[test]
    fn serialize_roundtrip() {
        let account = Account {
            id: AccountId::new("a-1".to_owned()),
            attributes: AccountAttributes {
                display_name: "Spending".to_owned(),
                account_type: AccountKind::Transactional,
                ownership_type: OwnershipType::Individual,
                balance: Money {
                    currency_code: "AUD".to_owned(),
                    value: "0.00".to_owned(),
                    value_in_base_units: 0,
                },
                created_at: DateTime::UNIX_EPOCH,
            },
        };
        let json = serde_json::to_string(&account).unwrap();
        let deserialized: Account = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, account);
    }
}
