//! Monetary amount model.

use serde::{Deserialize, Serialize};

/// A monetary amount in a specific currency.
///
/// The API provides both a formatted decimal string and an integer
/// amount in the currency's base units (cents for AUD). Sign conveys
/// direction: negative amounts are charges, positive amounts credits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    /// ISO 4217 currency code.
    pub currency_code: String,
    /// Signed decimal amount, e.g. `"-12.50"`.
    pub value: String,
    /// Signed amount in the currency's smallest denomination.
    pub value_in_base_units: i64,
}

impl Money {
    /// Returns `true` if the amount is negative (money leaving the
    /// account).
    #[inline]
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.value_in_base_units < 0
    }
}

impl core::fmt::Display for Money {
    #[inline]
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} {}", self.value, self.currency_code)
    }
}
