//! Common types used across the platform

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Key identifying a ledger subject within a store entry.
///
/// Production, inventory, and dispatch ledgers track one `(order,
/// product)` pair per subject; payment ledgers track one bill. The
/// string form (`"{orderId}_{productId}"`) is the map key used inside
/// store entries and is kept as-is for compatibility with historical
/// data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectKey(String);

impl SubjectKey {
    /// Subject for a product line item on an order.
    pub fn product(order_id: &str, product_id: &str) -> Self {
        Self(format!("{}_{}", order_id, product_id))
    }

    /// Subject for a bill's payment ledger.
    pub fn bill(bill_id: Uuid) -> Self {
        Self(bill_id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubjectKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SubjectKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_key_format() {
        let key = SubjectKey::product("17", "3");
        assert_eq!(key.as_str(), "17_3");
    }

    #[test]
    fn test_bill_key_is_bill_id() {
        let id = Uuid::new_v4();
        assert_eq!(SubjectKey::bill(id).as_str(), id.to_string());
    }
}
