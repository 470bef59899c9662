//! Transaction records: the append-only entries every ledger is a fold over

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Record identifier, unique within a subject's history.
///
/// Historical entries carried auto-increment numbers; records created by
/// this service carry UUID strings supplied at creation time, which
/// double as the idempotency key for cross-ledger de-duplication.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(u64),
    Text(String),
}

impl RecordId {
    /// Fresh id for a newly created record.
    pub fn generate() -> Self {
        RecordId::Text(Uuid::new_v4().to_string())
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl std::str::FromStr for RecordId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<u64>() {
            Ok(n) => RecordId::Number(n),
            Err(_) => RecordId::Text(s.to_string()),
        })
    }
}

impl From<u64> for RecordId {
    fn from(n: u64) -> Self {
        RecordId::Number(n)
    }
}

impl From<&str> for RecordId {
    /// Path segments and historical data both use bare numbers for
    /// numeric ids; everything else is text.
    fn from(s: &str) -> Self {
        match s.parse::<u64>() {
            Ok(n) => RecordId::Number(n),
            Err(_) => RecordId::Text(s.to_string()),
        }
    }
}

/// Opaque reference to an uploaded attachment (artwork proof, delivery
/// challan scan). Upload handling itself is outside this service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileReference {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// One immutable entry in a subject's history.
///
/// `quantity` carries label counts for production/inventory/dispatch
/// ledgers; `amount` carries rupee figures for payment ledgers. Exactly
/// one of the two is set by the constructors below. The field names and
/// number encoding match the store entries the original console wrote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "C: Deserialize<'de>"))]
pub struct TransactionRecord<C> {
    pub id: RecordId,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<C>,
    #[serde(
        default,
        with = "decimal_number_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub quantity: Option<Decimal>,
    #[serde(
        default,
        with = "decimal_number_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileReference>,
}

impl<C> TransactionRecord<C> {
    /// New quantity-bearing record (production, inventory, dispatch).
    pub fn with_quantity(category: Option<C>, quantity: Decimal) -> Self {
        Self {
            id: RecordId::generate(),
            timestamp: Utc::now(),
            category,
            quantity: Some(quantity),
            amount: None,
            remarks: None,
            file: None,
        }
    }

    /// New amount-bearing record (payments).
    pub fn with_amount(category: Option<C>, amount: Decimal) -> Self {
        Self {
            id: RecordId::generate(),
            timestamp: Utc::now(),
            category,
            quantity: None,
            amount: Some(amount),
            remarks: None,
            file: None,
        }
    }

    /// The record's contribution to a running total, whichever field
    /// carries it.
    pub fn value(&self) -> Decimal {
        self.quantity.or(self.amount).unwrap_or(Decimal::ZERO)
    }
}

/// Serialize decimals as JSON numbers. The console wrote raw numbers
/// into the store; rust_decimal's default serde writes strings.
pub(crate) mod decimal_number {
    use rust_decimal::prelude::ToPrimitive;
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.to_f64().unwrap_or(0.0))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        // Decimal's own deserializer accepts integers, floats, and strings
        <Decimal as Deserialize>::deserialize(deserializer)
    }
}

pub(crate) mod decimal_number_opt {
    use rust_decimal::prelude::ToPrimitive;
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Decimal>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.serialize_f64(v.to_f64().unwrap_or(0.0)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Decimal>, D::Error> {
        Option::<Decimal>::deserialize(deserializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ComponentType;
    use std::str::FromStr;

    #[test]
    fn test_record_id_roundtrip() {
        let numeric: RecordId = serde_json::from_str("42").unwrap();
        assert_eq!(numeric, RecordId::Number(42));

        let text: RecordId = serde_json::from_str("\"a1b2\"").unwrap();
        assert_eq!(text, RecordId::Text("a1b2".to_string()));
    }

    #[test]
    fn test_record_id_from_path_segment() {
        assert_eq!(RecordId::from_str("7").unwrap(), RecordId::Number(7));
        assert_eq!(
            RecordId::from_str("3fa85f64").unwrap(),
            RecordId::Text("3fa85f64".to_string())
        );
    }

    #[test]
    fn test_quantity_serializes_as_number() {
        let record =
            TransactionRecord::with_quantity(Some(ComponentType::Lid), Decimal::from(600));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["quantity"], serde_json::json!(600.0));
        assert_eq!(json["category"], serde_json::json!("LID"));
        assert!(json.get("amount").is_none());
    }

    #[test]
    fn test_historical_record_shape_deserializes() {
        // Shape the original console stored: numeric id, raw numbers
        let json = r#"{
            "id": 3,
            "timestamp": "2024-11-02T09:15:00Z",
            "category": "TUB",
            "quantity": 250,
            "remarks": "second run"
        }"#;
        let record: TransactionRecord<ComponentType> = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, RecordId::Number(3));
        assert_eq!(record.category, Some(ComponentType::Tub));
        assert_eq!(record.value(), Decimal::from(250));
        assert!(record.file.is_none());
    }

    #[test]
    fn test_value_prefers_whichever_field_is_set() {
        let qty = TransactionRecord::<ComponentType>::with_quantity(None, Decimal::from(10));
        assert_eq!(qty.value(), Decimal::from(10));

        let amt = TransactionRecord::<ComponentType>::with_amount(None, Decimal::from(2500));
        assert_eq!(amt.value(), Decimal::from(2500));
    }
}
