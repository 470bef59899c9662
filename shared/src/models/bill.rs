//! Billing models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::transaction::decimal_number;

/// A bill raised against an order.
///
/// The estimated value is the capacity of the bill's payment ledger:
/// accepted payments may never sum past it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: Uuid,
    /// Human-facing number (e.g., "BILL-2026-0007")
    pub bill_number: String,
    pub order_number: String,
    #[serde(with = "decimal_number")]
    pub estimated_value: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Kind of payment against a bill.
///
/// A tag on the record, not a partition of the bill amount: every
/// payment draws down the same undivided balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    Advance,
    Partial,
    Full,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentType::Advance => "advance",
            PaymentType::Partial => "partial",
            PaymentType::Full => "full",
        }
    }
}

impl std::fmt::Display for PaymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generate a bill number
pub fn generate_bill_number(year: i32, sequence: u32) -> String {
    format!("BILL-{}-{:04}", year, sequence)
}
