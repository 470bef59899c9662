//! WebAssembly module for the IML Operations Tracking Platform
//!
//! Provides client-side computation for the browser console:
//! - combined-quantity splitting
//! - balance-due figures
//! - snapshot and status derivation from a subject's history

use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

use shared::models::{ComponentType, TransactionRecord};
use shared::{snapshot, split_combined, CapacitySet};

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// LID share of a combined received quantity
#[wasm_bindgen]
pub fn split_lid_quantity(total: f64) -> f64 {
    let total = Decimal::try_from(total).unwrap_or(Decimal::ZERO);
    let (lid, _tub) = split_combined(total);
    lid.to_string().parse().unwrap_or(0.0)
}

/// TUB share of a combined received quantity
#[wasm_bindgen]
pub fn split_tub_quantity(total: f64) -> f64 {
    let total = Decimal::try_from(total).unwrap_or(Decimal::ZERO);
    let (_lid, tub) = split_combined(total);
    tub.to_string().parse().unwrap_or(0.0)
}

/// Balance still due on a bill, clamped at zero
#[wasm_bindgen]
pub fn balance_due(bill_amount: f64, total_paid: f64) -> f64 {
    if total_paid >= bill_amount {
        return 0.0;
    }
    bill_amount - total_paid
}

/// Compute a subject's snapshot from per-category capacities and its
/// history, both as JSON. Returns the snapshot as JSON.
#[wasm_bindgen]
pub fn compute_snapshot(capacities_json: &str, records_json: &str) -> Result<String, JsValue> {
    let capacities: std::collections::BTreeMap<ComponentType, Decimal> =
        serde_json::from_str(capacities_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid capacities JSON: {}", e)))?;
    let records: Vec<TransactionRecord<ComponentType>> = serde_json::from_str(records_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid records JSON: {}", e)))?;

    let snap = snapshot(&CapacitySet::PerCategory(capacities), &records);
    serde_json::to_string(&snap)
        .map_err(|e| JsValue::from_str(&format!("Serializing snapshot: {}", e)))
}

/// Derive a subject's status ("Pending" / "In Progress" / "Completed")
#[wasm_bindgen]
pub fn derive_status(capacities_json: &str, records_json: &str) -> Result<String, JsValue> {
    let capacities: std::collections::BTreeMap<ComponentType, Decimal> =
        serde_json::from_str(capacities_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid capacities JSON: {}", e)))?;
    let records: Vec<TransactionRecord<ComponentType>> = serde_json::from_str(records_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid records JSON: {}", e)))?;

    let snap = snapshot(&CapacitySet::PerCategory(capacities), &records);
    Ok(format!("{}", snap.status))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_quantities() {
        assert_eq!(split_lid_quantity(1001.0), 500.0);
        assert_eq!(split_tub_quantity(1001.0), 501.0);
        assert_eq!(split_lid_quantity(1000.0), 500.0);
    }

    #[test]
    fn test_balance_due() {
        assert!((balance_due(25000.0, 10000.0) - 15000.0).abs() < 0.001);
        assert_eq!(balance_due(25000.0, 25000.0), 0.0);
        assert_eq!(balance_due(25000.0, 30000.0), 0.0);
    }

    #[test]
    fn test_derive_status() {
        let capacities = r#"{"LID": 1000}"#;
        assert_eq!(derive_status(capacities, "[]").unwrap(), "Pending");

        let partial = r#"[{"id": 1, "timestamp": "2026-01-05T08:00:00Z", "category": "LID", "quantity": 600}]"#;
        assert_eq!(derive_status(capacities, partial).unwrap(), "In Progress");

        let full = r#"[
            {"id": 1, "timestamp": "2026-01-05T08:00:00Z", "category": "LID", "quantity": 600},
            {"id": 2, "timestamp": "2026-01-06T08:00:00Z", "category": "LID", "quantity": 400}
        ]"#;
        assert_eq!(derive_status(capacities, full).unwrap(), "Completed");
    }

    #[test]
    fn test_compute_snapshot() {
        let capacities = r#"{"LID": 500, "TUB": 501}"#;
        let records = r#"[{"id": 1, "timestamp": "2026-01-05T08:00:00Z", "category": "LID", "quantity": 500}]"#;
        let snap: serde_json::Value =
            serde_json::from_str(&compute_snapshot(capacities, records).unwrap()).unwrap();
        assert_eq!(snap["status"], serde_json::json!("In Progress"));
        assert_eq!(snap["categories"]["LID"]["remaining"], serde_json::json!("0"));
    }
}
