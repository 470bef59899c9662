//! Entry-time validation for ledger inputs
//!
//! All checks run before anything is written; a failed check blocks the
//! submission outright.

use rust_decimal::Decimal;

/// Maximum length accepted for free-text remarks
pub const MAX_REMARKS_LEN: usize = 500;

/// Validate a transaction quantity (label counts)
pub fn validate_quantity(quantity: Decimal) -> Result<(), &'static str> {
    if quantity <= Decimal::ZERO {
        return Err("Quantity must be positive");
    }
    Ok(())
}

/// Validate a payment amount
pub fn validate_amount(amount: Decimal) -> Result<(), &'static str> {
    if amount <= Decimal::ZERO {
        return Err("Amount must be positive");
    }
    Ok(())
}

/// Validate an order number reference
pub fn validate_order_number(order_number: &str) -> Result<(), &'static str> {
    if order_number.trim().is_empty() {
        return Err("Order number is required");
    }
    Ok(())
}

/// Validate optional free-text remarks
pub fn validate_remarks(remarks: &str) -> Result<(), &'static str> {
    if remarks.len() > MAX_REMARKS_LEN {
        return Err("Remarks are too long");
    }
    Ok(())
}
