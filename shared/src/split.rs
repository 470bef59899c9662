//! Combined-capacity splitting for "LID & TUB" products
//!
//! Label receipts sometimes carry one combined figure for a product that
//! is tracked as two independent component ledgers. The split below is
//! how every historical remaining figure was derived, so it must not
//! change.

use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::ledger::CapacitySet;
use crate::models::{ComponentType, ImlType, TransactionRecord};

/// Split one combined figure across LID and TUB: floor half to LID, the
/// remainder to TUB. Odd totals favor TUB by one.
pub fn split_combined(total: Decimal) -> (Decimal, Decimal) {
    let lid = (total / Decimal::TWO).floor();
    let tub = total - lid;
    (lid, tub)
}

/// Build a product's production capacity from its receipt history.
///
/// Receipts tagged with a component count toward that component alone;
/// untagged (combined) receipts go through `split_combined` for
/// "LID & TUB" products and straight to the single component otherwise.
/// No receipts means zero capacity: the subject cannot accept work.
pub fn capacity_from_receipts(
    iml_type: ImlType,
    receipts: &[TransactionRecord<ComponentType>],
) -> CapacitySet<ComponentType> {
    let mut map: BTreeMap<ComponentType, Decimal> = BTreeMap::new();
    for &component in iml_type.components() {
        map.insert(component, Decimal::ZERO);
    }

    for receipt in receipts {
        let value = receipt.value();
        match receipt.category {
            Some(component) => {
                *map.entry(component).or_insert(Decimal::ZERO) += value;
            }
            None => match iml_type {
                ImlType::LidAndTub => {
                    let (lid, tub) = split_combined(value);
                    *map.entry(ComponentType::Lid).or_insert(Decimal::ZERO) += lid;
                    *map.entry(ComponentType::Tub).or_insert(Decimal::ZERO) += tub;
                }
                ImlType::Lid => {
                    *map.entry(ComponentType::Lid).or_insert(Decimal::ZERO) += value;
                }
                ImlType::Tub => {
                    *map.entry(ComponentType::Tub).or_insert(Decimal::ZERO) += value;
                }
            },
        }
    }

    CapacitySet::PerCategory(map)
}
