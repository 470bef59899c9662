//! Ledger property tests
//!
//! Covers the core invariants of the derived-quantity ledger:
//! - capacity is never exceeded by accepted transactions
//! - remaining is never negative
//! - snapshots are a pure fold over history
//! - removal exactly reverses a record
//! - combined-capacity splitting is deterministic
//! - status derivation follows the Pending/In Progress/Completed rule

use proptest::prelude::*;
use rust_decimal::Decimal;

use shared::{
    check_capacity, dedupe_by_id, remove_record, snapshot, split_combined, CapacitySet,
    ComponentType, PaymentType, RecordId, TransactionRecord, WorkStatus,
};

fn dec(n: i64) -> Decimal {
    Decimal::from(n)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// A full production run: 600 + 400 against capacity 1000
    #[test]
    fn test_run_to_completion_and_reject_overflow() {
        let capacities = CapacitySet::per_category([(ComponentType::Lid, dec(1000))]);
        let mut history = Vec::new();

        for quantity in [600, 400] {
            check_capacity(&capacities, &history, Some(ComponentType::Lid), dec(quantity))
                .unwrap();
            history.push(TransactionRecord::with_quantity(
                Some(ComponentType::Lid),
                dec(quantity),
            ));
        }

        let snap = snapshot(&capacities, &history);
        assert_eq!(snap.aggregate.consumed, dec(1000));
        assert_eq!(snap.aggregate.remaining, Decimal::ZERO);
        assert_eq!(snap.status, WorkStatus::Completed);

        assert!(check_capacity(&capacities, &history, Some(ComponentType::Lid), dec(1)).is_err());
    }

    /// Example split from the original data: 1001 -> 500 LID, 501 TUB
    #[test]
    fn test_odd_combined_split() {
        assert_eq!(split_combined(dec(1001)), (dec(500), dec(501)));
    }

    /// Payment ledger example: 25,000 bill, advance + full payment
    #[test]
    fn test_payment_ledger_example() {
        let capacities: CapacitySet<PaymentType> = CapacitySet::Undivided(dec(25_000));
        let history = vec![
            TransactionRecord::with_amount(Some(PaymentType::Advance), dec(10_000)),
            TransactionRecord::with_amount(Some(PaymentType::Full), dec(15_000)),
        ];
        let snap = snapshot(&capacities, &history);
        assert_eq!(snap.aggregate.consumed, dec(25_000));
        assert_eq!(snap.aggregate.remaining, Decimal::ZERO);
        assert_eq!(snap.status, WorkStatus::Completed);
    }

    #[test]
    fn test_status_pending_only_without_records() {
        let capacities = CapacitySet::per_category([(ComponentType::Lid, dec(10))]);
        assert_eq!(snapshot(&capacities, &[]).status, WorkStatus::Pending);

        let history = vec![TransactionRecord::with_quantity(
            Some(ComponentType::Lid),
            dec(1),
        )];
        assert_eq!(snapshot(&capacities, &history).status, WorkStatus::InProgress);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for generating positive quantities
    fn quantity_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=10_000i64).prop_map(Decimal::from)
    }

    /// Strategy for generating capacities
    fn capacity_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=50_000i64).prop_map(Decimal::from)
    }

    /// Strategy for generating component categories
    fn category_strategy() -> impl Strategy<Value = ComponentType> {
        prop_oneof![Just(ComponentType::Lid), Just(ComponentType::Tub)]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// P1: accepted transactions never push consumed past capacity
        #[test]
        fn prop_capacity_invariant_holds(
            capacity in capacity_strategy(),
            attempts in prop::collection::vec((category_strategy(), quantity_strategy()), 1..30)
        ) {
            let capacities = CapacitySet::per_category([
                (ComponentType::Lid, capacity),
                (ComponentType::Tub, capacity),
            ]);
            let mut history = Vec::new();

            for (category, quantity) in attempts {
                if check_capacity(&capacities, &history, Some(category), quantity).is_ok() {
                    history.push(TransactionRecord::with_quantity(Some(category), quantity));
                }
            }

            let snap = snapshot(&capacities, &history);
            for totals in snap.categories.values() {
                prop_assert!(totals.consumed <= totals.capacity);
            }
        }

        /// P2: remaining = max(capacity - consumed, 0), never negative
        #[test]
        fn prop_remaining_never_negative(
            capacity in capacity_strategy(),
            quantities in prop::collection::vec(quantity_strategy(), 0..30)
        ) {
            let capacities = CapacitySet::per_category([(ComponentType::Lid, capacity)]);
            let history: Vec<_> = quantities
                .iter()
                .map(|&quantity| TransactionRecord::with_quantity(Some(ComponentType::Lid), quantity))
                .collect();

            let snap = snapshot(&capacities, &history);
            let totals = snap.categories[&ComponentType::Lid];
            prop_assert!(totals.remaining >= Decimal::ZERO);
            prop_assert_eq!(totals.remaining, (totals.capacity - totals.consumed).max(Decimal::ZERO));
            prop_assert!(snap.aggregate.remaining >= Decimal::ZERO);
        }

        /// P3: snapshot is a pure fold; repeated calls agree
        #[test]
        fn prop_snapshot_is_pure(
            capacity in capacity_strategy(),
            quantities in prop::collection::vec((category_strategy(), quantity_strategy()), 0..30)
        ) {
            let capacities = CapacitySet::per_category([
                (ComponentType::Lid, capacity),
                (ComponentType::Tub, capacity),
            ]);
            let history: Vec<_> = quantities
                .into_iter()
                .map(|(category, quantity)| TransactionRecord::with_quantity(Some(category), quantity))
                .collect();

            prop_assert_eq!(
                snapshot(&capacities, &history),
                snapshot(&capacities, &history)
            );
        }

        /// P4: append then remove returns the prior snapshot exactly
        #[test]
        fn prop_remove_reverses_record(
            capacity in capacity_strategy(),
            quantities in prop::collection::vec(quantity_strategy(), 1..20),
            extra in quantity_strategy()
        ) {
            let capacities = CapacitySet::per_category([(ComponentType::Lid, capacity)]);
            let mut history: Vec<_> = quantities
                .iter()
                .map(|&quantity| TransactionRecord::with_quantity(Some(ComponentType::Lid), quantity))
                .collect();

            let before = snapshot(&capacities, &history);

            let record = TransactionRecord::with_quantity(Some(ComponentType::Lid), extra);
            let id = record.id.clone();
            history.push(record);
            remove_record(&mut history, &id).unwrap();

            prop_assert_eq!(snapshot(&capacities, &history), before);
        }

        /// P5: split is deterministic: lid = floor(C/2), tub = C - lid
        #[test]
        fn prop_split_determinism(total in 0i64..=1_000_000i64) {
            let total = Decimal::from(total);
            let (lid, tub) = split_combined(total);
            prop_assert_eq!((lid, tub), split_combined(total));
            prop_assert_eq!(lid, (total / Decimal::TWO).floor());
            prop_assert_eq!(lid + tub, total);
        }

        /// P6: Completed iff every remaining is zero; Pending iff empty
        #[test]
        fn prop_status_derivation(
            lid_capacity in capacity_strategy(),
            tub_capacity in capacity_strategy(),
            quantities in prop::collection::vec((category_strategy(), quantity_strategy()), 0..30)
        ) {
            let capacities = CapacitySet::per_category([
                (ComponentType::Lid, lid_capacity),
                (ComponentType::Tub, tub_capacity),
            ]);
            let history: Vec<_> = quantities
                .into_iter()
                .map(|(category, quantity)| TransactionRecord::with_quantity(Some(category), quantity))
                .collect();

            let snap = snapshot(&capacities, &history);
            if history.is_empty() {
                prop_assert_eq!(snap.status, WorkStatus::Pending);
            } else if snap.categories.values().all(|totals| totals.remaining == Decimal::ZERO) {
                prop_assert_eq!(snap.status, WorkStatus::Completed);
            } else {
                prop_assert_eq!(snap.status, WorkStatus::InProgress);
            }
        }

        /// De-duplication is idempotent and never drops distinct ids
        #[test]
        fn prop_dedupe_by_id(count in 1usize..20, duplicates in 0usize..5) {
            let mut records: Vec<TransactionRecord<PaymentType>> = (0..count)
                .map(|n| {
                    let mut record = TransactionRecord::with_amount(
                        Some(PaymentType::Partial),
                        Decimal::from(100 + n as i64),
                    );
                    record.id = RecordId::Number(n as u64);
                    record
                })
                .collect();
            for n in 0..duplicates.min(count) {
                records.push(records[n].clone());
            }

            let deduped = dedupe_by_id(records);
            prop_assert_eq!(deduped.len(), count);
        }
    }
}
