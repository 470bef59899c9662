//! The derived-quantity ledger
//!
//! Every workflow stage keeps an append-only history of transaction
//! records per subject and derives its totals by folding that history on
//! every read. Totals are never stored, so a snapshot cannot drift from
//! the audit trail it is computed from.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

use crate::models::{RecordId, TransactionRecord};

/// Errors raised by ledger operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    /// The transaction would push a category's total past its capacity
    #[error("cannot exceed available quantity of {remaining}")]
    CapacityExceeded {
        attempted: Decimal,
        remaining: Decimal,
    },

    /// No record with the given id exists in the history
    #[error("record {0} not found")]
    RecordNotFound(RecordId),
}

/// Capacity a subject's running totals must not exceed.
///
/// Categories either partition the capacity (LID labels vs. TUB labels)
/// or merely tag records against one undivided figure (payment types
/// against a bill amount).
#[derive(Debug, Clone, PartialEq)]
pub enum CapacitySet<C> {
    Undivided(Decimal),
    PerCategory(BTreeMap<C, Decimal>),
}

impl<C: Ord + Copy> CapacitySet<C> {
    pub fn per_category(entries: impl IntoIterator<Item = (C, Decimal)>) -> Self {
        CapacitySet::PerCategory(entries.into_iter().collect())
    }

    pub fn total(&self) -> Decimal {
        match self {
            CapacitySet::Undivided(capacity) => *capacity,
            CapacitySet::PerCategory(map) => map.values().copied().sum(),
        }
    }

    /// A subject with no capacity cannot accept work and is left out of
    /// active-work views.
    pub fn is_empty(&self) -> bool {
        self.total() == Decimal::ZERO
    }
}

/// Totals for one bucket of a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryTotals {
    pub capacity: Decimal,
    pub consumed: Decimal,
    pub remaining: Decimal,
}

impl CategoryTotals {
    fn new(capacity: Decimal) -> Self {
        Self {
            capacity,
            consumed: Decimal::ZERO,
            remaining: capacity,
        }
    }
}

/// Overall progress of a subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl std::fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkStatus::Pending => f.write_str("Pending"),
            WorkStatus::InProgress => f.write_str("In Progress"),
            WorkStatus::Completed => f.write_str("Completed"),
        }
    }
}

/// Derived view of a subject; recomputed from the history on every read
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSnapshot<C: Ord> {
    /// Per-category totals; empty when the capacity is undivided.
    /// Records tagged with a category the capacity does not know get a
    /// zero-capacity bucket rather than an error.
    pub categories: BTreeMap<C, CategoryTotals>,
    /// Whole-subject totals
    pub aggregate: CategoryTotals,
    pub status: WorkStatus,
    pub record_count: usize,
}

impl<C: Ord + Copy> LedgerSnapshot<C> {
    pub fn category(&self, category: C) -> Option<&CategoryTotals> {
        self.categories.get(&category)
    }

    pub fn remaining(&self, category: C) -> Decimal {
        self.categories
            .get(&category)
            .map(|totals| totals.remaining)
            .unwrap_or(Decimal::ZERO)
    }
}

/// Compute the derived snapshot: a pure fold over the history.
pub fn snapshot<C: Ord + Copy>(
    capacities: &CapacitySet<C>,
    history: &[TransactionRecord<C>],
) -> LedgerSnapshot<C> {
    let mut categories: BTreeMap<C, CategoryTotals> = BTreeMap::new();
    if let CapacitySet::PerCategory(map) = capacities {
        for (&category, &capacity) in map {
            categories.insert(category, CategoryTotals::new(capacity));
        }
    }

    let mut total_consumed = Decimal::ZERO;
    for record in history {
        let value = record.value();
        total_consumed += value;
        if matches!(capacities, CapacitySet::PerCategory(_)) {
            if let Some(category) = record.category {
                categories
                    .entry(category)
                    .or_insert_with(|| CategoryTotals::new(Decimal::ZERO))
                    .consumed += value;
            }
        }
    }

    for totals in categories.values_mut() {
        totals.remaining = (totals.capacity - totals.consumed).max(Decimal::ZERO);
    }

    let total_capacity = capacities.total();
    let aggregate = CategoryTotals {
        capacity: total_capacity,
        consumed: total_consumed,
        remaining: (total_capacity - total_consumed).max(Decimal::ZERO),
    };

    let status = if history.is_empty() {
        WorkStatus::Pending
    } else {
        let completed = match capacities {
            CapacitySet::Undivided(_) => aggregate.remaining == Decimal::ZERO,
            CapacitySet::PerCategory(_) => categories
                .values()
                .all(|totals| totals.remaining == Decimal::ZERO),
        };
        if completed {
            WorkStatus::Completed
        } else {
            WorkStatus::InProgress
        }
    };

    LedgerSnapshot {
        categories,
        aggregate,
        status,
        record_count: history.len(),
    }
}

/// Guard for an incoming transaction: the freshly folded total plus the
/// attempted value must stay within the category's capacity. Checked
/// against the fold, never a stored counter.
pub fn check_capacity<C: Ord + Copy>(
    capacities: &CapacitySet<C>,
    history: &[TransactionRecord<C>],
    category: Option<C>,
    value: Decimal,
) -> Result<(), LedgerError> {
    let snap = snapshot(capacities, history);
    let remaining = match capacities {
        CapacitySet::Undivided(_) => snap.aggregate.remaining,
        CapacitySet::PerCategory(_) => match category {
            Some(category) => snap.remaining(category),
            None => Decimal::ZERO,
        },
    };
    if value > remaining {
        return Err(LedgerError::CapacityExceeded {
            attempted: value,
            remaining,
        });
    }
    Ok(())
}

/// Remove exactly one record by id. The next fold shrinks by exactly
/// that record's value.
pub fn remove_record<C>(
    history: &mut Vec<TransactionRecord<C>>,
    id: &RecordId,
) -> Result<TransactionRecord<C>, LedgerError> {
    match history.iter().position(|record| &record.id == id) {
        Some(index) => Ok(history.remove(index)),
        None => Err(LedgerError::RecordNotFound(id.clone())),
    }
}

/// Sum each category's recorded value. Used where one stage's consumed
/// totals become the next stage's capacity (produced stock feeding the
/// dispatch ledger).
pub fn consumed_by_category<C: Ord + Copy>(
    history: &[TransactionRecord<C>],
) -> BTreeMap<C, Decimal> {
    let mut totals: BTreeMap<C, Decimal> = BTreeMap::new();
    for record in history {
        if let Some(category) = record.category {
            *totals.entry(category).or_insert(Decimal::ZERO) += record.value();
        }
    }
    totals
}

/// Drop records whose id was already seen, keeping first-occurrence
/// order. Order-level rollups use this when the same payment is echoed
/// into both an order-level and a bill-level history.
pub fn dedupe_by_id<C>(
    records: impl IntoIterator<Item = TransactionRecord<C>>,
) -> Vec<TransactionRecord<C>> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ComponentType, PaymentType};

    fn dec(n: i64) -> Decimal {
        Decimal::from(n)
    }

    fn lid_capacity(n: i64) -> CapacitySet<ComponentType> {
        CapacitySet::per_category([(ComponentType::Lid, dec(n))])
    }

    #[test]
    fn test_empty_history_is_pending() {
        let snap = snapshot(&lid_capacity(1000), &[]);
        assert_eq!(snap.status, WorkStatus::Pending);
        assert_eq!(snap.remaining(ComponentType::Lid), dec(1000));
    }

    #[test]
    fn test_label_production_run_to_completion() {
        // Capacity 1000 LID: 600 then 400, then one more is rejected
        let capacities = lid_capacity(1000);
        let mut history = vec![TransactionRecord::with_quantity(
            Some(ComponentType::Lid),
            dec(600),
        )];

        let snap = snapshot(&capacities, &history);
        assert_eq!(snap.category(ComponentType::Lid).unwrap().consumed, dec(600));
        assert_eq!(snap.remaining(ComponentType::Lid), dec(400));
        assert_eq!(snap.status, WorkStatus::InProgress);

        check_capacity(&capacities, &history, Some(ComponentType::Lid), dec(400)).unwrap();
        history.push(TransactionRecord::with_quantity(
            Some(ComponentType::Lid),
            dec(400),
        ));

        let snap = snapshot(&capacities, &history);
        assert_eq!(snap.remaining(ComponentType::Lid), Decimal::ZERO);
        assert_eq!(snap.status, WorkStatus::Completed);

        let err = check_capacity(&capacities, &history, Some(ComponentType::Lid), dec(1))
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::CapacityExceeded {
                attempted: dec(1),
                remaining: Decimal::ZERO,
            }
        );
    }

    #[test]
    fn test_completion_needs_every_category_drained() {
        let capacities = CapacitySet::per_category([
            (ComponentType::Lid, dec(500)),
            (ComponentType::Tub, dec(501)),
        ]);
        let history = vec![TransactionRecord::with_quantity(
            Some(ComponentType::Lid),
            dec(500),
        )];

        let snap = snapshot(&capacities, &history);
        assert_eq!(snap.remaining(ComponentType::Lid), Decimal::ZERO);
        assert_eq!(snap.remaining(ComponentType::Tub), dec(501));
        assert_eq!(snap.status, WorkStatus::InProgress);
    }

    #[test]
    fn test_payment_ledger_balance_due() {
        // Bill of 25,000: advance 10,000 then full 15,000
        let capacities: CapacitySet<PaymentType> = CapacitySet::Undivided(dec(25_000));
        let mut history = vec![TransactionRecord::with_amount(
            Some(PaymentType::Advance),
            dec(10_000),
        )];

        let snap = snapshot(&capacities, &history);
        assert_eq!(snap.aggregate.consumed, dec(10_000));
        assert_eq!(snap.aggregate.remaining, dec(15_000));
        assert_eq!(snap.status, WorkStatus::InProgress);

        history.push(TransactionRecord::with_amount(
            Some(PaymentType::Full),
            dec(15_000),
        ));
        let snap = snapshot(&capacities, &history);
        assert_eq!(snap.aggregate.remaining, Decimal::ZERO);
        assert_eq!(snap.status, WorkStatus::Completed);
    }

    #[test]
    fn test_remove_reverses_exactly_one_record() {
        let capacities: CapacitySet<PaymentType> = CapacitySet::Undivided(dec(25_000));
        let mut history = vec![
            TransactionRecord::with_amount(Some(PaymentType::Advance), dec(10_000)),
            TransactionRecord::with_amount(Some(PaymentType::Full), dec(15_000)),
        ];
        let before = snapshot(&capacities, &history[..1]);
        let id = history[1].id.clone();

        let removed = remove_record(&mut history, &id).unwrap();
        assert_eq!(removed.value(), dec(15_000));
        assert_eq!(snapshot(&capacities, &history), before);
        assert_eq!(snapshot(&capacities, &history).aggregate.remaining, dec(15_000));
    }

    #[test]
    fn test_remove_missing_record_is_not_found() {
        let mut history: Vec<TransactionRecord<PaymentType>> = Vec::new();
        let err = remove_record(&mut history, &RecordId::Number(9)).unwrap_err();
        assert_eq!(err, LedgerError::RecordNotFound(RecordId::Number(9)));
    }

    #[test]
    fn test_snapshot_is_pure() {
        let capacities = lid_capacity(100);
        let history = vec![TransactionRecord::with_quantity(
            Some(ComponentType::Lid),
            dec(40),
        )];
        assert_eq!(snapshot(&capacities, &history), snapshot(&capacities, &history));
    }

    #[test]
    fn test_inconsistent_history_clamps_remaining() {
        // Historical data can overshoot; remaining clamps at zero
        let capacities = lid_capacity(100);
        let history = vec![TransactionRecord::with_quantity(
            Some(ComponentType::Lid),
            dec(150),
        )];
        let snap = snapshot(&capacities, &history);
        assert_eq!(snap.remaining(ComponentType::Lid), Decimal::ZERO);
        assert_eq!(snap.aggregate.remaining, Decimal::ZERO);
    }

    #[test]
    fn test_unknown_category_gets_zero_capacity_bucket() {
        let capacities = lid_capacity(100);
        let history = vec![TransactionRecord::with_quantity(
            Some(ComponentType::Tub),
            dec(30),
        )];
        let snap = snapshot(&capacities, &history);
        let stray = snap.category(ComponentType::Tub).unwrap();
        assert_eq!(stray.capacity, Decimal::ZERO);
        assert_eq!(stray.consumed, dec(30));
        assert_eq!(stray.remaining, Decimal::ZERO);
    }

    #[test]
    fn test_zero_capacity_subject_rejects_all_work() {
        let capacities: CapacitySet<ComponentType> = CapacitySet::per_category([]);
        assert!(capacities.is_empty());
        let err = check_capacity(&capacities, &[], Some(ComponentType::Lid), dec(1)).unwrap_err();
        assert!(matches!(err, LedgerError::CapacityExceeded { .. }));
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        let mut first =
            TransactionRecord::<PaymentType>::with_amount(Some(PaymentType::Advance), dec(5000));
        first.id = RecordId::Number(1);
        let mut echo = first.clone();
        echo.remarks = Some("echoed into bill-level history".to_string());
        let mut other =
            TransactionRecord::<PaymentType>::with_amount(Some(PaymentType::Partial), dec(2000));
        other.id = RecordId::Number(2);

        let deduped = dedupe_by_id(vec![first.clone(), echo, other.clone()]);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].remarks, first.remarks);
        assert_eq!(deduped[1].id, other.id);
    }

    #[test]
    fn test_consumed_by_category() {
        let history = vec![
            TransactionRecord::with_quantity(Some(ComponentType::Lid), dec(300)),
            TransactionRecord::with_quantity(Some(ComponentType::Tub), dec(200)),
            TransactionRecord::with_quantity(Some(ComponentType::Lid), dec(100)),
        ];
        let totals = consumed_by_category(&history);
        assert_eq!(totals[&ComponentType::Lid], dec(400));
        assert_eq!(totals[&ComponentType::Tub], dec(200));
    }
}
