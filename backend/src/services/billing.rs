//! Bills and payment tracking
//!
//! A bill's estimated value is the capacity of its payment ledger.
//! Payment types tag records without partitioning the capacity: every
//! payment draws down the same balance due.

use std::sync::Arc;

use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared::{
    check_capacity, dedupe_by_id, generate_bill_number, remove_record, snapshot, validate_amount,
    validate_order_number, validate_remarks, Bill, CapacitySet, LedgerError, PaymentType, RecordId,
    SubjectKey, TransactionRecord, WorkStatus,
};

use crate::error::{AppError, AppResult};
use crate::store::{keys, LedgerRepository, Store};

/// Billing service for bills, payments, and order-level rollups
#[derive(Clone)]
pub struct BillingService {
    repo: LedgerRepository,
}

/// Input for raising a bill
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBillInput {
    pub order_number: String,
    pub estimated_value: Decimal,
    pub remarks: Option<String>,
}

/// Input for recording a payment against a bill
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentInput {
    pub payment_type: PaymentType,
    pub amount: Decimal,
    pub remarks: Option<String>,
}

/// Derived view of one bill and its payment ledger
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillStatus {
    pub bill: Bill,
    pub total_paid: Decimal,
    pub balance_due: Decimal,
    pub status: WorkStatus,
    pub payments: Vec<TransactionRecord<PaymentType>>,
}

/// Order-level rollup across every bill raised against one order
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRollup {
    pub order_number: String,
    pub bill_count: usize,
    pub total_billed: Decimal,
    pub total_paid: Decimal,
    pub balance_due: Decimal,
}

impl BillingService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            repo: LedgerRepository::new(store),
        }
    }

    /// Raise a bill against an order
    pub async fn create_bill(&self, input: CreateBillInput) -> AppResult<Bill> {
        validate_order_number(&input.order_number).map_err(|message| AppError::Validation {
            field: "orderNumber".to_string(),
            message: message.to_string(),
        })?;
        validate_amount(input.estimated_value).map_err(|message| AppError::Validation {
            field: "estimatedValue".to_string(),
            message: message.to_string(),
        })?;
        if let Some(remarks) = &input.remarks {
            validate_remarks(remarks).map_err(|message| AppError::Validation {
                field: "remarks".to_string(),
                message: message.to_string(),
            })?;
        }

        let (mut bills, version) = self.repo.load::<Vec<Bill>>(keys::BILLS).await?;
        let now = Utc::now();
        let bill = Bill {
            id: Uuid::new_v4(),
            bill_number: generate_bill_number(now.year(), bills.len() as u32 + 1),
            order_number: input.order_number,
            estimated_value: input.estimated_value,
            remarks: input.remarks,
            created_at: now,
        };
        bills.push(bill.clone());
        self.repo.save(keys::BILLS, &bills, version).await?;

        tracing::info!(bill = %bill.bill_number, order = %bill.order_number, "raised bill");
        Ok(bill)
    }

    /// List bills, optionally filtered to one order
    pub async fn list_bills(&self, order_number: Option<&str>) -> AppResult<Vec<Bill>> {
        let (bills, _version) = self.repo.load::<Vec<Bill>>(keys::BILLS).await?;
        Ok(match order_number {
            Some(order_number) => bills
                .into_iter()
                .filter(|bill| bill.order_number == order_number)
                .collect(),
            None => bills,
        })
    }

    /// Get a bill by id
    pub async fn get_bill(&self, bill_id: Uuid) -> AppResult<Bill> {
        self.list_bills(None)
            .await?
            .into_iter()
            .find(|bill| bill.id == bill_id)
            .ok_or_else(|| AppError::NotFound("Bill".to_string()))
    }

    /// Record a payment against a bill
    pub async fn record_payment(
        &self,
        bill_id: Uuid,
        input: RecordPaymentInput,
    ) -> AppResult<BillStatus> {
        validate_amount(input.amount).map_err(|message| AppError::Validation {
            field: "amount".to_string(),
            message: message.to_string(),
        })?;
        if let Some(remarks) = &input.remarks {
            validate_remarks(remarks).map_err(|message| AppError::Validation {
                field: "remarks".to_string(),
                message: message.to_string(),
            })?;
        }

        let bill = self.get_bill(bill_id).await?;
        let subject = SubjectKey::bill(bill_id);
        let capacities: CapacitySet<PaymentType> = CapacitySet::Undivided(bill.estimated_value);

        let mut stage = self
            .repo
            .load_stage::<PaymentType>(keys::PAYMENT_DATA)
            .await?;
        check_capacity(
            &capacities,
            stage.history(&subject),
            Some(input.payment_type),
            input.amount,
        )?;

        let mut record = TransactionRecord::with_amount(Some(input.payment_type), input.amount);
        record.remarks = input.remarks;
        stage.history_mut(&subject).push(record);
        self.repo.save_stage(keys::PAYMENT_DATA, &stage).await?;

        self.bill_status(bill_id).await
    }

    /// Remove one payment record. A missing record is a warned no-op.
    pub async fn remove_payment(
        &self,
        bill_id: Uuid,
        record_id: &RecordId,
    ) -> AppResult<BillStatus> {
        let subject = SubjectKey::bill(bill_id);
        let mut stage = self
            .repo
            .load_stage::<PaymentType>(keys::PAYMENT_DATA)
            .await?;

        match remove_record(stage.history_mut(&subject), record_id) {
            Ok(removed) => {
                self.repo.save_stage(keys::PAYMENT_DATA, &stage).await?;
                tracing::info!(bill = %bill_id, record = %removed.id, "removed payment record");
            }
            Err(LedgerError::RecordNotFound(id)) => {
                tracing::warn!(bill = %bill_id, record = %id, "payment record not found; nothing removed");
            }
            Err(err) => return Err(err.into()),
        }

        self.bill_status(bill_id).await
    }

    /// Derived view of one bill
    pub async fn bill_status(&self, bill_id: Uuid) -> AppResult<BillStatus> {
        let bill = self.get_bill(bill_id).await?;
        let subject = SubjectKey::bill(bill_id);
        let stage = self
            .repo
            .load_stage::<PaymentType>(keys::PAYMENT_DATA)
            .await?;

        let capacities: CapacitySet<PaymentType> = CapacitySet::Undivided(bill.estimated_value);
        let snap = snapshot(&capacities, stage.history(&subject));
        Ok(BillStatus {
            bill,
            total_paid: snap.aggregate.consumed,
            balance_due: snap.aggregate.remaining,
            status: snap.status,
            payments: stage.history(&subject).to_vec(),
        })
    }

    /// Totals across every bill of an order, independent of which bill's
    /// key a payment was recorded under. Echoed records are de-duplicated
    /// by id before summing.
    pub async fn order_rollup(&self, order_number: &str) -> AppResult<OrderRollup> {
        let bills = self.list_bills(Some(order_number)).await?;
        let stage = self
            .repo
            .load_stage::<PaymentType>(keys::PAYMENT_DATA)
            .await?;

        let total_billed: Decimal = bills.iter().map(|bill| bill.estimated_value).sum();

        let mut payments: Vec<TransactionRecord<PaymentType>> = Vec::new();
        for bill in &bills {
            payments.extend_from_slice(stage.history(&SubjectKey::bill(bill.id)));
        }
        let total_paid: Decimal = dedupe_by_id(payments)
            .iter()
            .map(TransactionRecord::value)
            .sum();

        Ok(OrderRollup {
            order_number: order_number.to_string(),
            bill_count: bills.len(),
            total_billed,
            total_paid,
            balance_due: (total_billed - total_paid).max(Decimal::ZERO),
        })
    }
}
