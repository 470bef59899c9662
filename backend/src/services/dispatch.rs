//! Dispatch: production-to-dispatch stock draw-down
//!
//! Produced stock is the capacity; dispatch followups draw it down. A
//! fully drawn subject can be closed, after which its ledger is frozen.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use shared::{
    check_capacity, consumed_by_category, remove_record, snapshot, validate_quantity,
    validate_remarks, CapacitySet, ComponentType, FileReference, ImlType, LedgerError,
    LedgerSnapshot, RecordId, SubjectKey, TransactionRecord, WorkStatus,
};

use crate::error::{AppError, AppResult};
use crate::services::catalog::CatalogService;
use crate::store::{keys, LedgerRepository, Store};

/// Dispatch service for draw-down followups and subject closure
#[derive(Clone)]
pub struct DispatchService {
    repo: LedgerRepository,
    catalog: CatalogService,
}

/// Closure marker kept under the dispatch-status key
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosureEntry {
    pub dispatched_at: DateTime<Utc>,
}

/// Input for recording dispatched stock
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDispatchInput {
    pub order_id: String,
    pub product_id: String,
    pub category: ComponentType,
    pub quantity: Decimal,
    pub remarks: Option<String>,
    pub file: Option<FileReference>,
}

/// Derived view of one dispatch subject
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchView {
    pub order_id: String,
    pub order_number: String,
    pub company: String,
    pub product_id: String,
    pub product_name: String,
    pub iml_type: ImlType,
    pub dispatched_at: Option<DateTime<Utc>>,
    pub snapshot: LedgerSnapshot<ComponentType>,
    pub records: Vec<TransactionRecord<ComponentType>>,
}

impl DispatchService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            repo: LedgerRepository::new(store.clone()),
            catalog: CatalogService::new(store),
        }
    }

    async fn closures(&self) -> AppResult<(BTreeMap<SubjectKey, ClosureEntry>, i64)> {
        self.repo.load(keys::DISPATCH_STATUS).await
    }

    async fn ensure_open(&self, subject: &SubjectKey) -> AppResult<()> {
        let (closures, _version) = self.closures().await?;
        if closures.contains_key(subject) {
            return Err(AppError::SubjectClosed(subject.to_string()));
        }
        Ok(())
    }

    /// Produced stock per component, folded from the production ledger.
    async fn produced_capacity(
        &self,
        subject: &SubjectKey,
    ) -> AppResult<CapacitySet<ComponentType>> {
        let production = self
            .repo
            .load_stage::<ComponentType>(keys::PRODUCTION_FOLLOWUPS)
            .await?;
        Ok(CapacitySet::PerCategory(consumed_by_category(
            production.history(subject),
        )))
    }

    /// Record dispatched stock against produced capacity
    pub async fn record_dispatch(&self, input: RecordDispatchInput) -> AppResult<DispatchView> {
        validate_quantity(input.quantity).map_err(|message| AppError::Validation {
            field: "quantity".to_string(),
            message: message.to_string(),
        })?;
        if let Some(remarks) = &input.remarks {
            validate_remarks(remarks).map_err(|message| AppError::Validation {
                field: "remarks".to_string(),
                message: message.to_string(),
            })?;
        }

        self.catalog
            .get_product(&input.order_id, &input.product_id)
            .await?;

        let subject = SubjectKey::product(&input.order_id, &input.product_id);
        self.ensure_open(&subject).await?;

        let capacities = self.produced_capacity(&subject).await?;
        let mut stage = self
            .repo
            .load_stage::<ComponentType>(keys::DISPATCH_FOLLOWUPS)
            .await?;
        check_capacity(
            &capacities,
            stage.history(&subject),
            Some(input.category),
            input.quantity,
        )?;

        let mut record = TransactionRecord::with_quantity(Some(input.category), input.quantity);
        record.remarks = input.remarks;
        record.file = input.file;
        stage.history_mut(&subject).push(record);
        self.repo
            .save_stage(keys::DISPATCH_FOLLOWUPS, &stage)
            .await?;

        self.status(&input.order_id, &input.product_id).await
    }

    /// Remove one dispatch record. Closed subjects take no edits; a
    /// missing record is a warned no-op.
    pub async fn remove_dispatch(
        &self,
        order_id: &str,
        product_id: &str,
        record_id: &RecordId,
    ) -> AppResult<DispatchView> {
        let subject = SubjectKey::product(order_id, product_id);
        self.ensure_open(&subject).await?;

        let mut stage = self
            .repo
            .load_stage::<ComponentType>(keys::DISPATCH_FOLLOWUPS)
            .await?;

        match remove_record(stage.history_mut(&subject), record_id) {
            Ok(removed) => {
                self.repo
                    .save_stage(keys::DISPATCH_FOLLOWUPS, &stage)
                    .await?;
                tracing::info!(subject = %subject, record = %removed.id, "removed dispatch record");
            }
            Err(LedgerError::RecordNotFound(id)) => {
                tracing::warn!(subject = %subject, record = %id, "dispatch record not found; nothing removed");
            }
            Err(err) => return Err(err.into()),
        }

        self.status(order_id, product_id).await
    }

    /// Close a fully drawn-down subject. Terminal: the ledger rejects
    /// all further entries.
    pub async fn close_subject(&self, order_id: &str, product_id: &str) -> AppResult<DispatchView> {
        let subject = SubjectKey::product(order_id, product_id);
        self.ensure_open(&subject).await?;

        let view = self.status(order_id, product_id).await?;
        if view.snapshot.status != WorkStatus::Completed {
            return Err(AppError::Validation {
                field: "subject".to_string(),
                message: "Remaining stock must be zero before dispatch closure".to_string(),
            });
        }

        let (mut closures, version) = self.closures().await?;
        closures.insert(
            subject.clone(),
            ClosureEntry {
                dispatched_at: Utc::now(),
            },
        );
        self.repo
            .save(keys::DISPATCH_STATUS, &closures, version)
            .await?;

        tracing::info!(subject = %subject, "subject dispatched");
        self.status(order_id, product_id).await
    }

    /// Derived view of one subject
    pub async fn status(&self, order_id: &str, product_id: &str) -> AppResult<DispatchView> {
        let (order, product) = self.catalog.get_product(order_id, product_id).await?;
        let subject = SubjectKey::product(order_id, product_id);

        let capacities = self.produced_capacity(&subject).await?;
        let stage = self
            .repo
            .load_stage::<ComponentType>(keys::DISPATCH_FOLLOWUPS)
            .await?;
        let (closures, _version) = self.closures().await?;

        Ok(DispatchView {
            order_id: order.id,
            order_number: order.order_number,
            company: order.contact.company,
            product_id: product.id.clone(),
            product_name: product.product_name.clone(),
            iml_type: product.iml_type,
            dispatched_at: closures.get(&subject).map(|entry| entry.dispatched_at),
            snapshot: snapshot(&capacities, stage.history(&subject)),
            records: stage.history(&subject).to_vec(),
        })
    }

    /// All purchase products with produced stock, open subjects only.
    pub async fn list_active(&self) -> AppResult<Vec<DispatchView>> {
        let refs = self.catalog.list_purchase_products().await?;
        let production = self
            .repo
            .load_stage::<ComponentType>(keys::PRODUCTION_FOLLOWUPS)
            .await?;
        let stage = self
            .repo
            .load_stage::<ComponentType>(keys::DISPATCH_FOLLOWUPS)
            .await?;
        let (closures, _version) = self.closures().await?;

        let mut views = Vec::new();
        for item in refs {
            let subject = SubjectKey::product(&item.order_id, &item.product.id);
            if closures.contains_key(&subject) {
                continue;
            }
            let capacities =
                CapacitySet::PerCategory(consumed_by_category(production.history(&subject)));
            if capacities.is_empty() {
                continue;
            }
            views.push(DispatchView {
                order_id: item.order_id,
                order_number: item.order_number,
                company: item.contact.company,
                product_id: item.product.id.clone(),
                product_name: item.product.product_name.clone(),
                iml_type: item.product.iml_type,
                dispatched_at: None,
                snapshot: snapshot(&capacities, stage.history(&subject)),
                records: stage.history(&subject).to_vec(),
            });
        }
        Ok(views)
    }
}
