//! Inventory verification: the produced-to-billed handoff
//!
//! The production ledger's consumed totals become this stage's capacity:
//! only labels actually produced can be verified through to billing.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use shared::{
    check_capacity, consumed_by_category, remove_record, snapshot, validate_quantity,
    validate_remarks, CapacitySet, ComponentType, FileReference, ImlType, LedgerError,
    LedgerSnapshot, RecordId, SubjectKey, TransactionRecord,
};

use crate::error::{AppError, AppResult};
use crate::services::catalog::CatalogService;
use crate::store::{keys, LedgerRepository, Store};

/// Inventory service for handoff followups
#[derive(Clone)]
pub struct InventoryService {
    repo: LedgerRepository,
    catalog: CatalogService,
}

/// Input for recording a handoff to billing
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordHandoffInput {
    pub order_id: String,
    pub product_id: String,
    pub category: ComponentType,
    pub quantity: Decimal,
    pub remarks: Option<String>,
    pub file: Option<FileReference>,
}

/// Derived view of one inventory subject
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryStatus {
    pub order_id: String,
    pub order_number: String,
    pub company: String,
    pub product_id: String,
    pub product_name: String,
    pub iml_type: ImlType,
    pub snapshot: LedgerSnapshot<ComponentType>,
    pub records: Vec<TransactionRecord<ComponentType>>,
}

impl InventoryService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            repo: LedgerRepository::new(store.clone()),
            catalog: CatalogService::new(store),
        }
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

    /// Record a verified handoff against produced stock
    pub async fn record_handoff(&self, input: RecordHandoffInput) -> AppResult<InventoryStatus> {
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

        // Ensures the subject exists in the catalog
        self.catalog
            .get_product(&input.order_id, &input.product_id)
            .await?;

        let subject = SubjectKey::product(&input.order_id, &input.product_id);
        let capacities = self.produced_capacity(&subject).await?;

        let mut stage = self
            .repo
            .load_stage::<ComponentType>(keys::INVENTORY_FOLLOWUPS)
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
            .save_stage(keys::INVENTORY_FOLLOWUPS, &stage)
            .await?;

        self.status(&input.order_id, &input.product_id).await
    }

    /// Remove one handoff record. A missing record is a warned no-op.
    pub async fn remove_handoff(
        &self,
        order_id: &str,
        product_id: &str,
        record_id: &RecordId,
    ) -> AppResult<InventoryStatus> {
        let subject = SubjectKey::product(order_id, product_id);
        let mut stage = self
            .repo
            .load_stage::<ComponentType>(keys::INVENTORY_FOLLOWUPS)
            .await?;

        match remove_record(stage.history_mut(&subject), record_id) {
            Ok(removed) => {
                self.repo
                    .save_stage(keys::INVENTORY_FOLLOWUPS, &stage)
                    .await?;
                tracing::info!(subject = %subject, record = %removed.id, "removed handoff record");
            }
            Err(LedgerError::RecordNotFound(id)) => {
                tracing::warn!(subject = %subject, record = %id, "handoff record not found; nothing removed");
            }
            Err(err) => return Err(err.into()),
        }

        self.status(order_id, product_id).await
    }

    /// Derived view of one subject
    pub async fn status(&self, order_id: &str, product_id: &str) -> AppResult<InventoryStatus> {
        let (order, product) = self.catalog.get_product(order_id, product_id).await?;
        let subject = SubjectKey::product(order_id, product_id);

        let capacities = self.produced_capacity(&subject).await?;
        let stage = self
            .repo
            .load_stage::<ComponentType>(keys::INVENTORY_FOLLOWUPS)
            .await?;

        Ok(InventoryStatus {
            order_id: order.id,
            order_number: order.order_number,
            company: order.contact.company,
            product_id: product.id.clone(),
            product_name: product.product_name.clone(),
            iml_type: product.iml_type,
            snapshot: snapshot(&capacities, stage.history(&subject)),
            records: stage.history(&subject).to_vec(),
        })
    }

    /// All purchase products with produced stock to verify.
    pub async fn list_active(&self) -> AppResult<Vec<InventoryStatus>> {
        let refs = self.catalog.list_purchase_products().await?;
        let production = self
            .repo
            .load_stage::<ComponentType>(keys::PRODUCTION_FOLLOWUPS)
            .await?;
        let stage = self
            .repo
            .load_stage::<ComponentType>(keys::INVENTORY_FOLLOWUPS)
            .await?;

        let mut views = Vec::new();
        for item in refs {
            let subject = SubjectKey::product(&item.order_id, &item.product.id);
            let capacities =
                CapacitySet::PerCategory(consumed_by_category(production.history(&subject)));
            if capacities.is_empty() {
                continue;
            }
            views.push(InventoryStatus {
                order_id: item.order_id,
                order_number: item.order_number,
                company: item.contact.company,
                product_id: item.product.id.clone(),
                product_name: item.product.product_name.clone(),
                iml_type: item.product.iml_type,
                snapshot: snapshot(&capacities, stage.history(&subject)),
                records: stage.history(&subject).to_vec(),
            });
        }
        Ok(views)
    }
}
