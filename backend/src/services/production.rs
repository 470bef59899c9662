//! Label receipt and production tracking
//!
//! Receipts of printed labels establish a product's production capacity;
//! production followups draw that capacity down per component. Both live
//! in their own store entries and every figure shown is folded from them
//! on read.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use shared::{
    capacity_from_receipts, check_capacity, remove_record, snapshot, validate_quantity,
    validate_remarks, ComponentType, FileReference, ImlType, LedgerError, LedgerSnapshot, Product,
    RecordId, SubjectKey, TransactionRecord,
};

use crate::error::{AppError, AppResult};
use crate::services::catalog::CatalogService;
use crate::store::{keys, LedgerRepository, Store};

/// Production service for receipts and followups
#[derive(Clone)]
pub struct ProductionService {
    repo: LedgerRepository,
    catalog: CatalogService,
}

/// Input for recording a label receipt
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordReceiptInput {
    pub order_id: String,
    pub product_id: String,
    /// None records a combined figure, split at read time for
    /// "LID & TUB" products
    pub category: Option<ComponentType>,
    pub quantity: Decimal,
    pub remarks: Option<String>,
    pub file: Option<FileReference>,
}

/// Input for recording produced labels
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordProductionInput {
    pub order_id: String,
    pub product_id: String,
    pub category: ComponentType,
    pub quantity: Decimal,
    pub remarks: Option<String>,
    pub file: Option<FileReference>,
}

/// Derived view of one production subject
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionStatus {
    pub order_id: String,
    pub order_number: String,
    pub company: String,
    pub product_id: String,
    pub product_name: String,
    pub iml_type: ImlType,
    pub snapshot: LedgerSnapshot<ComponentType>,
    pub receipts: Vec<TransactionRecord<ComponentType>>,
    pub records: Vec<TransactionRecord<ComponentType>>,
}

impl ProductionService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            repo: LedgerRepository::new(store.clone()),
            catalog: CatalogService::new(store),
        }
    }

    /// Record a label receipt against a product
    pub async fn record_receipt(
        &self,
        input: RecordReceiptInput,
    ) -> AppResult<TransactionRecord<ComponentType>> {
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

        let (_, product) = self
            .catalog
            .get_product(&input.order_id, &input.product_id)
            .await?;
        check_category(&product, input.category)?;

        let subject = SubjectKey::product(&input.order_id, &input.product_id);
        let mut stage = self
            .repo
            .load_stage::<ComponentType>(keys::LABELS_RECEIVED)
            .await?;

        let mut record = TransactionRecord::with_quantity(input.category, input.quantity);
        record.remarks = input.remarks;
        record.file = input.file;
        stage.history_mut(&subject).push(record.clone());
        self.repo.save_stage(keys::LABELS_RECEIVED, &stage).await?;

        tracing::info!(
            subject = %subject,
            quantity = %input.quantity,
            "recorded label receipt"
        );
        Ok(record)
    }

    /// Record produced labels against the received capacity
    pub async fn record_production(
        &self,
        input: RecordProductionInput,
    ) -> AppResult<ProductionStatus> {
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

        let (order, product) = self
            .catalog
            .get_product(&input.order_id, &input.product_id)
            .await?;
        check_category(&product, Some(input.category))?;

        let subject = SubjectKey::product(&input.order_id, &input.product_id);
        let receipts = self
            .repo
            .load_stage::<ComponentType>(keys::LABELS_RECEIVED)
            .await?;
        let capacities = capacity_from_receipts(product.iml_type, receipts.history(&subject));

        let mut stage = self
            .repo
            .load_stage::<ComponentType>(keys::PRODUCTION_FOLLOWUPS)
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
            .save_stage(keys::PRODUCTION_FOLLOWUPS, &stage)
            .await?;

        let view = ProductionStatus {
            order_id: order.id,
            order_number: order.order_number,
            company: order.contact.company,
            product_id: product.id.clone(),
            product_name: product.product_name.clone(),
            iml_type: product.iml_type,
            snapshot: snapshot(&capacities, stage.history(&subject)),
            receipts: receipts.history(&subject).to_vec(),
            records: stage.history(&subject).to_vec(),
        };
        Ok(view)
    }

    /// Remove one production record. A missing record is a warned no-op.
    pub async fn remove_production(
        &self,
        order_id: &str,
        product_id: &str,
        record_id: &RecordId,
    ) -> AppResult<ProductionStatus> {
        let subject = SubjectKey::product(order_id, product_id);
        let mut stage = self
            .repo
            .load_stage::<ComponentType>(keys::PRODUCTION_FOLLOWUPS)
            .await?;

        match remove_record(stage.history_mut(&subject), record_id) {
            Ok(removed) => {
                self.repo
                    .save_stage(keys::PRODUCTION_FOLLOWUPS, &stage)
                    .await?;
                tracing::info!(subject = %subject, record = %removed.id, "removed production record");
            }
            Err(LedgerError::RecordNotFound(id)) => {
                tracing::warn!(subject = %subject, record = %id, "production record not found; nothing removed");
            }
            Err(err) => return Err(err.into()),
        }

        self.status(order_id, product_id).await
    }

    /// Derived view of one subject
    pub async fn status(&self, order_id: &str, product_id: &str) -> AppResult<ProductionStatus> {
        let (order, product) = self.catalog.get_product(order_id, product_id).await?;
        let subject = SubjectKey::product(order_id, product_id);

        let receipts = self
            .repo
            .load_stage::<ComponentType>(keys::LABELS_RECEIVED)
            .await?;
        let stage = self
            .repo
            .load_stage::<ComponentType>(keys::PRODUCTION_FOLLOWUPS)
            .await?;

        let capacities = capacity_from_receipts(product.iml_type, receipts.history(&subject));
        Ok(ProductionStatus {
            order_id: order.id,
            order_number: order.order_number,
            company: order.contact.company,
            product_id: product.id.clone(),
            product_name: product.product_name.clone(),
            iml_type: product.iml_type,
            snapshot: snapshot(&capacities, stage.history(&subject)),
            receipts: receipts.history(&subject).to_vec(),
            records: stage.history(&subject).to_vec(),
        })
    }

    /// All purchase products with labels received; zero-capacity
    /// subjects are left out.
    pub async fn list_active(&self) -> AppResult<Vec<ProductionStatus>> {
        let refs = self.catalog.list_purchase_products().await?;
        let receipts = self
            .repo
            .load_stage::<ComponentType>(keys::LABELS_RECEIVED)
            .await?;
        let stage = self
            .repo
            .load_stage::<ComponentType>(keys::PRODUCTION_FOLLOWUPS)
            .await?;

        let mut views = Vec::new();
        for item in refs {
            let subject = SubjectKey::product(&item.order_id, &item.product.id);
            let capacities =
                capacity_from_receipts(item.product.iml_type, receipts.history(&subject));
            if capacities.is_empty() {
                continue;
            }
            views.push(ProductionStatus {
                order_id: item.order_id,
                order_number: item.order_number,
                company: item.contact.company,
                product_id: item.product.id.clone(),
                product_name: item.product.product_name.clone(),
                iml_type: item.product.iml_type,
                snapshot: snapshot(&capacities, stage.history(&subject)),
                receipts: receipts.history(&subject).to_vec(),
                records: stage.history(&subject).to_vec(),
            });
        }
        Ok(views)
    }
}

/// A receipt or followup must name a component the product actually has.
fn check_category(product: &Product, category: Option<ComponentType>) -> AppResult<()> {
    if let Some(category) = category {
        if !product.iml_type.components().contains(&category) {
            return Err(AppError::Validation {
                field: "category".to_string(),
                message: format!(
                    "{} has no {} component",
                    product.product_name, category
                ),
            });
        }
    }
    Ok(())
}
