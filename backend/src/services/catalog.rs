//! Read-only access to the order catalog
//!
//! Orders are entered elsewhere; this service reads them for capacity
//! figures and subject lookups and never writes them back.

use std::sync::Arc;

use serde::Serialize;

use shared::{Contact, Order, Product};

use crate::error::{AppError, AppResult};
use crate::store::{keys, LedgerRepository, Store};

/// A product joined with the order it belongs to, as listed in
/// stage-level work views.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRef {
    pub order_id: String,
    pub order_number: String,
    pub contact: Contact,
    pub product: Product,
}

/// Catalog service for order and product lookups
#[derive(Clone)]
pub struct CatalogService {
    repo: LedgerRepository,
}

impl CatalogService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            repo: LedgerRepository::new(store),
        }
    }

    /// List all orders
    pub async fn list_orders(&self) -> AppResult<Vec<Order>> {
        let (orders, _version) = self.repo.load::<Vec<Order>>(keys::ORDERS).await?;
        Ok(orders)
    }

    /// Get an order by id
    pub async fn get_order(&self, order_id: &str) -> AppResult<Order> {
        self.list_orders()
            .await?
            .into_iter()
            .find(|order| order.id == order_id)
            .ok_or_else(|| AppError::NotFound("Order".to_string()))
    }

    /// Get a product line item and its parent order
    pub async fn get_product(&self, order_id: &str, product_id: &str) -> AppResult<(Order, Product)> {
        let order = self.get_order(order_id).await?;
        let product = order
            .products
            .iter()
            .find(|product| product.id == product_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Product".to_string()))?;
        Ok((order, product))
    }

    /// List products moved to purchase: the pool of subjects the
    /// production, inventory, and dispatch stages work through.
    pub async fn list_purchase_products(&self) -> AppResult<Vec<ProductRef>> {
        let orders = self.list_orders().await?;
        let mut refs = Vec::new();
        for order in orders {
            for product in &order.products {
                if product.move_to_purchase {
                    refs.push(ProductRef {
                        order_id: order.id.clone(),
                        order_number: order.order_number.clone(),
                        contact: order.contact.clone(),
                        product: product.clone(),
                    });
                }
            }
        }
        Ok(refs)
    }
}
