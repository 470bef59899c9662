//! Shared helpers for service tests

use std::sync::Arc;

use serde_json::json;

use crate::store::{keys, MemoryStore, Store, NEW_ENTRY};

/// Store seeded with one order: a "LID & TUB" product and a LID-only
/// product, both moved to purchase.
pub async fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());
    let orders = json!([
        {
            "id": "12",
            "orderNumber": "ORD-2024-031",
            "contact": {
                "company": "Sagar Plastics",
                "contactName": "R. Mehta",
                "phone": "9822011223"
            },
            "products": [
                {
                    "id": "1",
                    "productName": "500ml curd cup",
                    "size": "500ml",
                    "imlType": "LID & TUB",
                    "quantity": 20000,
                    "moveToPurchase": true
                },
                {
                    "id": "2",
                    "productName": "200ml juice lid",
                    "imlType": "LID",
                    "quantity": 1000,
                    "moveToPurchase": true
                }
            ]
        }
    ]);
    store.put(keys::ORDERS, orders, NEW_ENTRY).await.unwrap();
    store
}
