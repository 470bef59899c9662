//! Order catalog models
//!
//! The catalog is owned by the order-entry side of the house; this
//! service only reads it. Field names follow the catalog's stored JSON.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::transaction::decimal_number;

/// An order as stored in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub order_number: String,
    pub contact: Contact,
    #[serde(default)]
    pub products: Vec<Product>,
}

/// Customer contact on an order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub company: String,
    pub contact_name: String,
    pub phone: String,
}

/// A product line item on an order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub product_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    pub iml_type: ImlType,
    /// Ordered quantity of finished pieces
    #[serde(with = "decimal_number")]
    pub quantity: Decimal,
    /// Set once artwork is approved and a purchase order is raised
    #[serde(default)]
    pub move_to_purchase: bool,
}

/// Label type of a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImlType {
    #[serde(rename = "LID")]
    Lid,
    #[serde(rename = "TUB")]
    Tub,
    #[serde(rename = "LID & TUB")]
    LidAndTub,
}

impl ImlType {
    /// The component ledgers this product type tracks.
    pub fn components(&self) -> &'static [ComponentType] {
        match self {
            ImlType::Lid => &[ComponentType::Lid],
            ImlType::Tub => &[ComponentType::Tub],
            ImlType::LidAndTub => &[ComponentType::Lid, ComponentType::Tub],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImlType::Lid => "LID",
            ImlType::Tub => "TUB",
            ImlType::LidAndTub => "LID & TUB",
        }
    }
}

impl std::fmt::Display for ImlType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Component a capacity or transaction belongs to.
///
/// Declaration order matters: LID sorts first, and the combined-figure
/// split gives LID the floor half (see `split_combined`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ComponentType {
    #[serde(rename = "LID")]
    Lid,
    #[serde(rename = "TUB")]
    Tub,
}

impl ComponentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::Lid => "LID",
            ComponentType::Tub => "TUB",
        }
    }
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ComponentType {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LID" => Ok(ComponentType::Lid),
            "TUB" => Ok(ComponentType::Tub),
            _ => Err("unknown component type"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iml_type_wire_tags() {
        assert_eq!(
            serde_json::to_value(ImlType::LidAndTub).unwrap(),
            serde_json::json!("LID & TUB")
        );
        let parsed: ImlType = serde_json::from_str("\"LID\"").unwrap();
        assert_eq!(parsed, ImlType::Lid);
    }

    #[test]
    fn test_components_per_type() {
        assert_eq!(ImlType::Lid.components(), &[ComponentType::Lid]);
        assert_eq!(
            ImlType::LidAndTub.components(),
            &[ComponentType::Lid, ComponentType::Tub]
        );
    }

    #[test]
    fn test_lid_sorts_before_tub() {
        assert!(ComponentType::Lid < ComponentType::Tub);
    }

    #[test]
    fn test_order_deserializes_from_catalog_json() {
        let json = r#"{
            "id": "12",
            "orderNumber": "ORD-2024-031",
            "contact": { "company": "Sagar Plastics", "contactName": "R. Mehta", "phone": "9822011223" },
            "products": [{
                "id": "1",
                "productName": "500ml curd cup",
                "size": "500ml",
                "imlType": "LID & TUB",
                "quantity": 20000,
                "moveToPurchase": true
            }]
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.order_number, "ORD-2024-031");
        assert_eq!(order.products[0].iml_type, ImlType::LidAndTub);
        assert!(order.products[0].move_to_purchase);
    }
}
