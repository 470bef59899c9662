//! Business logic services for the IML Operations Tracking Platform

pub mod billing;
pub mod catalog;
pub mod dispatch;
pub mod inventory;
pub mod production;

pub use billing::BillingService;
pub use catalog::CatalogService;
pub use dispatch::DispatchService;
pub use inventory::InventoryService;
pub use production::ProductionService;
