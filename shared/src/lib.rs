//! Shared types and ledger core for the IML Operations Tracking Platform
//!
//! This crate contains types shared between the backend, the browser
//! console (via WASM), and other components of the system. Everything
//! here is pure computation over its inputs; persistence and transport
//! live in the backend crate.

pub mod ledger;
pub mod models;
pub mod split;
pub mod types;
pub mod validation;

pub use ledger::*;
pub use models::*;
pub use split::*;
pub use types::*;
pub use validation::*;
