//! Purchase persistence boundary.
//!
//! Defines the narrow storage contract the lifecycle needs (load by customer,
//! by state, by id; save) without assuming any storage engine.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryPurchaseRepository;
pub use r#trait::{PurchaseRepository, RepositoryError};
