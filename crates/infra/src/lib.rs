//! Infrastructure layer: purchase storage, lifecycle orchestration, config.

pub mod config;
pub mod purchase_service;
pub mod repository;


pub use config::PizzeriaConfig;
pub use purchase_service::{PurchaseService, PurchaseServiceError, PurchaseServiceResult};
pub use repository::{InMemoryPurchaseRepository, PurchaseRepository, RepositoryError};
