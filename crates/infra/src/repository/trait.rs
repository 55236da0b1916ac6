use std::sync::Arc;

use thiserror::Error;

use pizzeria_core::{CustomerId, ExpectedVersion};
use pizzeria_purchasing::{Purchase, PurchaseId};

/// Purchase store operation error.
///
/// These are **infrastructure errors** as opposed to domain errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Optimistic concurrency check failed (someone saved first).
    #[error("optimistic concurrency check failed: {0}")]
    Concurrency(String),

    /// The backing store could not be reached or is corrupted.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Storage contract for purchases.
///
/// ## Selection policy
///
/// `find_placed_purchase` returns the **oldest** placed purchase: smallest
/// `placed_at`, ties broken by purchase id (UUIDv7, time-ordered).
///
/// ## Atomic claim
///
/// `save` compares `expected_version` against the stored version (`0` when
/// absent) and refuses the write on mismatch. Two callers that load the same
/// placed purchase and both try to move it to ongoing cannot both succeed.
pub trait PurchaseRepository: Send + Sync {
    /// All draft purchases of a customer, oldest first.
    fn find_draft_purchases(&self, customer_id: CustomerId)
        -> Result<Vec<Purchase>, RepositoryError>;

    fn find_placed_purchase(&self) -> Result<Option<Purchase>, RepositoryError>;

    fn find_by_id(&self, purchase_id: PurchaseId) -> Result<Option<Purchase>, RepositoryError>;

    /// Upsert; returns the persisted representation.
    fn save(
        &self,
        purchase: Purchase,
        expected_version: ExpectedVersion,
    ) -> Result<Purchase, RepositoryError>;
}

impl<S> PurchaseRepository for Arc<S>
where
    S: PurchaseRepository + ?Sized,
{
    fn find_draft_purchases(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Purchase>, RepositoryError> {
        (**self).find_draft_purchases(customer_id)
    }

    fn find_placed_purchase(&self) -> Result<Option<Purchase>, RepositoryError> {
        (**self).find_placed_purchase()
    }

    fn find_by_id(&self, purchase_id: PurchaseId) -> Result<Option<Purchase>, RepositoryError> {
        (**self).find_by_id(purchase_id)
    }

    fn save(
        &self,
        purchase: Purchase,
        expected_version: ExpectedVersion,
    ) -> Result<Purchase, RepositoryError> {
        (**self).save(purchase, expected_version)
    }
}
