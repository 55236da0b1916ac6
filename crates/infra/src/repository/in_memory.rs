use std::collections::HashMap;
use std::sync::RwLock;

use pizzeria_core::{AggregateRoot, CustomerId, ExpectedVersion};
use pizzeria_purchasing::{Purchase, PurchaseId, PurchaseState};

use super::r#trait::{PurchaseRepository, RepositoryError};

/// In-memory purchase store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryPurchaseRepository {
    purchases: RwLock<HashMap<PurchaseId, Purchase>>,
}

impl InMemoryPurchaseRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PurchaseRepository for InMemoryPurchaseRepository {
    fn find_draft_purchases(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Purchase>, RepositoryError> {
        let map = self
            .purchases
            .read()
            .map_err(|_| RepositoryError::Unavailable("lock poisoned".to_string()))?;

        let mut drafts: Vec<Purchase> = map
            .values()
            .filter(|p| p.state() == PurchaseState::Draft && p.belongs_to(customer_id))
            .cloned()
            .collect();
        drafts.sort_by_key(|p| (p.created_at(), p.id_typed()));
        Ok(drafts)
    }

    fn find_placed_purchase(&self) -> Result<Option<Purchase>, RepositoryError> {
        let map = self
            .purchases
            .read()
            .map_err(|_| RepositoryError::Unavailable("lock poisoned".to_string()))?;

        Ok(map
            .values()
            .filter(|p| p.state() == PurchaseState::Placed)
            .min_by_key(|p| (p.placed_at(), p.id_typed()))
            .cloned())
    }

    fn find_by_id(&self, purchase_id: PurchaseId) -> Result<Option<Purchase>, RepositoryError> {
        let map = self
            .purchases
            .read()
            .map_err(|_| RepositoryError::Unavailable("lock poisoned".to_string()))?;
        Ok(map.get(&purchase_id).cloned())
    }

    fn save(
        &self,
        purchase: Purchase,
        expected_version: ExpectedVersion,
    ) -> Result<Purchase, RepositoryError> {
        let mut map = self
            .purchases
            .write()
            .map_err(|_| RepositoryError::Unavailable("lock poisoned".to_string()))?;

        let current = map
            .get(&purchase.id_typed())
            .map(|p| p.version())
            .unwrap_or(0);

        expected_version.check(current).map_err(|err| {
            RepositoryError::Concurrency(format!("purchase {}: {err}", purchase.id_typed()))
        })?;

        map.insert(purchase.id_typed(), purchase.clone());
        Ok(purchase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use pizzeria_core::{Aggregate, AggregateId, Money};
    use pizzeria_menu::{Pizza, PizzaId};
    use pizzeria_purchasing::{ConfirmPurchase, PurchaseCommand, StartPurchase};

    fn draft(customer_id: CustomerId, at: chrono::DateTime<Utc>) -> Purchase {
        let purchase_id = PurchaseId::new(AggregateId::new());
        let mut purchase = Purchase::empty(purchase_id);
        purchase
            .execute(&PurchaseCommand::StartPurchase(StartPurchase {
                purchase_id,
                customer_id,
                pizza: Pizza::new(PizzaId::new(AggregateId::new()), Money::from_minor(1000), ["basil"])
                    .unwrap(),
                occurred_at: at,
            }))
            .unwrap();
        purchase
    }

    fn placed(at: chrono::DateTime<Utc>) -> Purchase {
        let customer_id = CustomerId::new();
        let mut purchase = draft(customer_id, at);
        purchase
            .execute(&PurchaseCommand::ConfirmPurchase(ConfirmPurchase {
                purchase_id: purchase.id_typed(),
                customer_id,
                occurred_at: at,
            }))
            .unwrap();
        purchase
    }

    #[test]
    fn drafts_are_scoped_to_customer() {
        let repo = InMemoryPurchaseRepository::new();
        let alice = CustomerId::new();
        let bob = CustomerId::new();

        repo.save(draft(alice, Utc::now()), ExpectedVersion::Exact(0)).unwrap();
        repo.save(draft(bob, Utc::now()), ExpectedVersion::Exact(0)).unwrap();

        let drafts = repo.find_draft_purchases(alice).unwrap();
        assert_eq!(drafts.len(), 1);
        assert!(drafts[0].belongs_to(alice));
    }

    #[test]
    fn placed_purchases_are_not_drafts() {
        let repo = InMemoryPurchaseRepository::new();
        let p = placed(Utc::now());
        let customer_id = p.customer_id().unwrap();
        repo.save(p, ExpectedVersion::Any).unwrap();

        assert!(repo.find_draft_purchases(customer_id).unwrap().is_empty());
    }

    #[test]
    fn oldest_placed_purchase_is_selected() {
        let repo = InMemoryPurchaseRepository::new();
        let now = Utc::now();
        let newer = placed(now);
        let older = placed(now - Duration::minutes(5));
        let older_id = older.id_typed();

        repo.save(newer, ExpectedVersion::Exact(0)).unwrap();
        repo.save(older, ExpectedVersion::Exact(0)).unwrap();

        let picked = repo.find_placed_purchase().unwrap().unwrap();
        assert_eq!(picked.id_typed(), older_id);
    }

    #[test]
    fn no_placed_purchase_yields_none() {
        let repo = InMemoryPurchaseRepository::new();
        repo.save(draft(CustomerId::new(), Utc::now()), ExpectedVersion::Exact(0))
            .unwrap();
        assert_eq!(repo.find_placed_purchase().unwrap(), None);
    }

    #[test]
    fn stale_save_is_rejected() {
        let repo = InMemoryPurchaseRepository::new();
        let purchase = placed(Utc::now());
        repo.save(purchase.clone(), ExpectedVersion::Exact(0)).unwrap();

        let err = repo.save(purchase, ExpectedVersion::Exact(0)).unwrap_err();
        match err {
            RepositoryError::Concurrency(msg) => {
                assert!(msg.contains("expected: Exact(0)"));
                assert!(msg.contains("actual: 3"));
            }
            other => panic!("expected Concurrency, got {other:?}"),
        }
    }

    #[test]
    fn find_by_id_returns_saved_copy() {
        let repo = InMemoryPurchaseRepository::new();
        let purchase = draft(CustomerId::new(), Utc::now());
        let saved = repo.save(purchase.clone(), ExpectedVersion::Exact(0)).unwrap();

        assert_eq!(saved, purchase);
        assert_eq!(repo.find_by_id(purchase.id_typed()).unwrap(), Some(purchase));
        assert_eq!(
            repo.find_by_id(PurchaseId::new(AggregateId::new())).unwrap(),
            None
        );
    }
}
