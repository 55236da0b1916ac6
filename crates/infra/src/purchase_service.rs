//! Purchase lifecycle orchestration.
//!
//! Every operation is one load → decide → save unit:
//!
//! ```text
//! Principal + request
//!   ↓
//! 1. Authorize (customer: purchases.order, staff: purchases.prepare)
//!   ↓
//! 2. Load purchase(s) from the repository
//!   ↓
//! 3. Handle command on the aggregate (pure, guarded by lifecycle state)
//!   ↓
//! 4. Save with the loaded version as expectation (compare-and-swap)
//! ```
//!
//! Nothing is saved when a step fails, and nothing is retried.

use chrono::Utc;
use thiserror::Error;
use tracing::instrument;

use pizzeria_auth::{authorize, AuthzError, Permission, Principal};
use pizzeria_core::{Aggregate, AggregateId, AggregateRoot, DomainError, ExpectedVersion};
use pizzeria_events::Event;
use pizzeria_menu::Pizza;
use pizzeria_pricing::{DiscountEngine, PricingConfig};
use pizzeria_purchasing::{
    AddPizza, CompletePurchase, ConfirmPurchase, PickPurchase, Purchase, PurchaseCommand,
    PurchaseId, StartPurchase,
};

use crate::repository::{PurchaseRepository, RepositoryError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PurchaseServiceError {
    /// Stored purchases already violate the single-draft invariant.
    #[error("consistency error: {0}")]
    Consistency(String),
    #[error("purchase not found")]
    NotFound,
    /// Transition requested from the wrong lifecycle state.
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
    #[error("validation failed: {0}")]
    Validation(String),
    /// Lost an optimistic concurrency race (e.g. two staff picking the same purchase).
    #[error("concurrency conflict: {0}")]
    Concurrency(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("store error: {0}")]
    Store(RepositoryError),
}

impl From<DomainError> for PurchaseServiceError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => PurchaseServiceError::Validation(msg),
            DomainError::InvariantViolation(msg) => PurchaseServiceError::InvariantViolation(msg),
            DomainError::Consistency(msg) => PurchaseServiceError::Consistency(msg),
            DomainError::InvalidState(msg) => PurchaseServiceError::InvalidState(msg),
            DomainError::InvalidId(msg) => PurchaseServiceError::Validation(msg),
            DomainError::NotFound => PurchaseServiceError::NotFound,
            DomainError::Conflict(msg) => PurchaseServiceError::Concurrency(msg),
            DomainError::Unauthorized => PurchaseServiceError::Forbidden("unauthorized".to_string()),
        }
    }
}

impl From<RepositoryError> for PurchaseServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Concurrency(msg) => PurchaseServiceError::Concurrency(msg),
            other => PurchaseServiceError::Store(other),
        }
    }
}

impl From<AuthzError> for PurchaseServiceError {
    fn from(value: AuthzError) -> Self {
        match value {
            AuthzError::Forbidden(permission) => PurchaseServiceError::Forbidden(permission),
        }
    }
}

pub type PurchaseServiceResult<T> = Result<T, PurchaseServiceError>;

/// Order lifecycle manager: drafts, confirmation, kitchen pick-up, serving.
#[derive(Debug)]
pub struct PurchaseService<R> {
    repository: R,
    engine: DiscountEngine,
}

impl<R> PurchaseService<R> {
    pub fn new(repository: R, engine: DiscountEngine) -> Self {
        Self { repository, engine }
    }

    /// Build with the house rules tuned by `config`; an invalid config is a
    /// `Validation` error.
    pub fn with_config(repository: R, config: &PricingConfig) -> PurchaseServiceResult<Self> {
        Ok(Self::new(repository, DiscountEngine::from_config(config)?))
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn engine(&self) -> &DiscountEngine {
        &self.engine
    }
}

impl<R> PurchaseService<R>
where
    R: PurchaseRepository,
{
    /// Add a pizza to the principal's draft, opening one if none exists.
    ///
    /// Two or more drafts for the same customer is a `Consistency` error and
    /// is left for an operator to resolve.
    #[instrument(skip(self, principal, pizza), fields(customer_id = %principal.customer_id), err)]
    pub fn add_pizza(&self, principal: &Principal, pizza: Pizza) -> PurchaseServiceResult<Purchase> {
        authorize(principal, &Permission::ORDER)?;
        let customer_id = principal.customer_id;
        let mut drafts = self.repository.find_draft_purchases(customer_id)?;

        match drafts.len() {
            0 => {
                let purchase_id = PurchaseId::new(AggregateId::new());
                tracing::info!(%customer_id, %purchase_id, "opening draft purchase");
                let command = PurchaseCommand::StartPurchase(StartPurchase {
                    purchase_id,
                    customer_id,
                    pizza,
                    occurred_at: Utc::now(),
                });
                self.execute(Purchase::empty(purchase_id), command)
            }
            1 => {
                let purchase = drafts.remove(0);
                let command = PurchaseCommand::AddPizza(AddPizza {
                    purchase_id: purchase.id_typed(),
                    customer_id,
                    pizza,
                    occurred_at: Utc::now(),
                });
                self.execute(purchase, command)
            }
            n => {
                tracing::error!(%customer_id, drafts = n, "multiple draft purchases for customer");
                Err(DomainError::consistency(format!(
                    "customer {customer_id} has {n} draft purchases"
                ))
                .into())
            }
        }
    }

    /// Submit the principal's draft: DRAFT → PLACED.
    #[instrument(skip(self, principal), fields(customer_id = %principal.customer_id), err)]
    pub fn confirm(&self, principal: &Principal) -> PurchaseServiceResult<Purchase> {
        authorize(principal, &Permission::ORDER)?;
        let customer_id = principal.customer_id;
        let mut drafts = self.repository.find_draft_purchases(customer_id)?;

        if drafts.len() > 1 {
            tracing::error!(%customer_id, drafts = drafts.len(), "multiple draft purchases for customer");
            return Err(DomainError::consistency(format!(
                "customer {customer_id} has {} draft purchases",
                drafts.len()
            ))
            .into());
        }
        let Some(purchase) = drafts.pop() else {
            tracing::debug!(%customer_id, "no draft purchase to confirm");
            return Err(PurchaseServiceError::NotFound);
        };

        let command = PurchaseCommand::ConfirmPurchase(ConfirmPurchase {
            purchase_id: purchase.id_typed(),
            customer_id,
            occurred_at: Utc::now(),
        });
        self.execute(purchase, command)
    }

    /// Claim the oldest placed purchase for preparation: PLACED → ONGOING.
    ///
    /// Returns `Ok(None)` when nothing is waiting.
    #[instrument(skip(self, principal), fields(staff_id = %principal.customer_id), err)]
    pub fn pick_next(&self, principal: &Principal) -> PurchaseServiceResult<Option<Purchase>> {
        authorize(principal, &Permission::PREPARE)?;

        let Some(purchase) = self.repository.find_placed_purchase()? else {
            tracing::debug!(staff_id = %principal.customer_id, "no placed purchase to pick");
            return Ok(None);
        };

        let command = PurchaseCommand::PickPurchase(PickPurchase {
            purchase_id: purchase.id_typed(),
            occurred_at: Utc::now(),
        });
        self.execute(purchase, command).map(Some)
    }

    /// Price and serve a purchase: ONGOING → SERVED.
    #[instrument(skip(self, principal, purchase_id), fields(staff_id = %principal.customer_id, %purchase_id), err)]
    pub fn complete(
        &self,
        principal: &Principal,
        purchase_id: PurchaseId,
    ) -> PurchaseServiceResult<Purchase> {
        authorize(principal, &Permission::PREPARE)?;

        let purchase = self
            .repository
            .find_by_id(purchase_id)?
            .ok_or(PurchaseServiceError::NotFound)?;

        let quote = self.engine.quote(purchase.pizzas()).map_err(|err| {
            tracing::error!(%purchase_id, error = %err, "purchase could not be priced");
            err
        })?;
        tracing::info!(
            %purchase_id,
            subtotal = %quote.subtotal,
            discount = %quote.discount,
            amount = %quote.total,
            rule = quote.applied_rule.as_deref().unwrap_or("none"),
            "purchase priced"
        );

        let command = PurchaseCommand::CompletePurchase(CompletePurchase {
            purchase_id,
            amount: quote.total,
            applied_rule: quote.applied_rule,
            occurred_at: Utc::now(),
        });
        self.execute(purchase, command)
    }

    /// Look up a purchase. Staff see everything; customers only their own.
    pub fn purchase(
        &self,
        principal: &Principal,
        purchase_id: PurchaseId,
    ) -> PurchaseServiceResult<Purchase> {
        let is_staff = authorize(principal, &Permission::PREPARE).is_ok();
        if !is_staff {
            authorize(principal, &Permission::ORDER)?;
        }

        match self.repository.find_by_id(purchase_id)? {
            Some(purchase) if is_staff || purchase.belongs_to(principal.customer_id) => Ok(purchase),
            _ => Err(PurchaseServiceError::NotFound),
        }
    }

    fn execute(
        &self,
        mut purchase: Purchase,
        command: PurchaseCommand,
    ) -> PurchaseServiceResult<Purchase> {
        let expected_version = ExpectedVersion::Exact(purchase.version());
        let events = purchase.execute(&command)?;

        let saved = self.repository.save(purchase, expected_version).map_err(|err| {
            tracing::warn!(error = %err, "failed to save purchase");
            err
        })?;

        for event in &events {
            tracing::info!(
                purchase_id = %saved.id_typed(),
                event_type = event.event_type(),
                state = %saved.state(),
                version = saved.version(),
                "purchase event applied"
            );
        }

        Ok(saved)
    }
}
