use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pizzeria_core::{Aggregate, AggregateId, AggregateRoot, CustomerId, DomainError, Money};
use pizzeria_events::Event;
use pizzeria_menu::Pizza;

/// Purchase identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PurchaseId(pub AggregateId);

impl PurchaseId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for PurchaseId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Purchase lifecycle, in order: `Draft < Placed < Ongoing < Served`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseState {
    Draft,
    Placed,
    Ongoing,
    Served,
}

impl PurchaseState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseState::Draft => "draft",
            PurchaseState::Placed => "placed",
            PurchaseState::Ongoing => "ongoing",
            PurchaseState::Served => "served",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PurchaseState::Served)
    }
}

impl core::fmt::Display for PurchaseState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate root: Purchase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Purchase {
    id: PurchaseId,
    customer_id: Option<CustomerId>,
    state: PurchaseState,
    pizzas: Vec<Pizza>,
    amount: Option<Money>,
    applied_rule: Option<String>,
    created_at: Option<DateTime<Utc>>,
    placed_at: Option<DateTime<Utc>>,
    served_at: Option<DateTime<Utc>>,
    version: u64,
    created: bool,
}

impl Purchase {
    /// Create an empty, not-yet-created aggregate instance.
    pub fn empty(id: PurchaseId) -> Self {
        Self {
            id,
            customer_id: None,
            state: PurchaseState::Draft,
            pizzas: Vec::new(),
            amount: None,
            applied_rule: None,
            created_at: None,
            placed_at: None,
            served_at: None,
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> PurchaseId {
        self.id
    }

    pub fn customer_id(&self) -> Option<CustomerId> {
        self.customer_id
    }

    pub fn state(&self) -> PurchaseState {
        self.state
    }

    pub fn pizzas(&self) -> &[Pizza] {
        &self.pizzas
    }

    /// Final charge; `None` until the purchase is served.
    pub fn amount(&self) -> Option<Money> {
        self.amount
    }

    pub fn applied_rule(&self) -> Option<&str> {
        self.applied_rule.as_deref()
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn placed_at(&self) -> Option<DateTime<Utc>> {
        self.placed_at
    }

    pub fn served_at(&self) -> Option<DateTime<Utc>> {
        self.served_at
    }

    pub fn is_created(&self) -> bool {
        self.created
    }

    pub fn belongs_to(&self, customer_id: CustomerId) -> bool {
        self.customer_id == Some(customer_id)
    }
}

impl AggregateRoot for Purchase {
    type Id = PurchaseId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: StartPurchase (a customer's first pizza opens a draft).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartPurchase {
    pub purchase_id: PurchaseId,
    pub customer_id: CustomerId,
    pub pizza: Pizza,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AddPizza (only allowed in Draft).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddPizza {
    pub purchase_id: PurchaseId,
    pub customer_id: CustomerId,
    pub pizza: Pizza,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ConfirmPurchase (Draft -> Placed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmPurchase {
    pub purchase_id: PurchaseId,
    pub customer_id: CustomerId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: PickPurchase (Placed -> Ongoing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickPurchase {
    pub purchase_id: PurchaseId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: CompletePurchase (Ongoing -> Served), carrying the priced amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletePurchase {
    pub purchase_id: PurchaseId,
    pub amount: Money,
    pub applied_rule: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PurchaseCommand {
    StartPurchase(StartPurchase),
    AddPizza(AddPizza),
    ConfirmPurchase(ConfirmPurchase),
    PickPurchase(PickPurchase),
    CompletePurchase(CompletePurchase),
}

/// Event: PurchaseCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseCreated {
    pub purchase_id: PurchaseId,
    pub customer_id: CustomerId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: PizzaAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PizzaAdded {
    pub purchase_id: PurchaseId,
    pub pizza: Pizza,
    pub occurred_at: DateTime<Utc>,
}

/// Event: PurchasePlaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchasePlaced {
    pub purchase_id: PurchaseId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: PurchasePicked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchasePicked {
    pub purchase_id: PurchaseId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: PurchaseServed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseServed {
    pub purchase_id: PurchaseId,
    pub amount: Money,
    pub applied_rule: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PurchaseEvent {
    PurchaseCreated(PurchaseCreated),
    PizzaAdded(PizzaAdded),
    PurchasePlaced(PurchasePlaced),
    PurchasePicked(PurchasePicked),
    PurchaseServed(PurchaseServed),
}

impl Event for PurchaseEvent {
    fn event_type(&self) -> &'static str {
        match self {
            PurchaseEvent::PurchaseCreated(_) => "purchasing.purchase.created",
            PurchaseEvent::PizzaAdded(_) => "purchasing.purchase.pizza_added",
            PurchaseEvent::PurchasePlaced(_) => "purchasing.purchase.placed",
            PurchaseEvent::PurchasePicked(_) => "purchasing.purchase.picked",
            PurchaseEvent::PurchaseServed(_) => "purchasing.purchase.served",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            PurchaseEvent::PurchaseCreated(e) => e.occurred_at,
            PurchaseEvent::PizzaAdded(e) => e.occurred_at,
            PurchaseEvent::PurchasePlaced(e) => e.occurred_at,
            PurchaseEvent::PurchasePicked(e) => e.occurred_at,
            PurchaseEvent::PurchaseServed(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Purchase {
    type Command = PurchaseCommand;
    type Event = PurchaseEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            PurchaseEvent::PurchaseCreated(e) => {
                self.id = e.purchase_id;
                self.customer_id = Some(e.customer_id);
                self.state = PurchaseState::Draft;
                self.pizzas.clear();
                self.amount = None;
                self.created_at = Some(e.occurred_at);
                self.created = true;
            }
            PurchaseEvent::PizzaAdded(e) => {
                self.pizzas.push(e.pizza.clone());
            }
            PurchaseEvent::PurchasePlaced(e) => {
                self.state = PurchaseState::Placed;
                self.placed_at = Some(e.occurred_at);
            }
            PurchaseEvent::PurchasePicked(_) => {
                self.state = PurchaseState::Ongoing;
            }
            PurchaseEvent::PurchaseServed(e) => {
                self.state = PurchaseState::Served;
                self.amount = Some(e.amount);
                self.applied_rule = e.applied_rule.clone();
                self.served_at = Some(e.occurred_at);
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            PurchaseCommand::StartPurchase(cmd) => self.handle_start(cmd),
            PurchaseCommand::AddPizza(cmd) => self.handle_add_pizza(cmd),
            PurchaseCommand::ConfirmPurchase(cmd) => self.handle_confirm(cmd),
            PurchaseCommand::PickPurchase(cmd) => self.handle_pick(cmd),
            PurchaseCommand::CompletePurchase(cmd) => self.handle_complete(cmd),
        }
    }
}

impl Purchase {
    fn ensure_created(&self) -> Result<(), DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        Ok(())
    }

    fn ensure_purchase_id(&self, purchase_id: PurchaseId) -> Result<(), DomainError> {
        if self.id != purchase_id {
            return Err(DomainError::invariant("purchase_id mismatch"));
        }
        Ok(())
    }

    fn ensure_customer(&self, customer_id: CustomerId) -> Result<(), DomainError> {
        if !self.belongs_to(customer_id) {
            return Err(DomainError::invariant("purchase belongs to another customer"));
        }
        Ok(())
    }

    fn ensure_state(&self, expected: PurchaseState) -> Result<(), DomainError> {
        if self.state != expected {
            return Err(DomainError::invalid_state(format!(
                "purchase {} is {}, expected {}",
                self.id, self.state, expected
            )));
        }
        Ok(())
    }

    fn handle_start(&self, cmd: &StartPurchase) -> Result<Vec<PurchaseEvent>, DomainError> {
        if self.created {
            return Err(DomainError::conflict("purchase already exists"));
        }
        self.ensure_purchase_id(cmd.purchase_id)?;

        Ok(vec![
            PurchaseEvent::PurchaseCreated(PurchaseCreated {
                purchase_id: cmd.purchase_id,
                customer_id: cmd.customer_id,
                occurred_at: cmd.occurred_at,
            }),
            PurchaseEvent::PizzaAdded(PizzaAdded {
                purchase_id: cmd.purchase_id,
                pizza: cmd.pizza.clone(),
                occurred_at: cmd.occurred_at,
            }),
        ])
    }

    fn handle_add_pizza(&self, cmd: &AddPizza) -> Result<Vec<PurchaseEvent>, DomainError> {
        self.ensure_created()?;
        self.ensure_purchase_id(cmd.purchase_id)?;
        self.ensure_customer(cmd.customer_id)?;
        self.ensure_state(PurchaseState::Draft)?;

        Ok(vec![PurchaseEvent::PizzaAdded(PizzaAdded {
            purchase_id: cmd.purchase_id,
            pizza: cmd.pizza.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_confirm(&self, cmd: &ConfirmPurchase) -> Result<Vec<PurchaseEvent>, DomainError> {
        self.ensure_created()?;
        self.ensure_purchase_id(cmd.purchase_id)?;
        self.ensure_customer(cmd.customer_id)?;
        self.ensure_state(PurchaseState::Draft)?;

        if self.pizzas.is_empty() {
            return Err(DomainError::validation("cannot confirm a purchase without pizzas"));
        }

        Ok(vec![PurchaseEvent::PurchasePlaced(PurchasePlaced {
            purchase_id: cmd.purchase_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_pick(&self, cmd: &PickPurchase) -> Result<Vec<PurchaseEvent>, DomainError> {
        self.ensure_created()?;
        self.ensure_purchase_id(cmd.purchase_id)?;
        self.ensure_state(PurchaseState::Placed)?;

        Ok(vec![PurchaseEvent::PurchasePicked(PurchasePicked {
            purchase_id: cmd.purchase_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_complete(&self, cmd: &CompletePurchase) -> Result<Vec<PurchaseEvent>, DomainError> {
        self.ensure_created()?;
        self.ensure_purchase_id(cmd.purchase_id)?;
        self.ensure_state(PurchaseState::Ongoing)?;

        if cmd.amount.is_negative() {
            return Err(DomainError::validation("amount must not be negative"));
        }

        Ok(vec![PurchaseEvent::PurchaseServed(PurchaseServed {
            purchase_id: cmd.purchase_id,
            amount: cmd.amount,
            applied_rule: cmd.applied_rule.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }
}
