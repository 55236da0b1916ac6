use serde::{Deserialize, Serialize};

use pizzeria_core::{AggregateId, DomainError, DomainResult, Entity, Money};

/// Pizza identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PizzaId(pub AggregateId);

impl PizzaId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for PizzaId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A pizza as ordered: price and toppings are fixed once it joins a purchase.
///
/// Deserialization goes through [`Pizza::new`] and rejects negative prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PizzaRepr")]
pub struct Pizza {
    id: PizzaId,
    price: Money,
    toppings: Vec<String>,
}

impl Pizza {
    /// Build a pizza, rejecting negative prices.
    pub fn new<I, S>(id: PizzaId, price: Money, toppings: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if price.is_negative() {
            return Err(DomainError::validation("pizza price must not be negative"));
        }

        Ok(Self {
            id,
            price,
            toppings: toppings.into_iter().map(Into::into).collect(),
        })
    }

    pub fn id_typed(&self) -> PizzaId {
        self.id
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn toppings(&self) -> &[String] {
        &self.toppings
    }

    /// Exact, case-sensitive topping lookup.
    pub fn has_topping(&self, topping: &str) -> bool {
        self.toppings.iter().any(|t| t == topping)
    }

    pub fn has_topping_ignore_case(&self, topping: &str) -> bool {
        self.toppings.iter().any(|t| t.eq_ignore_ascii_case(topping))
    }
}

#[derive(Deserialize)]
struct PizzaRepr {
    id: PizzaId,
    price: Money,
    #[serde(default)]
    toppings: Vec<String>,
}

impl TryFrom<PizzaRepr> for Pizza {
    type Error = DomainError;

    fn try_from(repr: PizzaRepr) -> Result<Self, Self::Error> {
        Pizza::new(repr.id, repr.price, repr.toppings)
    }
}

impl Entity for Pizza {
    type Id = PizzaId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
