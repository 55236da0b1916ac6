use serde::{Deserialize, Serialize};

use pizzeria_core::{DomainError, DomainResult, Money};
use pizzeria_menu::Pizza;

use crate::config::PricingConfig;
use crate::rules::{BundleCheapestFree, DiscountRule, ToppingRelief};

/// Result of pricing an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Sum of all pizza prices.
    pub subtotal: Money,
    /// Amount taken off by the applied rule (zero when none applied).
    pub discount: Money,
    /// What the customer pays: `subtotal - discount`.
    pub total: Money,
    /// Name of the rule that applied, if any.
    pub applied_rule: Option<String>,
}

/// Ordered list of discount rules; the first applicable one wins.
#[derive(Debug)]
pub struct DiscountEngine {
    rules: Vec<Box<dyn DiscountRule>>,
}

impl DiscountEngine {
    /// Engine with an explicit priority order (index 0 is evaluated first).
    pub fn new(rules: Vec<Box<dyn DiscountRule>>) -> Self {
        Self { rules }
    }

    /// The house rules: bundle-cheapest-free, then topping relief.
    ///
    /// Fails with `Validation` when `config` does not pass
    /// [`PricingConfig::validate`].
    pub fn from_config(config: &PricingConfig) -> DomainResult<Self> {
        config.validate()?;
        Ok(Self::new(house_rules(config)))
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Price an order. Amounts too large for `Money` fail with `Validation`.
    pub fn quote(&self, pizzas: &[Pizza]) -> DomainResult<Quote> {
        let subtotal = Money::checked_sum(pizzas.iter().map(Pizza::price))
            .ok_or_else(|| DomainError::validation("order subtotal overflows"))?;

        for rule in &self.rules {
            if let Some(discount) = rule.evaluate(pizzas)? {
                let total = subtotal
                    .checked_sub(discount)
                    .ok_or_else(|| DomainError::validation("order total overflows"))?;
                return Ok(Quote {
                    subtotal,
                    discount,
                    total,
                    applied_rule: Some(rule.name().to_string()),
                });
            }
        }

        Ok(Quote {
            subtotal,
            discount: Money::ZERO,
            total: subtotal,
            applied_rule: None,
        })
    }

    /// Payable amount for the given pizzas.
    pub fn price(&self, pizzas: &[Pizza]) -> DomainResult<Money> {
        self.quote(pizzas).map(|quote| quote.total)
    }
}

impl Default for DiscountEngine {
    fn default() -> Self {
        Self::new(house_rules(&PricingConfig::default()))
    }
}

fn house_rules(config: &PricingConfig) -> Vec<Box<dyn DiscountRule>> {
    vec![
        Box::new(BundleCheapestFree::new(config.bundle_size)),
        Box::new(ToppingRelief::new(
            config.relief_topping.clone(),
            config.relief_percent,
            config.topping_match,
        )),
    ]
}
