//! Discount rule evaluators.

use rust_decimal::Decimal;

use pizzeria_core::{DomainError, DomainResult, Money};
use pizzeria_menu::Pizza;

use crate::config::ToppingMatch;

/// A single pricing rule.
///
/// `evaluate` returns `None` when the rule does not apply to the order, or
/// the discount to subtract from the subtotal when it does. Arithmetic that
/// does not fit in a `Money` is a `Validation` error. Rules never look at each
/// other; priority is the engine's concern.
pub trait DiscountRule: Send + Sync + core::fmt::Debug {
    /// Stable rule name, recorded on the served purchase.
    fn name(&self) -> &'static str;

    fn evaluate(&self, pizzas: &[Pizza]) -> DomainResult<Option<Money>>;
}

/// When the order has exactly `bundle_size` pizzas, the cheapest one is free.
///
/// Ties go to the first occurrence; it makes no difference to the amount but
/// keeps the choice deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleCheapestFree {
    pub bundle_size: usize,
}

impl BundleCheapestFree {
    pub const NAME: &'static str = "bundle-cheapest-free";

    pub fn new(bundle_size: usize) -> Self {
        Self { bundle_size }
    }

    /// Index of the pizza that would be free.
    pub fn cheapest_index(pizzas: &[Pizza]) -> Option<usize> {
        pizzas
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.price().cmp(&b.price()))
            .map(|(idx, _)| idx)
    }
}

impl DiscountRule for BundleCheapestFree {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn evaluate(&self, pizzas: &[Pizza]) -> DomainResult<Option<Money>> {
        if pizzas.is_empty() || pizzas.len() != self.bundle_size {
            return Ok(None);
        }
        Ok(Self::cheapest_index(pizzas).map(|idx| pizzas[idx].price()))
    }
}

/// When any pizza carries `topping`, every pizza *without* it gets
/// `percent` off. Pizzas with the topping pay full price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToppingRelief {
    pub topping: String,
    pub percent: Decimal,
    pub matching: ToppingMatch,
}

impl ToppingRelief {
    pub const NAME: &'static str = "topping-relief";

    pub fn new(topping: impl Into<String>, percent: Decimal, matching: ToppingMatch) -> Self {
        Self {
            topping: topping.into(),
            percent,
            matching,
        }
    }

    fn carries_topping(&self, pizza: &Pizza) -> bool {
        match self.matching {
            ToppingMatch::Exact => pizza.has_topping(&self.topping),
            ToppingMatch::CaseInsensitive => pizza.has_topping_ignore_case(&self.topping),
        }
    }
}

impl DiscountRule for ToppingRelief {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn evaluate(&self, pizzas: &[Pizza]) -> DomainResult<Option<Money>> {
        if !pizzas.iter().any(|p| self.carries_topping(p)) {
            return Ok(None);
        }

        let discount = Money::checked_sum(
            pizzas
                .iter()
                .filter(|p| !self.carries_topping(p))
                .map(Pizza::price),
        )
        .and_then(|sum| sum.checked_percent_of(self.percent))
        .ok_or_else(|| DomainError::validation("relief discount overflows"))?;

        Ok(Some(discount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pizzeria_core::AggregateId;
    use pizzeria_menu::PizzaId;

    fn pizza(topping: &str, cents: i64) -> Pizza {
        Pizza::new(PizzaId::new(AggregateId::new()), Money::from_minor(cents), [topping]).unwrap()
    }

    fn relief() -> ToppingRelief {
        ToppingRelief::new("pineapple", Decimal::TEN, ToppingMatch::Exact)
    }

    #[test]
    fn bundle_rule_needs_exact_size() {
        let rule = BundleCheapestFree::new(3);

        assert_eq!(rule.evaluate(&[pizza("a", 1000), pizza("b", 2000)]), Ok(None));
        assert_eq!(
            rule.evaluate(&[pizza("a", 1000), pizza("b", 2000), pizza("c", 3000), pizza("d", 500)]),
            Ok(None)
        );
        assert_eq!(
            rule.evaluate(&[pizza("a", 3000), pizza("b", 1000), pizza("c", 2000)]),
            Ok(Some(Money::from_minor(1000)))
        );
    }

    #[test]
    fn bundle_rule_never_applies_to_empty_orders() {
        assert_eq!(BundleCheapestFree::new(0).evaluate(&[]), Ok(None));
    }

    #[test]
    fn cheapest_tie_picks_first_occurrence() {
        let pizzas = [pizza("a", 2000), pizza("b", 1500), pizza("c", 1500)];
        assert_eq!(BundleCheapestFree::cheapest_index(&pizzas), Some(1));
    }

    #[test]
    fn relief_skips_orders_without_the_topping() {
        assert_eq!(relief().evaluate(&[pizza("mozzarella", 2000)]), Ok(None));
    }

    #[test]
    fn relief_discounts_only_pizzas_without_the_topping() {
        let discount = relief().evaluate(&[
            pizza("pineapple", 1000),
            pizza("mozzarella", 2000),
            pizza("pepperoni", 3000),
        ]);
        assert_eq!(discount, Ok(Some(Money::from_minor(500))));
    }

    #[test]
    fn relief_with_only_pineapple_pizzas_discounts_nothing() {
        let discount = relief().evaluate(&[pizza("pineapple", 1000), pizza("pineapple", 1200)]);
        assert_eq!(discount, Ok(Some(Money::ZERO)));
    }

    #[test]
    fn relief_is_case_sensitive_by_default() {
        let pizzas = [pizza("Pineapple", 1000), pizza("mozzarella", 2000)];

        assert_eq!(relief().evaluate(&pizzas), Ok(None));

        let lenient = ToppingRelief::new("pineapple", Decimal::TEN, ToppingMatch::CaseInsensitive);
        assert_eq!(lenient.evaluate(&pizzas), Ok(Some(Money::from_minor(200))));
    }

    #[test]
    fn relief_overflow_is_a_validation_error() {
        let huge = Pizza::new(
            PizzaId::new(AggregateId::new()),
            Money::new(Decimal::MAX),
            ["mozzarella"],
        )
        .unwrap();

        let err = relief()
            .evaluate(&[pizza("pineapple", 1000), huge])
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
