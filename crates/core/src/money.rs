//! Exact decimal money amounts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::value_object::ValueObject;

/// A currency amount backed by an exact decimal.
///
/// No rounding is ever applied: `10.00 * 0.10` stays `1.0000`. Equality is
/// numeric, so `28.000 == 28.00`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl ValueObject for Money {}

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Amount expressed in minor units (cents): `from_minor(2535)` is `25.35`.
    pub fn from_minor(minor: i64) -> Self {
        Self(Decimal::new(minor, 2))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    pub fn checked_sub(self, rhs: Money) -> Option<Money> {
        self.0.checked_sub(rhs.0).map(Money)
    }

    /// `percent` of this amount, e.g. `10` on `20.00` is `2.00`.
    pub fn checked_percent_of(self, percent: Decimal) -> Option<Money> {
        self.0
            .checked_mul(percent)
            .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
            .map(Money)
    }

    /// Sum of all amounts; `None` if the total does not fit.
    pub fn checked_sum<I>(amounts: I) -> Option<Money>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts
            .into_iter()
            .try_fold(Money::ZERO, |acc, m| acc.checked_add(m))
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn minor_units_keep_two_decimals() {
        assert_eq!(Money::from_minor(2535).amount(), Decimal::new(2535, 2));
        assert_eq!(Money::from_minor(2535).to_string(), "25.35");
    }

    #[test]
    fn percent_is_exact() {
        let ten_percent = Money::from_minor(2000).checked_percent_of(Decimal::TEN);
        assert_eq!(ten_percent, Some(Money::from_minor(200)));
    }

    #[test]
    fn equality_ignores_scale() {
        assert_eq!(Money::new(Decimal::new(28000, 3)), Money::from_minor(2800));
    }

    #[test]
    fn sum_of_cents_does_not_drift() {
        let total = Money::checked_sum([
            Money::from_minor(1000),
            Money::from_minor(2535),
            Money::from_minor(3035),
        ]);
        assert_eq!(total, Some(Money::from_minor(6570)));
    }

    #[test]
    fn overflow_is_reported_not_panicked() {
        let max = Money::new(Decimal::MAX);

        assert_eq!(max.checked_add(Money::from_minor(100)), None);
        assert_eq!(Money::new(Decimal::MIN).checked_sub(Money::from_minor(100)), None);
        assert_eq!(max.checked_percent_of(Decimal::TEN), None);
        assert_eq!(Money::checked_sum([max, max]), None);
        assert_eq!(
            Money::from_minor(500).checked_sub(Money::from_minor(200)),
            Some(Money::from_minor(300))
        );
    }

    #[test]
    fn negative_detection() {
        assert!(Money::from_minor(-1).is_negative());
        assert!(!Money::ZERO.is_negative());
        assert!(!Money::from_minor(1).is_negative());
    }

    #[test]
    fn serializes_transparently() {
        let json = serde_json::to_string(&Money::from_minor(1050)).unwrap();
        let back: Money = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Money::from_minor(1050));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: summing cents through `Money` matches integer arithmetic.
        #[test]
        fn sum_matches_integer_cents(cents in prop::collection::vec(0i64..1_000_000i64, 0..20)) {
            let expected: i64 = cents.iter().sum();
            let total = Money::checked_sum(cents.iter().map(|c| Money::from_minor(*c)));
            prop_assert_eq!(total, Some(Money::from_minor(expected)));
        }
    }
}
