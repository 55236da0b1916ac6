use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use pizzeria_core::{DomainError, DomainResult};

/// How a pizza's toppings are compared with the relief topping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToppingMatch {
    /// Byte-for-byte equality.
    #[default]
    Exact,
    /// ASCII case-insensitive equality. Broadens who gets the discount.
    CaseInsensitive,
}

impl core::str::FromStr for ToppingMatch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" => Ok(ToppingMatch::Exact),
            "case-insensitive" => Ok(ToppingMatch::CaseInsensitive),
            other => Err(format!("unknown topping match mode '{other}'")),
        }
    }
}

/// Parameters of the standard rule set.
///
/// Deserialization runs [`PricingConfig::validate`], so a loaded config is
/// always usable by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPricingConfig")]
pub struct PricingConfig {
    /// Order size that makes the cheapest pizza free.
    pub bundle_size: usize,
    /// Topping that triggers the relief discount.
    pub relief_topping: String,
    /// Percentage taken off pizzas *without* the relief topping.
    pub relief_percent: Decimal,
    pub topping_match: ToppingMatch,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            bundle_size: 3,
            relief_topping: "pineapple".to_string(),
            relief_percent: Decimal::TEN,
            topping_match: ToppingMatch::Exact,
        }
    }
}

impl PricingConfig {
    /// Relief percent must lie in `0..=100`; above that totals go negative.
    pub fn check_relief_percent(percent: Decimal) -> DomainResult<()> {
        if (Decimal::ZERO..=Decimal::ONE_HUNDRED).contains(&percent) {
            Ok(())
        } else {
            Err(DomainError::validation(format!(
                "relief_percent {percent} is outside 0..=100"
            )))
        }
    }

    pub fn check_relief_topping(topping: &str) -> DomainResult<()> {
        if topping.trim().is_empty() {
            return Err(DomainError::validation("relief_topping must not be blank"));
        }
        Ok(())
    }

    pub fn validate(&self) -> DomainResult<()> {
        Self::check_relief_percent(self.relief_percent)?;
        Self::check_relief_topping(&self.relief_topping)
    }
}

/// Wire shape of [`PricingConfig`]; missing fields take the defaults.
#[derive(Deserialize)]
#[serde(default)]
struct RawPricingConfig {
    bundle_size: usize,
    relief_topping: String,
    relief_percent: Decimal,
    topping_match: ToppingMatch,
}

impl Default for RawPricingConfig {
    fn default() -> Self {
        let PricingConfig {
            bundle_size,
            relief_topping,
            relief_percent,
            topping_match,
        } = PricingConfig::default();
        Self {
            bundle_size,
            relief_topping,
            relief_percent,
            topping_match,
        }
    }
}

impl TryFrom<RawPricingConfig> for PricingConfig {
    type Error = DomainError;

    fn try_from(raw: RawPricingConfig) -> Result<Self, Self::Error> {
        let config = PricingConfig {
            bundle_size: raw.bundle_size,
            relief_topping: raw.relief_topping,
            relief_percent: raw.relief_percent,
            topping_match: raw.topping_match,
        };
        config.validate()?;
        Ok(config)
    }
}
