//! Configuration loading from the process environment.
//!
//! | variable                  | default     |
//! |---------------------------|-------------|
//! | `PIZZERIA_BUNDLE_SIZE`    | `3`         |
//! | `PIZZERIA_RELIEF_TOPPING` | `pineapple` |
//! | `PIZZERIA_RELIEF_PERCENT` | `10`        |
//! | `PIZZERIA_TOPPING_MATCH`  | `exact`     |
//!
//! Invalid values are logged and replaced by the default, so the result always
//! passes `PricingConfig::validate`.

use core::str::FromStr;

use pizzeria_pricing::PricingConfig;

pub const BUNDLE_SIZE_VAR: &str = "PIZZERIA_BUNDLE_SIZE";
pub const RELIEF_TOPPING_VAR: &str = "PIZZERIA_RELIEF_TOPPING";
pub const RELIEF_PERCENT_VAR: &str = "PIZZERIA_RELIEF_PERCENT";
pub const TOPPING_MATCH_VAR: &str = "PIZZERIA_TOPPING_MATCH";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PizzeriaConfig {
    pub pricing: PricingConfig,
}

impl PizzeriaConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (lets tests avoid touching the real env).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = PricingConfig::default();

        let bundle_size = parse_or(&lookup, BUNDLE_SIZE_VAR, defaults.bundle_size);
        let relief_percent = parse_or(&lookup, RELIEF_PERCENT_VAR, defaults.relief_percent);
        let topping_match = parse_or(&lookup, TOPPING_MATCH_VAR, defaults.topping_match);

        let relief_topping = match lookup(RELIEF_TOPPING_VAR) {
            None => defaults.relief_topping,
            Some(raw) => match PricingConfig::check_relief_topping(&raw) {
                Ok(()) => raw.trim().to_string(),
                Err(err) => {
                    tracing::warn!("{RELIEF_TOPPING_VAR}: {err}; using '{}'", defaults.relief_topping);
                    defaults.relief_topping
                }
            },
        };

        let relief_percent = match PricingConfig::check_relief_percent(relief_percent) {
            Ok(()) => relief_percent,
            Err(err) => {
                tracing::warn!("{RELIEF_PERCENT_VAR}: {err}; using {}", defaults.relief_percent);
                defaults.relief_percent
            }
        };

        Self {
            pricing: PricingConfig {
                bundle_size,
                relief_topping,
                relief_percent,
                topping_match,
            },
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + core::fmt::Debug,
{
    match lookup(key) {
        None => default,
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("{key}={raw:?} is invalid; using default {default:?}");
                default
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pizzeria_pricing::ToppingMatch;
    use rust_decimal::Decimal;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_env_gives_defaults() {
        let config = PizzeriaConfig::from_lookup(lookup(&[]));
        assert_eq!(config, PizzeriaConfig::default());
    }

    #[test]
    fn reads_all_pricing_variables() {
        let config = PizzeriaConfig::from_lookup(lookup(&[
            (BUNDLE_SIZE_VAR, "4"),
            (RELIEF_TOPPING_VAR, " anchovies "),
            (RELIEF_PERCENT_VAR, "12.5"),
            (TOPPING_MATCH_VAR, "case-insensitive"),
        ]));

        assert_eq!(config.pricing.bundle_size, 4);
        assert_eq!(config.pricing.relief_topping, "anchovies");
        assert_eq!(config.pricing.relief_percent, Decimal::new(125, 1));
        assert_eq!(config.pricing.topping_match, ToppingMatch::CaseInsensitive);
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let config = PizzeriaConfig::from_lookup(lookup(&[
            (BUNDLE_SIZE_VAR, "three"),
            (RELIEF_TOPPING_VAR, "   "),
            (RELIEF_PERCENT_VAR, "150"),
            (TOPPING_MATCH_VAR, "fuzzy"),
        ]));

        assert_eq!(config, PizzeriaConfig::default());
        assert!(config.pricing.validate().is_ok());
    }

    #[test]
    fn negative_percent_falls_back_to_default() {
        let config = PizzeriaConfig::from_lookup(lookup(&[(RELIEF_PERCENT_VAR, "-1")]));
        assert_eq!(config.pricing.relief_percent, Decimal::TEN);
    }
}
