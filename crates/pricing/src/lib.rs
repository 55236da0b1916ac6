//! Discount pricing for served purchases.
//!
//! Pure, deterministic computation over the ordered pizzas: no IO, no clock.
//! Rules are evaluated in priority order and exactly one of them (or none)
//! applies to an order.

pub mod config;
pub mod engine;
pub mod rules;

pub use config::{PricingConfig, ToppingMatch};
pub use engine::{DiscountEngine, Quote};
pub use rules::{BundleCheapestFree, DiscountRule, ToppingRelief};
