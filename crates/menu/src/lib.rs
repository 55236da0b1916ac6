//! Menu items as they appear on a purchase.
//!
//! Catalog management lives outside this workspace; only the shape of an
//! ordered pizza is defined here.

pub mod pizza;

pub use pizza::{Pizza, PizzaId};
