//! Purchases domain module.
//!
//! This crate contains the purchase lifecycle rules, implemented purely as
//! deterministic domain logic (no IO, no pricing, no storage).

pub mod purchase;

pub use purchase::{
    AddPizza, CompletePurchase, ConfirmPurchase, PickPurchase, PizzaAdded, Purchase,
    PurchaseCommand, PurchaseCreated, PurchaseEvent, PurchaseId, PurchasePicked, PurchasePlaced,
    PurchaseServed, PurchaseState, StartPurchase,
};
