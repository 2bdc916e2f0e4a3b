//! Pricing strategy.
//!
//! A single rule: follow the cheapest competitor by a signed percentage,
//! never going below the operator floor.

pub mod pricing;

pub use pricing::{decide, PricingPolicy, PRICE_TOLERANCE_MICROS};
