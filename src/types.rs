//! Shared types for the autoprice agent.
//!
//! These types form the data model used across all modules.
//! Platform clients convert their wire formats into these, so the
//! strategy and engine modules never see marketplace JSON.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Marketplace identifier of a rig.
pub type RigId = u32;

/// Marketplace identifier of a hashing algorithm.
pub type AlgorithmId = u32;

// ---------------------------------------------------------------------------
// Prices
// ---------------------------------------------------------------------------

/// A price per speed unit, e.g. `0.0035 BTC/Mh/day`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub value: Decimal,
    pub unit: String,
}

impl Price {
    pub fn new(value: Decimal, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6} {}", self.value, self.unit)
    }
}

// ---------------------------------------------------------------------------
// Rigs and algorithms
// ---------------------------------------------------------------------------

/// Current state of the operator's rig as listed on the marketplace.
#[derive(Debug, Clone, PartialEq)]
pub struct RigState {
    pub id: RigId,
    pub name: String,
    /// Listed rental price per speed unit.
    pub price: Price,
    pub algorithm_id: AlgorithmId,
}

/// A hashing algorithm as described by the marketplace.
#[derive(Debug, Clone, PartialEq)]
pub struct Algorithm {
    pub id: AlgorithmId,
    pub name: String,
    /// The marketplace's own reference price. Only its unit is used.
    pub market_price: Price,
}

/// One entry of a ranked rig listing.
#[derive(Debug, Clone, PartialEq)]
pub struct RigListing {
    pub id: RigId,
    pub price: Price,
}

/// Rental status filter for rig listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RigStatus {
    Available,
}

impl RigStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RigStatus::Available => "available",
        }
    }
}

impl fmt::Display for RigStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Market signal and decisions
// ---------------------------------------------------------------------------

/// Lowest competing price for an algorithm, excluding our own rig.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketQuote {
    /// Zero means no comparable listing was found.
    pub price: Decimal,
    pub unit: String,
}

impl MarketQuote {
    pub fn new(price: Decimal, unit: impl Into<String>) -> Self {
        Self {
            price,
            unit: unit.into(),
        }
    }

    /// Whether the quote carries an actual competing price.
    pub fn has_signal(&self) -> bool {
        !self.price.is_zero()
    }
}

impl fmt::Display for MarketQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_signal() {
            write!(f, "{:.6} {}", self.price, self.unit)
        } else {
            f.write_str("no competing listings")
        }
    }
}

/// What the pricing policy wants done with the rig price this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingDecision {
    Hold,
    SetPrice(Decimal),
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Failures talking to the rental marketplace.
#[derive(Debug, thiserror::Error)]
pub enum MarketplaceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
