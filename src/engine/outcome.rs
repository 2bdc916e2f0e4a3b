//! Cycle outcome: what one evaluation pass saw and did.
//!
//! Outcomes are handed to a `Reporter` and then dropped; nothing here
//! is retained between cycles.

use chrono::{DateTime, Local};
use rust_decimal::Decimal;

use crate::types::{AlgorithmId, MarketQuote, MarketplaceError, PricingDecision, RigId, RigState};

/// `h:mm:ss` in local time.
const TIMESTAMP_FORMAT: &str = "%-I:%M:%S";

/// Why a new price was submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceReason {
    /// Offset applied to the competing market price.
    Market,
    /// Market collapsed below the operator floor.
    Floor,
}

/// What the cycle ended up doing to the listed price.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleAction {
    /// The cycle stopped before a decision could be applied.
    Aborted,
    Held,
    PriceChanged { price: Decimal, reason: PriceReason },
}

/// The step that failed, with the underlying marketplace error.
#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    #[error("Unable to fetch rig {rig}: {source}")]
    FetchRig {
        rig: RigId,
        #[source]
        source: MarketplaceError,
    },

    #[error("Unable to fetch algorithm {algorithm}: {source}")]
    FetchAlgorithm {
        algorithm: AlgorithmId,
        #[source]
        source: MarketplaceError,
    },

    #[error("Unable to get market price: {source}")]
    FetchMarket {
        #[source]
        source: MarketplaceError,
    },

    #[error("Unable to update rig price to {price:.6}: {source}")]
    Update {
        price: Decimal,
        #[source]
        source: MarketplaceError,
    },

    #[error("Unable to update rig price to {price:.6}: update not applied")]
    UpdateRejected { price: Decimal },
}

/// Record of a single cycle.
#[derive(Debug)]
pub struct CycleOutcome {
    pub cycle: u64,
    pub started_at: DateTime<Local>,
    pub rig: Option<RigState>,
    pub market: Option<MarketQuote>,
    pub decision: Option<PricingDecision>,
    pub action: CycleAction,
    pub error: Option<CycleError>,
}

impl CycleOutcome {
    pub fn new(cycle: u64, started_at: DateTime<Local>) -> Self {
        Self {
            cycle,
            started_at,
            rig: None,
            market: None,
            decision: None,
            action: CycleAction::Aborted,
            error: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Timestamp-prefixed status lines, in the order things happened.
    pub fn lines(&self) -> Vec<String> {
        let ts = self.started_at.format(TIMESTAMP_FORMAT).to_string();
        let mut lines = Vec::new();

        if let Some(rig) = &self.rig {
            lines.push(format!("{ts} - Current rig price: {}", rig.price));
        }

        if let Some(market) = &self.market {
            lines.push(format!("{ts} - Current market price: {market}"));
        }

        let unit = self.unit();
        match &self.action {
            CycleAction::Aborted => {}
            CycleAction::Held => lines.push(format!("{ts} - Price held")),
            CycleAction::PriceChanged {
                price,
                reason: PriceReason::Market,
            } => lines.push(format!("{ts} - Rig price changed to {price:.6} {unit}")),
            CycleAction::PriceChanged {
                price,
                reason: PriceReason::Floor,
            } => lines.push(format!(
                "{ts} - Rig price changed to minPrice: {price:.6} {unit}"
            )),
        }

        if let Some(err) = &self.error {
            lines.push(format!("{ts} - ERR: {err}"));
        }

        lines
    }

    fn unit(&self) -> &str {
        self.market
            .as_ref()
            .map(|m| m.unit.as_str())
            .or_else(|| self.rig.as_ref().map(|r| r.price.unit.as_str()))
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
