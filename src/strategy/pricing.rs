//! Repricing rule.
//!
//! Turns (current price, market price, floor, offset %) into a
//! `PricingDecision`. Pure and deterministic: no I/O, no clock.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::PricingDecision;

/// Prices are compared in millionths of a unit.
const MICRO_UNITS_PER_UNIT: Decimal = dec!(1000000);

/// A candidate must differ from the listed price by more than this many
/// micro-units before an update is worth submitting.
pub const PRICE_TOLERANCE_MICROS: Decimal = Decimal::ONE;

/// Operator bounds for the repricing rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingPolicy {
    /// Lowest price the rig may ever be listed at.
    pub floor: Decimal,
    /// Signed percentage applied to the market price.
    pub offset_pct: Decimal,
}

impl PricingPolicy {
    pub fn new(floor: Decimal, offset_pct: Decimal) -> Self {
        Self { floor, offset_pct }
    }

    /// The price we would like to list at, given a market price.
    ///
    /// `None` when the offset pushes the result outside the `Decimal` range.
    pub fn candidate(&self, market: Decimal) -> Option<Decimal> {
        self.offset_pct
            .checked_mul(market)?
            .checked_div(dec!(100))?
            .checked_add(market)
    }

    pub fn decide(&self, current: Decimal, market: Decimal) -> PricingDecision {
        decide(current, market, self.floor, self.offset_pct)
    }
}

/// Decide what to do with the rig price this cycle.
///
/// A zero market price is the "no competing listing" sentinel and never
/// triggers an update. When the candidate is not above the floor, the
/// floor is only enforced if the market itself has dropped below it;
/// otherwise the price is left alone. A candidate that cannot be
/// represented is treated as no candidate at all.
pub fn decide(
    current: Decimal,
    market: Decimal,
    floor: Decimal,
    offset_pct: Decimal,
) -> PricingDecision {
    if market.is_zero() || market == current {
        return PricingDecision::Hold;
    }

    let candidate = PricingPolicy::new(floor, offset_pct)
        .candidate(market)
        .filter(|c| *c > floor && exceeds_tolerance(*c, current));

    if let Some(price) = candidate {
        PricingDecision::SetPrice(price)
    } else if current != floor && market < floor {
        PricingDecision::SetPrice(floor)
    } else {
        PricingDecision::Hold
    }
}

fn exceeds_tolerance(a: Decimal, b: Decimal) -> bool {
    // A gap too large to scale is certainly above tolerance.
    a.checked_sub(b)
        .and_then(|gap| gap.checked_mul(MICRO_UNITS_PER_UNIT))
        .map_or(true, |micros| micros.abs() > PRICE_TOLERANCE_MICROS)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
