//! Cycle scheduler: the fetch → decide → apply → report loop.
//!
//! Each cycle runs to completion (or to its first failure) before the
//! fixed wait starts. Failures end the current cycle only; the wait is
//! never skipped and the loop never exits on its own.

use chrono::Local;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::display::Reporter;
use crate::engine::outcome::{CycleAction, CycleError, CycleOutcome, PriceReason};
use crate::engine::resolver::MarketPriceResolver;
use crate::platforms::RentalPlatform;
use crate::strategy::pricing::PricingPolicy;
use crate::types::{MarketQuote, PricingDecision, RigId};

/// Delay between the end of one cycle and the start of the next.
pub const DEFAULT_CYCLE_INTERVAL: Duration = Duration::from_secs(30);

pub struct Scheduler<P, R> {
    platform: P,
    reporter: R,
    resolver: MarketPriceResolver,
    policy: PricingPolicy,
    rig: RigId,
    interval: Duration,
    cycle_count: u64,
}

impl<P, R> Scheduler<P, R>
where
    P: RentalPlatform,
    R: Reporter,
{
    pub fn new(platform: P, reporter: R, rig: RigId, policy: PricingPolicy) -> Self {
        Self {
            platform,
            reporter,
            resolver: MarketPriceResolver::new(),
            policy,
            rig,
            interval: DEFAULT_CYCLE_INTERVAL,
            cycle_count: 0,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    /// Run cycles forever.
    pub async fn run(&mut self) {
        info!(
            platform = self.platform.name(),
            rig = self.rig,
            floor = %self.policy.floor,
            offset_pct = %self.policy.offset_pct,
            interval_secs = self.interval.as_secs(),
            "Entering repricing loop"
        );

        loop {
            self.tick().await;
        }
    }

    /// One full cycle followed by the fixed wait.
    pub async fn tick(&mut self) {
        let outcome = self.run_cycle().await;
        self.reporter.report(&outcome);
        tokio::time::sleep(self.interval).await;
    }

    /// Evaluate and apply the pricing rule once. Never fails: errors are
    /// recorded on the returned outcome.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        self.cycle_count += 1;
        let mut outcome = CycleOutcome::new(self.cycle_count, Local::now());

        match self.evaluate(&mut outcome).await {
            Ok(()) => debug!(cycle = outcome.cycle, action = ?outcome.action, "Cycle complete"),
            Err(e) => {
                warn!(cycle = outcome.cycle, error = %e, "Cycle failed, continuing with next");
                outcome.error = Some(e);
            }
        }

        outcome
    }

    async fn evaluate(&self, outcome: &mut CycleOutcome) -> Result<(), CycleError> {
        // 1. Our rig
        let rig = self
            .platform
            .get_rig(self.rig)
            .await
            .map_err(|source| CycleError::FetchRig {
                rig: self.rig,
                source,
            })?;
        let current = rig.price.value;
        let algorithm_id = rig.algorithm_id;
        outcome.rig = Some(rig);

        // 2. The market
        let algorithm = self
            .platform
            .get_algorithm(algorithm_id)
            .await
            .map_err(|source| CycleError::FetchAlgorithm {
                algorithm: algorithm_id,
                source,
            })?;
        let market = self
            .resolver
            .resolve(&self.platform, algorithm_id, self.rig)
            .await
            .map_err(|source| CycleError::FetchMarket { source })?;
        outcome.market = Some(MarketQuote::new(market, algorithm.market_price.unit));

        // 3. Decide and apply
        let decision = self.policy.decide(current, market);
        outcome.decision = Some(decision);

        let price = match decision {
            PricingDecision::Hold => {
                outcome.action = CycleAction::Held;
                return Ok(());
            }
            PricingDecision::SetPrice(price) => price,
        };

        let applied = self
            .platform
            .update_rig_price(self.rig, price)
            .await
            .map_err(|source| CycleError::Update { price, source })?;
        if !applied {
            return Err(CycleError::UpdateRejected { price });
        }

        // The candidate branch only fires strictly above the floor.
        let reason = if price == self.policy.floor {
            PriceReason::Floor
        } else {
            PriceReason::Market
        };
        info!(rig = self.rig, price = %price, reason = ?reason, "Rig price updated");
        outcome.action = CycleAction::PriceChanged { price, reason };

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
