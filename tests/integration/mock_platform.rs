//! Mock marketplace for integration testing.
//!
//! A deterministic `RentalPlatform` that keeps one rig and a ranked
//! listing in memory, applies price updates to its own state, and can be
//! told to fail on demand.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex};

use autoprice::platforms::RentalPlatform;
use autoprice::types::*;

pub const UNIT: &str = "BTC/Mh/day";
pub const ALGORITHM: AlgorithmId = 3;

/// Which call a forced error applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    GetRig,
    GetAlgorithm,
    ListRigs,
    Update,
    RejectUpdate,
}

struct State {
    rig: RigState,
    /// Competitors in ranking order; our own rig is inserted by price.
    competitors: Vec<RigListing>,
    submitted: Vec<Decimal>,
    fail_on: Option<FailOn>,
}

/// Cloneable handle; clones share state so tests can inspect it after
/// handing the platform to a scheduler.
#[derive(Clone)]
pub struct MockPlatform {
    state: Arc<Mutex<State>>,
}

impl MockPlatform {
    pub fn new(rig_id: RigId, price: Decimal, competitors: &[(RigId, Decimal)]) -> Self {
        let rig = RigState {
            id: rig_id,
            name: "mock-rig".to_string(),
            price: Price::new(price, UNIT),
            algorithm_id: ALGORITHM,
        };
        let competitors = competitors
            .iter()
            .map(|(id, p)| RigListing {
                id: *id,
                price: Price::new(*p, UNIT),
            })
            .collect();

        Self {
            state: Arc::new(Mutex::new(State {
                rig,
                competitors,
                submitted: Vec::new(),
                fail_on: None,
            })),
        }
    }

    pub fn fail_on(&self, call: FailOn) {
        self.state.lock().unwrap().fail_on = Some(call);
    }

    pub fn clear_error(&self) {
        self.state.lock().unwrap().fail_on = None;
    }

    pub fn set_competitors(&self, competitors: &[(RigId, Decimal)]) {
        self.state.lock().unwrap().competitors = competitors
            .iter()
            .map(|(id, p)| RigListing {
                id: *id,
                price: Price::new(*p, UNIT),
            })
            .collect();
    }

    pub fn current_price(&self) -> Decimal {
        self.state.lock().unwrap().rig.price.value
    }

    pub fn submitted(&self) -> Vec<Decimal> {
        self.state.lock().unwrap().submitted.clone()
    }

    fn check(&self, call: FailOn) -> Result<(), MarketplaceError> {
        if self.state.lock().unwrap().fail_on == Some(call) {
            return Err(MarketplaceError::Api {
                status: 503,
                message: format!("forced failure on {call:?}"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RentalPlatform for MockPlatform {
    async fn list_rigs(
        &self,
        algorithm: AlgorithmId,
        status: RigStatus,
        _page: u32,
    ) -> Result<Vec<RigListing>, MarketplaceError> {
        self.check(FailOn::ListRigs)?;
        assert_eq!(algorithm, ALGORITHM);
        assert_eq!(status, RigStatus::Available);

        let state = self.state.lock().unwrap();
        let own = RigListing {
            id: state.rig.id,
            price: state.rig.price.clone(),
        };
        let mut ranked = state.competitors.clone();
        let pos = ranked
            .iter()
            .position(|l| l.price.value > own.price.value)
            .unwrap_or(ranked.len());
        ranked.insert(pos, own);
        Ok(ranked)
    }

    async fn get_rig(&self, rig: RigId) -> Result<RigState, MarketplaceError> {
        self.check(FailOn::GetRig)?;
        let state = self.state.lock().unwrap();
        assert_eq!(rig, state.rig.id);
        Ok(state.rig.clone())
    }

    async fn get_algorithm(&self, algorithm: AlgorithmId) -> Result<Algorithm, MarketplaceError> {
        self.check(FailOn::GetAlgorithm)?;
        Ok(Algorithm {
            id: algorithm,
            name: "Scrypt".to_string(),
            market_price: Price::new(Decimal::ZERO, UNIT),
        })
    }

    async fn update_rig_price(&self, _rig: RigId, price: Decimal) -> Result<bool, MarketplaceError> {
        self.check(FailOn::Update)?;
        let mut state = self.state.lock().unwrap();
        state.submitted.push(price);
        if state.fail_on == Some(FailOn::RejectUpdate) {
            return Ok(false);
        }
        state.rig.price.value = price;
        Ok(true)
    }

    fn name(&self) -> &str {
        "mock"
    }
}
