//! Platform integrations.
//!
//! Defines the `RentalPlatform` trait and provides the Betarigs
//! implementation used by the repricing loop.

pub mod betarigs;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::types::{Algorithm, AlgorithmId, MarketplaceError, RigId, RigListing, RigState, RigStatus};

/// Abstraction over a hashing-power rental marketplace.
///
/// Implementors provide rig lookups, ranked listings per algorithm and
/// price updates. Errors are returned as-is; callers decide whether to retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RentalPlatform: Send + Sync {
    /// List rigs for an algorithm in marketplace ranking order (cheapest first).
    async fn list_rigs(
        &self,
        algorithm: AlgorithmId,
        status: RigStatus,
        page: u32,
    ) -> Result<Vec<RigListing>, MarketplaceError>;

    /// Fetch a single rig by id.
    async fn get_rig(&self, rig: RigId) -> Result<RigState, MarketplaceError>;

    /// Fetch an algorithm by id.
    async fn get_algorithm(&self, algorithm: AlgorithmId) -> Result<Algorithm, MarketplaceError>;

    /// Submit a new price per speed unit for a rig.
    ///
    /// `Ok(false)` means the marketplace answered but did not apply the change.
    async fn update_rig_price(&self, rig: RigId, price: Decimal) -> Result<bool, MarketplaceError>;

    /// Platform name for logging and identification.
    fn name(&self) -> &str;
}
