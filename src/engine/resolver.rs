//! Market price resolution.
//!
//! Picks the competing price our rig is measured against: the first
//! available rig in the marketplace ranking that isn't ours.

use rust_decimal::Decimal;
use tracing::debug;

use crate::platforms::RentalPlatform;
use crate::types::{AlgorithmId, MarketplaceError, RigId, RigListing, RigStatus};

/// Only the first page of the ranking is considered.
const LISTING_PAGE: u32 = 1;

#[derive(Debug, Clone, Copy, Default)]
pub struct MarketPriceResolver;

impl MarketPriceResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve the lowest competing price for `algorithm`.
    ///
    /// Returns zero when there is no listing other than `own_rig`.
    /// Transport and API errors are passed through untouched.
    pub async fn resolve<P: RentalPlatform + ?Sized>(
        &self,
        platform: &P,
        algorithm: AlgorithmId,
        own_rig: RigId,
    ) -> Result<Decimal, MarketplaceError> {
        let listings = platform
            .list_rigs(algorithm, RigStatus::Available, LISTING_PAGE)
            .await?;

        let price = first_competitor_price(&listings, own_rig);
        debug!(
            algorithm,
            listings = listings.len(),
            price = %price,
            "Market price resolved"
        );
        Ok(price)
    }
}

/// Price of the first listing not belonging to `own_rig`, or zero.
///
/// Our own listing must never become the reference, or a rig sitting at
/// the top of the ranking could only ever follow itself down.
pub fn first_competitor_price(listings: &[RigListing], own_rig: RigId) -> Decimal {
    listings
        .iter()
        .find(|l| l.id != own_rig)
        .map(|l| l.price.value)
        .unwrap_or(Decimal::ZERO)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
