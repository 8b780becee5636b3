//! Claim packet assembly

use chrono::{DateTime, Utc};

use core_kernel::Money;

use crate::error::ProofError;
use crate::form::ProofOfLossForm;
use crate::ports::{CatalogAsset, LossEventContext};

/// The submission bundle: form, loss event, and documented assets
///
/// Assembled once at submission time from the current state of the
/// inventory. It is a snapshot, not a stored relation; assets added
/// after submission do not appear in it.
#[derive(Debug, Clone)]
pub struct ClaimPacket {
    /// The stored form, as persisted
    pub form: ProofOfLossForm,
    /// The loss event being claimed against
    pub event: LossEventContext,
    /// Documented assets for the event's property at submission time
    pub assets: Vec<CatalogAsset>,
    /// Sum of the assets' estimated values, when any are valued
    pub total_documented_value: Option<Money>,
    /// When the packet was assembled
    pub assembled_at: DateTime<Utc>,
}

impl ClaimPacket {
    /// Assembles the packet and totals the documented values
    ///
    /// Fails only when asset values mix currencies, which indicates
    /// corrupted inventory data rather than user error.
    pub fn assemble(
        form: ProofOfLossForm,
        event: LossEventContext,
        assets: Vec<CatalogAsset>,
    ) -> Result<Self, ProofError> {
        let values: Vec<Money> = assets
            .iter()
            .filter_map(|a| a.estimated_value)
            .collect();

        let total_documented_value = match values.first() {
            Some(first) => Some(Money::sum(first.currency(), &values)?),
            None => None,
        };

        Ok(Self {
            form,
            event,
            assets,
            total_documented_value,
            assembled_at: Utc::now(),
        })
    }

    /// Number of documented assets in the packet
    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }

    /// Number of photo references across all assets
    pub fn photo_count(&self) -> usize {
        self.assets.iter().map(|a| a.photos.len()).sum()
    }
}
