//! Fee schedule for randomness requests
//!
//! One request amortizes a single oracle round-trip across the whole batch,
//! so the schedule is a flat base fee plus a per-unit platform fee. The
//! total due is computed once, at commit time, from the live snapshot.

use serde::{Deserialize, Serialize};

use crate::config::FeeConfig;
use crate::error::{RandomnessError, ServiceResult};

/// Pure fee-quoting value object.
///
/// `quote` is deterministic in (`base_fee`, `unit_fee`, `quantity`) and
/// monotonically non-decreasing in `quantity`. Collecting payment and
/// refunding any excess is the caller's responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    base_fee: u64,
    unit_fee: u64,
}

impl FeeSchedule {
    pub fn new(base_fee: u64, unit_fee: u64) -> Self {
        Self { base_fee, unit_fee }
    }

    pub fn base_fee(&self) -> u64 {
        self.base_fee
    }

    pub fn unit_fee(&self) -> u64 {
        self.unit_fee
    }

    /// Total payment due for a batch of `quantity` units:
    /// `base_fee + unit_fee * quantity`.
    ///
    /// Rejects `quantity == 0`. Arithmetic is widened to u128 so the quote
    /// cannot overflow for any representable fee parameters.
    pub fn quote(&self, quantity: u32) -> ServiceResult<u128> {
        if quantity == 0 {
            return Err(RandomnessError::InvalidQuantity {
                quantity: 0,
                max: u32::MAX,
            });
        }

        Ok(self.base_fee as u128 + self.unit_fee as u128 * quantity as u128)
    }
}

impl From<&FeeConfig> for FeeSchedule {
    fn from(config: &FeeConfig) -> Self {
        Self::new(config.base_fee, config.unit_fee)
    }
}
