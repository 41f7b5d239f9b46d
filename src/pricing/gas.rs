//! Callback gas budgeting
//!
//! The oracle callback is paid for at request time, so its gas budget must
//! be estimated up front. Under-budgeting makes the callback revert
//! out-of-gas with the fee already spent and the commitment stuck in
//! `Pending`, the single most consequential failure mode of this service.
//! Estimates therefore carry a safety margin, and any batch whose estimate
//! exceeds the oracle's callback cap is rejected outright, never truncated.

use serde::{Deserialize, Serialize};

use crate::config::GasConfig;
use crate::error::{RandomnessError, ServiceResult};

/// Affine gas model for the fulfillment callback.
///
/// Per-callback cost is not purely linear in batch size: fixed overhead
/// (verification, dispatch, storage of the seed) is amortized across the
/// batch, which is why a single-unit request costs materially more per unit
/// than a batched one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasFormula {
    fixed_overhead: u64,
    per_unit: u64,
    safety_margin_percent: u64,
    max_callback_gas: u64,
}

impl GasFormula {
    pub fn new(
        fixed_overhead: u64,
        per_unit: u64,
        safety_margin_percent: u64,
        max_callback_gas: u64,
    ) -> Self {
        Self {
            fixed_overhead,
            per_unit,
            safety_margin_percent,
            max_callback_gas,
        }
    }

    /// Fit a formula to two measured (quantity, gas) points.
    ///
    /// The split between fixed overhead and per-unit cost is a best-fit
    /// estimate, not a verified decomposition; re-calibrate against fresh
    /// measurements before relying on it in production.
    pub fn calibrate(
        low: (u32, u64),
        high: (u32, u64),
        safety_margin_percent: u64,
        max_callback_gas: u64,
    ) -> ServiceResult<Self> {
        let (q_low, gas_low) = low;
        let (q_high, gas_high) = high;

        if q_low == 0 || q_high <= q_low || gas_high <= gas_low {
            return Err(RandomnessError::Configuration {
                message: format!(
                    "Calibration points must be increasing: ({}, {}) and ({}, {})",
                    q_low, gas_low, q_high, gas_high
                ),
                field: "gas.calibration".to_string(),
            });
        }

        let per_unit = (gas_high - gas_low) / (q_high - q_low) as u64;
        let fixed_overhead = gas_low.saturating_sub(per_unit * q_low as u64);

        Ok(Self::new(
            fixed_overhead,
            per_unit,
            safety_margin_percent,
            max_callback_gas,
        ))
    }

    pub fn fixed_overhead(&self) -> u64 {
        self.fixed_overhead
    }

    pub fn per_unit(&self) -> u64 {
        self.per_unit
    }

    pub fn max_callback_gas(&self) -> u64 {
        self.max_callback_gas
    }

    /// The raw affine estimate, before the safety margin.
    pub fn raw_estimate(&self, quantity: u32) -> u64 {
        self.fixed_overhead
            .saturating_add(self.per_unit.saturating_mul(quantity as u64))
    }

    /// Budget for a batch of `quantity` units, with the safety margin
    /// applied. Monotonic in `quantity`. Fails with `GasBudgetExceeded`
    /// when the margined estimate would not fit under the callback cap.
    pub fn estimate(&self, quantity: u32) -> ServiceResult<u64> {
        if quantity == 0 {
            return Err(RandomnessError::InvalidQuantity {
                quantity: 0,
                max: u32::MAX,
            });
        }

        let raw = self.raw_estimate(quantity) as u128;
        let budget = raw * (100 + self.safety_margin_percent) as u128 / 100;
        let budget = u64::try_from(budget).unwrap_or(u64::MAX);

        if budget > self.max_callback_gas {
            return Err(RandomnessError::GasBudgetExceeded {
                quantity,
                estimated: budget,
                cap: self.max_callback_gas,
            });
        }

        Ok(budget)
    }

    /// Largest batch size the cap admits under this formula, or `None` when
    /// not even a single unit fits.
    pub fn max_quantity(&self, hard_limit: u32) -> Option<u32> {
        (1..=hard_limit).rev().find(|&q| self.estimate(q).is_ok())
    }
}

impl From<&GasConfig> for GasFormula {
    fn from(config: &GasConfig) -> Self {
        Self::new(
            config.fixed_overhead,
            config.per_unit,
            config.safety_margin_percent,
            config.max_callback_gas,
        )
    }
}
