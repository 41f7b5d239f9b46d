//! Configuration management for the seedforge randomness service
//!
//! All mutable service parameters (fees, gas formula, batch limits, drop
//! weights) live in one versioned [`ServiceConfig`] owned by the service
//! admin. Every other component reads a snapshot of it; nothing is ambient
//! or static.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::RandomnessError;

/// Fee parameters for randomness requests, in native-currency smallest units.
///
/// The quoted total for a batch is `base_fee + unit_fee * quantity`. This is
/// the single source of truth for fee computation; consumers must not derive
/// their own totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeConfig {
    /// Flat fee per request, independent of batch size.
    pub base_fee: u64,
    /// Platform fee charged per unit in the batch.
    pub unit_fee: u64,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            base_fee: 3_000_000_000_000_000, // 0.003 native
            unit_fee: 500_000_000_000_000,   // 0.0005 native per unit
        }
    }
}

/// Callback gas formula parameters.
///
/// The budget for a batch of `q` units is
/// `(fixed_overhead + q * per_unit) * (100 + safety_margin_percent) / 100`,
/// hard-rejected when it exceeds `max_callback_gas`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasConfig {
    /// Fixed callback overhead, amortized across the batch.
    pub fixed_overhead: u64,
    /// Marginal gas cost per minted unit.
    pub per_unit: u64,
    /// Safety margin applied on top of the raw estimate, in percent.
    pub safety_margin_percent: u64,
    /// The oracle's protocol-wide maximum callback gas.
    pub max_callback_gas: u64,
}

impl Default for GasConfig {
    fn default() -> Self {
        // Fit to the two production measurements: a single-unit batch at
        // 197,492 gas and a five-unit batch at 343,518 gas.
        Self {
            fixed_overhead: 160_985,
            per_unit: 36_507,
            safety_margin_percent: 20,
            max_callback_gas: 2_500_000,
        }
    }
}

/// Request shape limits and oracle submission parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Maximum units per batch. The gas cap usually binds first.
    pub max_batch: u32,
    /// Block confirmations the oracle waits for before delivering.
    pub request_confirmations: u16,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_batch: 100,
            request_confirmations: 3,
        }
    }
}

/// Drop-rate weights consumed by the outcome expander when mapping a raw
/// draw to a rarity tier. Index 0 is tier 1 (most common).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RarityConfig {
    pub weights: Vec<u64>,
}

impl Default for RarityConfig {
    fn default() -> Self {
        Self {
            // Common, Uncommon, Rare, Epic, Legendary
            weights: vec![44, 35, 15, 5, 1],
        }
    }
}

/// Versioned configuration for the randomness service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Bumped on every admin mutation, so operators can correlate a quoted
    /// fee or gas budget with the parameter snapshot that produced it.
    pub version: u32,
    pub fees: FeeConfig,
    pub gas: GasConfig,
    pub limits: LimitsConfig,
    pub rarity: RarityConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            version: 1,
            fees: FeeConfig::default(),
            gas: GasConfig::default(),
            limits: LimitsConfig::default(),
            rarity: RarityConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RandomnessError> {
        let content = fs::read_to_string(path).map_err(|e| RandomnessError::Configuration {
            message: format!("Failed to read config file: {}", e),
            field: "config_file".to_string(),
        })?;

        let config: ServiceConfig =
            toml::from_str(&content).map_err(|e| RandomnessError::Configuration {
                message: format!("Failed to parse config file: {}", e),
                field: "config_format".to_string(),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), RandomnessError> {
        let content = toml::to_string_pretty(self).map_err(|e| RandomnessError::Configuration {
            message: format!("Failed to serialize config: {}", e),
            field: "config_serialization".to_string(),
        })?;

        fs::write(path, content).map_err(|e| RandomnessError::Configuration {
            message: format!("Failed to write config file: {}", e),
            field: "config_write".to_string(),
        })?;

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), RandomnessError> {
        if self.limits.max_batch == 0 {
            return Err(RandomnessError::Configuration {
                message: "Max batch size must be at least 1".to_string(),
                field: "limits.max_batch".to_string(),
            });
        }

        if self.gas.per_unit == 0 {
            return Err(RandomnessError::Configuration {
                message: "Per-unit gas cost must be greater than 0".to_string(),
                field: "gas.per_unit".to_string(),
            });
        }

        if self.gas.safety_margin_percent > 100 {
            return Err(RandomnessError::Configuration {
                message: "Safety margin above 100% wastes subscription budget".to_string(),
                field: "gas.safety_margin_percent".to_string(),
            });
        }

        // A single-unit request must always fit under the callback cap,
        // otherwise no commit can ever succeed.
        let single = self
            .gas
            .fixed_overhead
            .saturating_add(self.gas.per_unit)
            .saturating_mul(100 + self.gas.safety_margin_percent)
            / 100;
        if single > self.gas.max_callback_gas {
            return Err(RandomnessError::Configuration {
                message: format!(
                    "Single-unit gas estimate {} exceeds callback cap {}",
                    single, self.gas.max_callback_gas
                ),
                field: "gas.max_callback_gas".to_string(),
            });
        }

        if self.rarity.weights.is_empty() {
            return Err(RandomnessError::Configuration {
                message: "Rarity table needs at least one tier".to_string(),
                field: "rarity.weights".to_string(),
            });
        }

        if self.rarity.weights.iter().sum::<u64>() == 0 {
            return Err(RandomnessError::Configuration {
                message: "Rarity weights must not all be zero".to_string(),
                field: "rarity.weights".to_string(),
            });
        }

        Ok(())
    }

    /// Create a production-ready configuration
    pub fn production() -> Self {
        Self {
            version: 1,
            fees: FeeConfig::default(),
            gas: GasConfig {
                // Wider margin in production to survive network-condition
                // variance between estimation and callback execution.
                safety_margin_percent: 30,
                ..GasConfig::default()
            },
            limits: LimitsConfig {
                max_batch: 50,
                request_confirmations: 6,
            },
            rarity: RarityConfig::default(),
        }
    }

    /// Create a development configuration with relaxed settings
    pub fn development() -> Self {
        Self {
            version: 1,
            fees: FeeConfig {
                base_fee: 1_000,
                unit_fee: 100,
            },
            gas: GasConfig {
                safety_margin_percent: 15,
                ..GasConfig::default()
            },
            limits: LimitsConfig {
                max_batch: 100,
                request_confirmations: 1,
            },
            rarity: RarityConfig::default(),
        }
    }

    /// Return a copy with the version bumped, for admin mutations.
    pub fn bumped(&self) -> Self {
        let mut next = self.clone();
        next.version += 1;
        next
    }
}
