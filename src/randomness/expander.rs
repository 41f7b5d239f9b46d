//! Batch outcome derivation from a single verified random word
//!
//! One oracle round-trip is amortized across an entire mint batch: each of
//! the up-to-100 outcomes is an independent one-way hash of
//! `(seed, index, domain salt)`. The seed is never reused directly and a
//! single digest is never sliced into multiple draws, so outcomes in a
//! batch are uncorrelated. Expansion is pure, which is what lets a crashed
//! finalizer re-derive byte-identical outcomes.

use sha2::{Digest, Sha256};

use crate::config::RarityConfig;
use crate::error::{RandomnessError, ServiceResult};
use crate::types::RandomSeed;

/// Domain-separation prefix baked into every outcome digest. Versioned so a
/// future change of the derivation scheme cannot silently collide with
/// historical outcomes.
const OUTCOME_DOMAIN_PREFIX: &[u8] = b"seedforge:outcome:v1";

/// One attribute-grade draw derived from the batch seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome([u8; 32]);

impl Outcome {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Uniform u64 view of the draw (first eight digest bytes, big endian).
    pub fn to_u64(&self) -> u64 {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&self.0[..8]);
        u64::from_be_bytes(buf)
    }

    /// Uniform draw in `[0, modulus)`. The modulo bias over a 64-bit range
    /// is negligible for any game-sized modulus.
    pub fn roll(&self, modulus: u64) -> u64 {
        debug_assert!(modulus > 0);
        self.to_u64() % modulus
    }
}

/// Pure expander: `(seed, index, salt) -> outcome`.
pub struct OutcomeExpander;

impl OutcomeExpander {
    /// Derive the outcome at `index` for the given seed and domain salt.
    pub fn derive_one(seed: &RandomSeed, index: u32, domain_salt: &[u8]) -> Outcome {
        let mut hasher = Sha256::new();
        hasher.update(OUTCOME_DOMAIN_PREFIX);
        hasher.update(seed.as_bytes());
        hasher.update(index.to_le_bytes());
        hasher.update(domain_salt);
        Outcome(hasher.finalize().into())
    }

    /// Expand `quantity` independent outcomes from one verified seed.
    ///
    /// Deterministic: identical inputs yield byte-identical arrays, and
    /// expansions of different quantities over the same seed and salt agree
    /// on their common prefix because the index is the only varying input.
    pub fn expand(seed: &RandomSeed, quantity: u32, domain_salt: &[u8]) -> Vec<Outcome> {
        (0..quantity)
            .map(|index| Self::derive_one(seed, index, domain_salt))
            .collect()
    }
}

/// Weighted rarity tiers, consumed as configuration data.
///
/// Drop-rate balancing itself is out of scope; this only maps a uniform
/// draw onto whatever weights the operators configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RarityTable {
    weights: Vec<u64>,
    total: u64,
}

impl RarityTable {
    pub fn new(weights: Vec<u64>) -> ServiceResult<Self> {
        let total: u64 = weights.iter().sum();
        if weights.is_empty() || total == 0 {
            return Err(RandomnessError::Configuration {
                message: "Rarity table needs at least one non-zero weight".to_string(),
                field: "rarity.weights".to_string(),
            });
        }
        Ok(Self { weights, total })
    }

    pub fn tier_count(&self) -> u8 {
        self.weights.len() as u8
    }

    /// Map an outcome to a 1-based rarity tier via cumulative weights.
    pub fn tier_for(&self, outcome: &Outcome) -> u8 {
        let draw = outcome.roll(self.total);
        let mut cumulative = 0u64;
        for (tier_index, weight) in self.weights.iter().enumerate() {
            cumulative += weight;
            if draw < cumulative {
                return tier_index as u8 + 1;
            }
        }
        // Unreachable: draw < total == sum(weights).
        self.weights.len() as u8
    }
}

impl TryFrom<&RarityConfig> for RarityTable {
    type Error = RandomnessError;

    fn try_from(config: &RarityConfig) -> ServiceResult<Self> {
        Self::new(config.weights.clone())
    }
}
