//! Seedforge - Randomness commitment and batch outcome derivation for an
//! on-chain dungeon crawler
//!
//! Seedforge backs NFT minting and ascension through:
//! - Per-requester randomness commitments with a single-flight guarantee
//! - Batch expansion of one verified oracle seed into up to 100 outcomes
//! - Up-front fee quoting and callback gas budgeting against the oracle cap
//! - Owner-gated consumer authorization and stuck-commitment recovery

pub mod config;
pub mod consumer;
pub mod error;
pub mod events;
pub mod pricing;
pub mod randomness;
pub mod service;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{RandomnessError, ServiceResult};

// Re-export core identity types
pub use types::{Address, BlockHeight, RandomSeed, RequestId};

// Re-export service surface
pub use service::{
    AuthorizationRegistry, Commitment, FinalizedBatch, RandomnessService, RequestLedger,
    RequestStatus,
};

// Re-export pricing and expansion primitives
pub use pricing::{FeeSchedule, GasFormula};
pub use randomness::{Outcome, OutcomeExpander, RarityTable};

// Re-export the oracle boundary
pub use randomness::{OracleError, RandomnessCoordinator, RandomnessDelivery, RequestParams};

// Re-export consumer interfaces
pub use consumer::{Consumer, ConsumerRouter, MintPayload};

// Re-export configuration interfaces
pub use config::{FeeConfig, GasConfig, LimitsConfig, RarityConfig, ServiceConfig};

// Re-export audit events
pub use events::{ServiceEvent, ServiceEventKind};
