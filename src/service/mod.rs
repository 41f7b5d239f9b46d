//! The randomness service: authorization, commitment ledger, coordinator

pub mod coordinator;
pub mod ledger;
pub mod registry;

pub use coordinator::{FinalizedBatch, RandomnessService};
pub use ledger::{Commitment, RequestLedger, RequestStatus};
pub use registry::AuthorizationRegistry;
