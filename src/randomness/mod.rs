//! Outcome expansion and the oracle request/delivery boundary

pub mod expander;
pub mod oracle;

pub use expander::{Outcome, OutcomeExpander, RarityTable};
pub use oracle::{OracleError, RandomnessCoordinator, RandomnessDelivery, RequestParams};
