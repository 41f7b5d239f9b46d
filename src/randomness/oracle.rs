//! The oracle request/callback boundary
//!
//! The service only consumes the oracle's request-submission interface and
//! implements its callback-delivery side. Deliveries arrive out of band as
//! messages on a channel: untrusted, possibly delayed, possibly duplicated.
//! Proof generation and subscription billing stay on the oracle's side of
//! this boundary.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tracing::{info, warn};

use crate::service::RandomnessService;
use crate::types::{RandomSeed, RequestId};

/// Parameters for one randomness request submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestParams {
    /// Gas reserved for the fulfillment callback; paid for at request time.
    pub callback_gas_limit: u64,
    /// Random words requested. Always 1: the expander derives the batch.
    pub num_words: u32,
    /// Block confirmations the oracle waits for before delivering.
    pub confirmations: u16,
}

/// Errors from the oracle submission boundary.
///
/// The subscription balance is a shared external resource this service does
/// not own; a commit that passes every local check must still fail cleanly
/// when the oracle rejects the submission.
#[derive(Debug, Clone, Error)]
pub enum OracleError {
    #[error("oracle rejected submission: {message}")]
    SubmissionRejected { message: String },

    #[error("oracle subscription balance exhausted")]
    SubscriptionExhausted,
}

/// Request-submission side of the oracle network.
///
/// Implementations wrap whatever transport reaches the coordinator
/// contract; the service never assumes anything beyond "submit now, seed
/// arrives later, maybe".
pub trait RandomnessCoordinator: Send {
    /// Submit a request, returning the oracle-assigned correlation id.
    fn submit_request(&mut self, params: &RequestParams) -> Result<RequestId, OracleError>;
}

/// One inbound fulfillment message from the oracle network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomnessDelivery {
    pub request_id: RequestId,
    pub seed: RandomSeed,
}

/// Consume oracle deliveries until the channel closes.
///
/// A malformed, duplicated, or unknown delivery is refused and logged; it
/// must never propagate an error that could strand the oracle's own
/// bookkeeping, so every rejection is swallowed here.
pub async fn run_delivery_loop<C>(
    service: Arc<Mutex<RandomnessService<C>>>,
    mut deliveries: mpsc::Receiver<RandomnessDelivery>,
) where
    C: RandomnessCoordinator,
{
    while let Some(delivery) = deliveries.recv().await {
        let mut service = service.lock().await;
        match service.on_randomness_delivered(delivery.request_id, delivery.seed) {
            Ok(requester) => {
                info!(
                    request_id = %delivery.request_id,
                    %requester,
                    "randomness delivered"
                );
            }
            Err(err) => {
                warn!(
                    request_id = %delivery.request_id,
                    error = %err,
                    "refused oracle delivery"
                );
            }
        }
    }
}
