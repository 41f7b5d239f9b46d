//! Consumer-side interfaces
//!
//! Hero, Relic, DungeonMaster, and AltarOfAscension all mint through the
//! same service. They are modeled as a capability trait plus the allow-list
//! in [`crate::service::AuthorizationRegistry`]; the service never learns
//! concrete consumer types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{RandomnessError, ServiceResult};
use crate::randomness::oracle::RandomnessCoordinator;
use crate::service::coordinator::{FinalizedBatch, RandomnessService};
use crate::types::Address;

/// Consumer-specific payload carried opaquely by the ledger between commit
/// and finalize. The service stores and returns it without interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintPayload {
    /// Token ids reserved for the batch, assigned at commit time.
    pub pending_token_ids: Vec<u64>,
    /// Ascension paths cap the reachable rarity; minting leaves this unset.
    pub max_rarity_hint: Option<u8>,
    /// Free-form consumer extension data.
    pub extra: serde_json::Value,
}

impl Default for MintPayload {
    fn default() -> Self {
        Self {
            pending_token_ids: Vec::new(),
            max_rarity_hint: None,
            extra: serde_json::Value::Null,
        }
    }
}

/// A contract that commits mint intents and receives finalized outcomes.
pub trait Consumer: Send {
    /// The on-chain identity checked against the authorization registry.
    fn address(&self) -> Address;

    /// Hand over a finalized batch, e.g. to assign NFT attributes.
    fn accept_outcomes(&mut self, batch: &FinalizedBatch) -> ServiceResult<()>;
}

/// Dispatches finalized batches to their owning consumers.
#[derive(Default)]
pub struct ConsumerRouter {
    consumers: HashMap<Address, Box<dyn Consumer>>,
}

impl ConsumerRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, consumer: Box<dyn Consumer>) {
        self.consumers.insert(consumer.address(), consumer);
    }

    pub fn is_registered(&self, consumer: &Address) -> bool {
        self.consumers.contains_key(consumer)
    }

    /// Finalize `requester`'s commitment on the service and route the
    /// outcomes to the registered consumer.
    pub fn finalize_via<C: RandomnessCoordinator>(
        &mut self,
        service: &mut RandomnessService<C>,
        consumer: Address,
        requester: Address,
    ) -> ServiceResult<()> {
        let handler =
            self.consumers
                .get_mut(&consumer)
                .ok_or_else(|| RandomnessError::Unauthorized {
                    caller: consumer,
                    operation: "finalize_via".to_string(),
                })?;

        let batch = service.finalize_mint(consumer, requester)?;
        handler.accept_outcomes(&batch)
    }
}
