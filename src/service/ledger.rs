//! Per-requester commitment ledger
//!
//! State machine per requester: `Empty -> Pending -> Fulfilled -> Empty`,
//! with an admin-only escape from any open state back to `Empty`. At most
//! one open-and-unfulfilled commitment exists per requester at a time; a
//! commit on top of an open one is a hard rejection, never an overwrite.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::consumer::MintPayload;
use crate::error::{RandomnessError, ServiceResult};
use crate::types::{Address, BlockHeight, RandomSeed, RequestId};

/// One open randomness commitment.
///
/// Created on commit, mutated exactly once on fulfillment (the seed is
/// written), and destroyed on finalize or admin reset. Never mutated after
/// finalize because finalize removes it.
#[derive(Debug, Clone)]
pub struct Commitment {
    pub requester: Address,
    /// The consumer contract that committed on the requester's behalf and
    /// is the only caller allowed to finalize.
    pub consumer: Address,
    pub quantity: u32,
    /// Height at submission; staleness diagnostics only, there is no
    /// automatic timeout because oracle delivery latency is unbounded.
    pub opened_at_block: BlockHeight,
    pub request_id: RequestId,
    /// Payment collected at commit time, surfaced on reset so a refund
    /// ledger can be wired in.
    pub fee_paid: u128,
    /// Salt binding outcome derivation to this consumer and request.
    pub domain_salt: [u8; 32],
    /// Consumer-specific payload carried opaquely between commit and
    /// finalize.
    pub payload: MintPayload,
    /// The verified random word; present exactly when fulfilled.
    pub seed: Option<RandomSeed>,
}

impl Commitment {
    pub fn is_fulfilled(&self) -> bool {
        self.seed.is_some()
    }

    pub fn status(&self) -> RequestStatus {
        if self.is_fulfilled() {
            RequestStatus::Ready {
                request_id: self.request_id,
                quantity: self.quantity,
            }
        } else {
            RequestStatus::Pending {
                request_id: self.request_id,
                quantity: self.quantity,
                opened_at_block: self.opened_at_block,
            }
        }
    }
}

/// Read-only commitment status, as surfaced by `peek`.
///
/// "Stuck" is an operational judgement layered on `Pending` by comparing
/// `opened_at_block` against the current height; it is not a ledger state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RequestStatus {
    Empty,
    Pending {
        request_id: RequestId,
        quantity: u32,
        opened_at_block: BlockHeight,
    },
    Ready {
        request_id: RequestId,
        quantity: u32,
    },
}

impl RequestStatus {
    pub fn is_empty(&self) -> bool {
        matches!(self, RequestStatus::Empty)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, RequestStatus::Pending { .. })
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, RequestStatus::Ready { .. })
    }
}

/// Ledger of open commitments, keyed per requester with a request-id index
/// for callback correlation. No cross-requester mutation exists.
#[derive(Debug, Default)]
pub struct RequestLedger {
    commitments: HashMap<Address, Commitment>,
    requester_by_id: HashMap<RequestId, Address>,
}

impl RequestLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject unless the requester's slot is `Empty`. Used by commit before
    /// any payment or oracle submission happens.
    pub fn ensure_empty(&self, requester: &Address) -> ServiceResult<()> {
        if self.commitments.contains_key(requester) {
            return Err(RandomnessError::DuplicateRequest {
                requester: *requester,
            });
        }
        Ok(())
    }

    /// Open a commitment in `Pending`.
    pub fn open(&mut self, commitment: Commitment) -> ServiceResult<()> {
        self.ensure_empty(&commitment.requester)?;
        self.requester_by_id
            .insert(commitment.request_id, commitment.requester);
        self.commitments.insert(commitment.requester, commitment);
        Ok(())
    }

    /// Apply an oracle delivery: `Pending -> Fulfilled`, exactly once.
    ///
    /// An unknown id, a replayed id, or an id pointing at an already
    /// fulfilled commitment is rejected; nothing is ever double-applied.
    pub fn apply_seed(&mut self, request_id: RequestId, seed: RandomSeed) -> ServiceResult<Address> {
        let requester = *self
            .requester_by_id
            .get(&request_id)
            .ok_or(RandomnessError::UnknownCallback { request_id })?;

        let commitment = self.commitments.get_mut(&requester).ok_or(
            // Index said yes but the slot is gone; treat as unknown.
            RandomnessError::UnknownCallback { request_id },
        )?;

        if commitment.request_id != request_id {
            return Err(RandomnessError::MismatchedCallback {
                request_id,
                message: format!(
                    "commitment for {} tracks request {}",
                    requester, commitment.request_id
                ),
            });
        }

        if commitment.is_fulfilled() {
            return Err(RandomnessError::MismatchedCallback {
                request_id,
                message: "seed already applied".to_string(),
            });
        }

        commitment.seed = Some(seed);
        Ok(requester)
    }

    /// Remove and return a fulfilled commitment: `Fulfilled -> Empty`.
    pub fn take_fulfilled(&mut self, requester: &Address) -> ServiceResult<Commitment> {
        match self.commitments.entry(*requester) {
            Entry::Vacant(_) => Err(RandomnessError::NoCommitment {
                requester: *requester,
            }),
            Entry::Occupied(entry) => {
                if !entry.get().is_fulfilled() {
                    return Err(RandomnessError::NotFulfilled {
                        requester: *requester,
                    });
                }
                let commitment = entry.remove();
                self.requester_by_id.remove(&commitment.request_id);
                Ok(commitment)
            }
        }
    }

    /// Clear a commitment regardless of state. Returns the removed record,
    /// or `None` when the slot was already `Empty`.
    pub fn force_clear(&mut self, requester: &Address) -> Option<Commitment> {
        let commitment = self.commitments.remove(requester)?;
        self.requester_by_id.remove(&commitment.request_id);
        Some(commitment)
    }

    /// Borrow the open commitment for a requester, if any.
    pub fn get(&self, requester: &Address) -> Option<&Commitment> {
        self.commitments.get(requester)
    }

    /// Read-only status for a requester. Never mutates.
    pub fn status(&self, requester: &Address) -> RequestStatus {
        self.commitments
            .get(requester)
            .map(Commitment::status)
            .unwrap_or(RequestStatus::Empty)
    }

    pub fn open_count(&self) -> usize {
        self.commitments.len()
    }

    /// Requesters whose commitment has been pending for more than
    /// `max_blocks` at `current_block`. Operator stuck-detection.
    pub fn stale_pending(
        &self,
        current_block: BlockHeight,
        max_blocks: u64,
    ) -> Vec<(Address, RequestId, BlockHeight)> {
        self.commitments
            .values()
            .filter(|c| !c.is_fulfilled())
            .filter(|c| current_block.saturating_sub(c.opened_at_block) > max_blocks)
            .map(|c| (c.requester, c.request_id, c.opened_at_block))
            .collect()
    }
}
