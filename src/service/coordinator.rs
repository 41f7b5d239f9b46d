//! The randomness service facade
//!
//! Ties the fee schedule, gas formula, authorization registry, commitment
//! ledger, and oracle boundary into the commit/deliver/finalize protocol
//! that Hero, Relic, DungeonMaster, and AltarOfAscension mint through.

use sha2::{Digest, Sha256};
use tracing::info;

use crate::config::ServiceConfig;
use crate::consumer::MintPayload;
use crate::error::{RandomnessError, ServiceResult};
use crate::events::{ServiceEvent, ServiceEventKind};
use crate::pricing::{FeeSchedule, GasFormula};
use crate::randomness::expander::{Outcome, OutcomeExpander, RarityTable};
use crate::randomness::oracle::{RandomnessCoordinator, RequestParams};
use crate::service::ledger::{Commitment, RequestLedger, RequestStatus};
use crate::service::registry::AuthorizationRegistry;
use crate::types::{Address, BlockHeight, RandomSeed, RequestId};

/// Domain-separation prefix for per-commitment salts.
const SALT_DOMAIN_PREFIX: &[u8] = b"seedforge:domain:v1";

/// Result of finalizing a fulfilled commitment: the derived outcomes, their
/// rarity tiers under the configured drop table, and the opaque payload the
/// consumer attached at commit time.
#[derive(Debug, Clone)]
pub struct FinalizedBatch {
    pub requester: Address,
    pub consumer: Address,
    pub request_id: RequestId,
    pub outcomes: Vec<Outcome>,
    pub tiers: Vec<u8>,
    pub payload: MintPayload,
}

/// The randomness request/fulfillment service.
///
/// Generic over the oracle submission transport; deliveries arrive through
/// [`on_randomness_delivered`](Self::on_randomness_delivered), usually via
/// the async delivery loop in [`crate::randomness::oracle`].
pub struct RandomnessService<C: RandomnessCoordinator> {
    owner: Address,
    config: ServiceConfig,
    fees: FeeSchedule,
    gas: GasFormula,
    rarity: RarityTable,
    registry: AuthorizationRegistry,
    ledger: RequestLedger,
    oracle: C,
    events: Vec<ServiceEvent>,
}

impl<C: RandomnessCoordinator> RandomnessService<C> {
    pub fn new(owner: Address, config: ServiceConfig, oracle: C) -> ServiceResult<Self> {
        if owner.is_zero() {
            return Err(RandomnessError::ZeroAddress {
                context: "service owner".to_string(),
            });
        }
        config.validate()?;

        let fees = FeeSchedule::from(&config.fees);
        let gas = GasFormula::from(&config.gas);
        let rarity = RarityTable::try_from(&config.rarity)?;

        Ok(Self {
            owner,
            config,
            fees,
            gas,
            rarity,
            registry: AuthorizationRegistry::new(),
            ledger: RequestLedger::new(),
            oracle,
            events: Vec::new(),
        })
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Borrow the oracle transport, e.g. for submission diagnostics.
    pub fn oracle(&self) -> &C {
        &self.oracle
    }

    pub fn is_authorized(&self, consumer: &Address) -> bool {
        self.registry.is_authorized(consumer)
    }

    /// Total payment due for a batch. Read-only; collecting the payment and
    /// refunding any excess is the consumer's responsibility.
    pub fn quote(&self, quantity: u32) -> ServiceResult<u128> {
        self.fees.quote(quantity)
    }

    /// Callback gas budget for a batch, or the rejection a commit of that
    /// size would get.
    pub fn estimate_callback_gas(&self, quantity: u32) -> ServiceResult<u64> {
        self.gas.estimate(quantity)
    }

    /// Commit a mint intent for `requester` on behalf of `consumer`.
    ///
    /// All checks (authorization, quantity bounds, single-flight, gas cap,
    /// payment) run before the oracle submission, and the commitment is
    /// only recorded once the oracle accepted the request, so a failure at
    /// any point leaves no partial state.
    pub fn commit_mint(
        &mut self,
        consumer: Address,
        requester: Address,
        quantity: u32,
        payment: u128,
        payload: MintPayload,
        current_block: BlockHeight,
    ) -> ServiceResult<RequestId> {
        if requester.is_zero() {
            return Err(RandomnessError::ZeroAddress {
                context: "requester".to_string(),
            });
        }

        if !self.registry.is_authorized(&consumer) {
            return Err(RandomnessError::Unauthorized {
                caller: consumer,
                operation: "commit_mint".to_string(),
            });
        }

        if quantity == 0 || quantity > self.config.limits.max_batch {
            return Err(RandomnessError::InvalidQuantity {
                quantity,
                max: self.config.limits.max_batch,
            });
        }

        self.ledger.ensure_empty(&requester)?;

        let callback_gas_limit = self.gas.estimate(quantity)?;

        let due = self.fees.quote(quantity)?;
        if payment < due {
            return Err(RandomnessError::InsufficientPayment {
                required: due,
                provided: payment,
            });
        }

        let request_id = self.oracle.submit_request(&RequestParams {
            callback_gas_limit,
            num_words: 1,
            confirmations: self.config.limits.request_confirmations,
        })?;

        let commitment = Commitment {
            requester,
            consumer,
            quantity,
            opened_at_block: current_block,
            request_id,
            fee_paid: payment,
            domain_salt: derive_domain_salt(&consumer, &requester, request_id),
            payload,
            seed: None,
        };
        self.ledger.open(commitment)?;

        info!(
            %requester,
            %consumer,
            %request_id,
            quantity,
            callback_gas_limit,
            fee = due,
            "commitment opened"
        );
        self.record(ServiceEventKind::CommitmentOpened {
            requester,
            consumer,
            request_id,
            quantity,
            fee_paid: payment,
            callback_gas_limit,
        });

        Ok(request_id)
    }

    /// Apply an oracle delivery. Rejections must be swallowed by the
    /// caller; they signal a replay, a spoof, or an already-reset
    /// commitment, none of which are fatal to the service.
    pub fn on_randomness_delivered(
        &mut self,
        request_id: RequestId,
        seed: RandomSeed,
    ) -> ServiceResult<Address> {
        let requester = self.ledger.apply_seed(request_id, seed)?;

        info!(%requester, %request_id, "commitment fulfilled");
        self.record(ServiceEventKind::RandomnessDelivered {
            requester,
            request_id,
        });

        Ok(requester)
    }

    /// Finalize a fulfilled commitment: derive the batch outcomes and clear
    /// the slot. Only the consumer that committed may finalize, and only
    /// once.
    pub fn finalize_mint(
        &mut self,
        consumer: Address,
        requester: Address,
    ) -> ServiceResult<FinalizedBatch> {
        let committed_consumer = self
            .ledger
            .get(&requester)
            .ok_or(RandomnessError::NoCommitment { requester })?
            .consumer;
        if committed_consumer != consumer {
            return Err(RandomnessError::Unauthorized {
                caller: consumer,
                operation: "finalize_mint".to_string(),
            });
        }

        let commitment = self.ledger.take_fulfilled(&requester)?;
        let seed = commitment.seed.ok_or(
            // take_fulfilled only returns fulfilled commitments.
            RandomnessError::NotFulfilled { requester },
        )?;

        let outcomes =
            OutcomeExpander::expand(&seed, commitment.quantity, &commitment.domain_salt);
        let tiers = outcomes.iter().map(|o| self.rarity.tier_for(o)).collect();

        info!(
            %requester,
            %consumer,
            request_id = %commitment.request_id,
            quantity = commitment.quantity,
            "mint finalized"
        );
        self.record(ServiceEventKind::MintFinalized {
            requester,
            consumer,
            request_id: commitment.request_id,
            quantity: commitment.quantity,
        });

        Ok(FinalizedBatch {
            requester,
            consumer,
            request_id: commitment.request_id,
            outcomes,
            tiers,
            payload: commitment.payload,
        })
    }

    /// Read-only commitment status for consumer UI and operator tooling.
    pub fn peek(&self, requester: &Address) -> RequestStatus {
        self.ledger.status(requester)
    }

    /// Pending commitments older than `max_blocks`, candidates for
    /// [`force_reset`](Self::force_reset).
    pub fn stale_pending(
        &self,
        current_block: BlockHeight,
        max_blocks: u64,
    ) -> Vec<(Address, RequestId, BlockHeight)> {
        self.ledger.stale_pending(current_block, max_blocks)
    }

    /// Authorize a consumer contract. Owner only.
    pub fn authorize_consumer(&mut self, caller: Address, consumer: Address) -> ServiceResult<()> {
        self.ensure_owner(caller, "authorize_consumer")?;
        if consumer.is_zero() {
            return Err(RandomnessError::ZeroAddress {
                context: "consumer".to_string(),
            });
        }

        if self.registry.authorize(consumer) {
            info!(%consumer, "consumer authorized");
            self.record(ServiceEventKind::ConsumerAuthorized { consumer });
        }
        Ok(())
    }

    /// Revoke a consumer contract. Owner only. In-flight commitments from
    /// the consumer stay finalizable; only new commits are blocked.
    pub fn revoke_consumer(&mut self, caller: Address, consumer: Address) -> ServiceResult<()> {
        self.ensure_owner(caller, "revoke_consumer")?;

        if self.registry.revoke(&consumer) {
            info!(%consumer, "consumer revoked");
            self.record(ServiceEventKind::ConsumerRevoked { consumer });
        }
        Ok(())
    }

    /// Replace the fee schedule. Owner only. Commitments already open keep
    /// the fee they were quoted; only future quotes change.
    pub fn set_fee_schedule(
        &mut self,
        caller: Address,
        base_fee: u64,
        unit_fee: u64,
    ) -> ServiceResult<()> {
        self.ensure_owner(caller, "set_fee_schedule")?;

        let mut next = self.config.bumped();
        next.fees.base_fee = base_fee;
        next.fees.unit_fee = unit_fee;
        next.validate()?;

        self.fees = FeeSchedule::from(&next.fees);
        let config_version = next.version;
        self.config = next;

        info!(base_fee, unit_fee, config_version, "fee schedule updated");
        self.record(ServiceEventKind::FeeScheduleUpdated {
            base_fee,
            unit_fee,
            config_version,
        });
        Ok(())
    }

    /// Replace the gas formula parameters. Owner only. The safety margin is
    /// kept; re-calibration changes the fit, not the tolerance.
    pub fn set_gas_formula(
        &mut self,
        caller: Address,
        fixed_overhead: u64,
        per_unit: u64,
        max_callback_gas: u64,
    ) -> ServiceResult<()> {
        self.ensure_owner(caller, "set_gas_formula")?;

        let mut next = self.config.bumped();
        next.gas.fixed_overhead = fixed_overhead;
        next.gas.per_unit = per_unit;
        next.gas.max_callback_gas = max_callback_gas;
        next.validate()?;

        self.gas = GasFormula::from(&next.gas);
        let config_version = next.version;
        self.config = next;

        info!(
            fixed_overhead,
            per_unit,
            max_callback_gas,
            config_version,
            "gas formula updated"
        );
        self.record(ServiceEventKind::GasFormulaUpdated {
            fixed_overhead,
            per_unit,
            max_callback_gas,
            config_version,
        });
        Ok(())
    }

    /// Force-clear a stuck commitment back to `Empty`. Owner only.
    ///
    /// Idempotent: resetting an `Empty` requester is a recorded no-op.
    /// Outcomes are never derived from the cleared commitment; its
    /// `fee_paid` is surfaced in the audit event so a refund ledger can be
    /// wired in. Returns the prior state.
    pub fn force_reset(
        &mut self,
        caller: Address,
        requester: Address,
    ) -> ServiceResult<RequestStatus> {
        self.ensure_owner(caller, "force_reset")?;

        let prior = self.ledger.status(&requester);
        let fee_paid = self
            .ledger
            .force_clear(&requester)
            .map(|c| c.fee_paid)
            .unwrap_or(0);

        info!(%requester, ?prior, fee_paid, "commitment force-cleared");
        self.record(ServiceEventKind::CommitmentForceCleared {
            requester,
            prior,
            fee_paid,
        });

        Ok(prior)
    }

    /// Audit events recorded so far.
    pub fn events(&self) -> &[ServiceEvent] {
        &self.events
    }

    /// Drain the audit buffer, e.g. after an operator flushed it to
    /// storage.
    pub fn drain_events(&mut self) -> Vec<ServiceEvent> {
        std::mem::take(&mut self.events)
    }

    fn ensure_owner(&self, caller: Address, operation: &str) -> ServiceResult<()> {
        if caller != self.owner {
            return Err(RandomnessError::Unauthorized {
                caller,
                operation: operation.to_string(),
            });
        }
        Ok(())
    }

    fn record(&mut self, kind: ServiceEventKind) {
        self.events.push(ServiceEvent::new(kind));
    }
}

/// Salt binding outcome derivation to one consumer, requester, and request.
fn derive_domain_salt(consumer: &Address, requester: &Address, request_id: RequestId) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(SALT_DOMAIN_PREFIX);
    hasher.update(consumer.as_bytes());
    hasher.update(requester.as_bytes());
    hasher.update(request_id.0.to_le_bytes());
    hasher.finalize().into()
}
