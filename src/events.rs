//! Auditable service events
//!
//! Every state mutation of the service produces a serializable event record
//! with a correlation id and timestamp, mirroring what an on-chain
//! deployment would emit as logs. Operators replay these to reconstruct how
//! a commitment got stuck and what an admin did about it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::service::ledger::RequestStatus;
use crate::types::{Address, RequestId};

/// One audit record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceEvent {
    /// Correlation id for tracking this event through operator tooling.
    pub event_id: String,
    pub at: DateTime<Utc>,
    pub kind: ServiceEventKind,
}

impl ServiceEvent {
    pub fn new(kind: ServiceEventKind) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            at: Utc::now(),
            kind,
        }
    }
}

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ServiceEventKind {
    CommitmentOpened {
        requester: Address,
        consumer: Address,
        request_id: RequestId,
        quantity: u32,
        fee_paid: u128,
        callback_gas_limit: u64,
    },
    RandomnessDelivered {
        requester: Address,
        request_id: RequestId,
    },
    MintFinalized {
        requester: Address,
        consumer: Address,
        request_id: RequestId,
        quantity: u32,
    },
    /// Admin escape hatch fired; carries the state it cleared so incident
    /// reviews can tell a stuck-pending reset from a misfired one.
    CommitmentForceCleared {
        requester: Address,
        prior: RequestStatus,
        fee_paid: u128,
    },
    ConsumerAuthorized {
        consumer: Address,
    },
    ConsumerRevoked {
        consumer: Address,
    },
    FeeScheduleUpdated {
        base_fee: u64,
        unit_fee: u64,
        config_version: u32,
    },
    GasFormulaUpdated {
        fixed_overhead: u64,
        per_unit: u64,
        max_callback_gas: u64,
        config_version: u32,
    },
}
