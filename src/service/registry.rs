//! Allow-list of consumer contracts
//!
//! This is the sole gate preventing arbitrary contracts from draining the
//! oracle subscription or forging outcomes for tokens they do not own.
//! Mutation is owner-gated at the service layer; the registry itself is a
//! plain set.

use std::collections::HashSet;

use crate::types::Address;

/// Set of consumer contracts permitted to commit mints and be finalized.
#[derive(Debug, Clone, Default)]
pub struct AuthorizationRegistry {
    consumers: HashSet<Address>,
}

impl AuthorizationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a consumer. Returns false if it was already authorized.
    pub fn authorize(&mut self, consumer: Address) -> bool {
        self.consumers.insert(consumer)
    }

    /// Remove a consumer. Returns false if it was not authorized.
    pub fn revoke(&mut self, consumer: &Address) -> bool {
        self.consumers.remove(consumer)
    }

    pub fn is_authorized(&self, consumer: &Address) -> bool {
        self.consumers.contains(consumer)
    }

    pub fn len(&self) -> usize {
        self.consumers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.consumers.is_empty()
    }

    pub fn consumers(&self) -> impl Iterator<Item = &Address> {
        self.consumers.iter()
    }
}
