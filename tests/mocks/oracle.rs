//! Mock oracle coordinator
//!
//! Records every submission so tests can assert on the gas budget and
//! confirmation parameters the service actually sent, and can be switched
//! into a rejecting mode to simulate an exhausted subscription.

use seedforge::{OracleError, RandomnessCoordinator, RequestId, RequestParams};

/// In-memory stand-in for the oracle request interface.
pub struct MockCoordinator {
    next_id: u64,
    /// Every accepted submission, in order.
    pub submissions: Vec<RequestParams>,
    /// When set, submissions fail as if the subscription ran dry.
    pub exhausted: bool,
}

impl MockCoordinator {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            submissions: Vec::new(),
            exhausted: false,
        }
    }

    /// Id the next accepted submission will get.
    pub fn next_request_id(&self) -> RequestId {
        RequestId(self.next_id)
    }

    pub fn last_submission(&self) -> Option<&RequestParams> {
        self.submissions.last()
    }
}

impl Default for MockCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomnessCoordinator for MockCoordinator {
    fn submit_request(&mut self, params: &RequestParams) -> Result<RequestId, OracleError> {
        if self.exhausted {
            return Err(OracleError::SubscriptionExhausted);
        }
        let id = RequestId(self.next_id);
        self.next_id += 1;
        self.submissions.push(*params);
        Ok(id)
    }
}
