//! Mock implementations for testing

pub mod oracle;

pub use consumers::MockConsumer;
pub use oracle::MockCoordinator;
