//! Fee quoting and callback gas budgeting

pub mod fees;
pub mod gas;

pub use fees::FeeSchedule;
pub use gas::GasFormula;
