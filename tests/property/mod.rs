//! Property-based tests for expansion determinism and pricing bounds

pub mod expansion;
pub mod pricing;
