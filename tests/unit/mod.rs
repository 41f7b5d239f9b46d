//! Unit tests against the public API

pub mod pricing_tests;
pub mod status_tests;
