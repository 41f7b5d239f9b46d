//! Integration tests for the full service protocol

pub mod delivery_loop_tests;
