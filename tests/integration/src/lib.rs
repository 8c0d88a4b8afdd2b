//! End-to-end scenarios for SOSNet
//!
//! This test suite validates:
//! - Signup and sign-in through the coordinator
//! - The report -> validate -> acknowledge flow and its effects
//! - Role and mailbox ownership checks
//! - Live delivery sessions: ordering, at-most-once, cancellation

pub mod test_utils;


#[cfg(test)]
mod incident_flow_tests;


#[cfg(test)]
mod delivery_tests;
