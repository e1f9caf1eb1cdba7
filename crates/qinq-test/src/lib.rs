//! Test infrastructure for Q-in-Q provisioning
//!
//! Provides:
//! - Group table and switch topology fixtures
//! - A recording flow sink standing in for the switch control layer
//! - Assertion helpers over recorded add-flow requests

pub mod fixtures;
mod verification;

pub use fixtures::*;
pub use verification::*;
