//! Network primitives shared by the Q-in-Q provisioning crates.
//!
//! This crate provides type-safe representations of the values that flow
//! between the tenant configuration, the rule builder and the external
//! switch control layer:
//!
//! - [`VlanId`]: IEEE 802.1Q VLAN identifiers (inner and service tags)
//! - [`EtherType`]: Ethernet frame type codes used in matches and tag pushes
//! - [`Port`], [`PortNo`]: switch ports as reported when a switch attaches
//! - [`Switch`], [`DatapathId`]: an attached forwarding device

mod ether;
mod port;
mod switch;
mod vlan;

pub use ether::EtherType;
pub use port::{Port, PortNo};
pub use switch::{DatapathId, Switch};
pub use vlan::VlanId;

/// Common error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid VLAN ID: {0} (must be 1-4094)")]
    InvalidVlanId(u16),
}
