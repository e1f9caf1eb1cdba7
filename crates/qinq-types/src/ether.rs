//! Ethernet frame type codes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 16-bit Ethernet type field.
///
/// Appears in two places of a forwarding rule: as a match criterion on the
/// frame payload type, and as the tag protocol identifier of a pushed VLAN
/// header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EtherType(u16);

impl EtherType {
    /// IPv4 payload.
    pub const IPV4: EtherType = EtherType(0x0800);

    /// IEEE 802.1Q customer VLAN tag.
    pub const VLAN_8021Q: EtherType = EtherType(0x8100);

    /// IEEE 802.1ad service tag (outer tag of a Q-in-Q frame).
    pub const QINQ_8021AD: EtherType = EtherType(0x88a8);

    /// Creates an ethertype from its raw value.
    pub const fn new(value: u16) -> Self {
        EtherType(value)
    }

    /// Returns the raw value.
    pub const fn as_u16(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for EtherType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04x}", self.0)
    }
}

impl From<u16> for EtherType {
    fn from(value: u16) -> Self {
        EtherType(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_display() {
        assert_eq!(EtherType::IPV4.to_string(), "0x0800");
        assert_eq!(EtherType::QINQ_8021AD.to_string(), "0x88a8");
    }

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(serde_json::to_string(&EtherType::VLAN_8021Q).unwrap(), "33024");
        let parsed: EtherType = serde_json::from_str("34984").unwrap();
        assert_eq!(parsed, EtherType::QINQ_8021AD);
    }
}
