//! Attached switch handle.

use crate::Port;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 64-bit datapath identifier reported by a switch at session setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatapathId(u64);

impl DatapathId {
    /// Creates a datapath id.
    pub const fn new(id: u64) -> Self {
        DatapathId(id)
    }

    /// Returns the raw id.
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for DatapathId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl From<u64> for DatapathId {
    fn from(id: u64) -> Self {
        DatapathId(id)
    }
}

/// A forwarding device that has completed session setup.
///
/// `ports` keeps the order in which the switch reported them. The handle is
/// only valid for the attach event it arrived with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Switch {
    /// Datapath id.
    pub id: DatapathId,
    /// Port inventory.
    #[serde(default)]
    pub ports: Vec<Port>,
}

impl Switch {
    /// Creates a switch handle.
    pub fn new(id: impl Into<DatapathId>, ports: Vec<Port>) -> Self {
        Self {
            id: id.into(),
            ports,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_datapath_id_display() {
        assert_eq!(DatapathId::new(1).to_string(), "0000000000000001");
    }

    #[test]
    fn test_switch_keeps_port_order() {
        let sw = Switch::new(1, vec![Port::new(2, "s1-eth2"), Port::new(1, "s1-eth1")]);
        let numbers: Vec<u32> = sw.ports.iter().map(|p| p.number.as_u32()).collect();
        assert_eq!(numbers, vec![2, 1]);
    }

    #[test]
    fn test_switch_deserialize_without_ports() {
        let sw: Switch = serde_json::from_str(r#"{"id": 7}"#).unwrap();
        assert_eq!(sw.id, DatapathId::new(7));
        assert!(sw.ports.is_empty());
    }
}
