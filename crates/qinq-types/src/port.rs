//! Switch port types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Runtime port number assigned by the switch (OpenFlow 1.3 `ofp_port_no`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortNo(u32);

impl PortNo {
    /// Wildcard port, used where a rule must not constrain the output port.
    pub const ANY: PortNo = PortNo(0xffff_ffff);

    /// Creates a port number.
    pub const fn new(number: u32) -> Self {
        PortNo(number)
    }

    /// Returns the raw port number.
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for PortNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for PortNo {
    fn from(number: u32) -> Self {
        PortNo(number)
    }
}

/// A port as discovered on an attached switch.
///
/// `name` is the switch-local interface name (e.g. `s1-eth2`) that group
/// labels are matched against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Port {
    /// Runtime port number.
    pub number: PortNo,
    /// Interface name reported by the switch.
    pub name: String,
}

impl Port {
    /// Creates a port.
    pub fn new(number: impl Into<PortNo>, name: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.number)
    }
}
