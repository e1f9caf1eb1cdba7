//! Test fixtures for provisioning scenarios
//!
//! Port names follow the Mininet convention `s<switch>-eth<port>`, with port
//! numbers equal to the `eth` index.

use qinq_common::{GroupSpec, TableSpec};
use qinq_types::{DatapathId, PortNo, Switch};

/// Common group table fixtures
pub mod group_fixtures {
    use super::*;

    /// Two tenants and one trunk on a single switch
    pub fn single_switch() -> TableSpec {
        TableSpec::new(vec![
            GroupSpec::tenant("tenant-a", ["s1-eth1"]),
            GroupSpec::tenant("tenant-b", ["s1-eth2"]),
            GroupSpec::trunk("trunk", ["s1-eth4"]),
        ])
    }

    /// Two tenants spread over three switches, trunk on the inter-switch links
    ///
    /// Matches the port layout of [`topology_fixtures::three_switch_fabric`].
    ///
    /// [`topology_fixtures::three_switch_fabric`]: super::topology_fixtures::three_switch_fabric
    pub fn three_switch_fabric() -> TableSpec {
        TableSpec::new(vec![
            GroupSpec::tenant("tenant-a", ["s1-eth1", "s1-eth3", "s2-eth2"]),
            GroupSpec::tenant("tenant-b", ["s1-eth2", "s2-eth1", "s3-eth1"]),
            GroupSpec::trunk("trunk", ["s1-eth4", "s2-eth3", "s3-eth2"]),
        ])
    }

    /// A group no switch in the fixtures carries
    pub fn absent_tenant() -> GroupSpec {
        GroupSpec::tenant("tenant-absent", ["s9-eth1"])
    }
}

/// Common switch fixtures
pub mod topology_fixtures {
    use super::*;
    use qinq_types::Port;

    /// Switch `n` with ports `s<n>-eth1` .. `s<n>-eth<port_count>`
    pub fn switch(n: u64, port_count: u32) -> Switch {
        Switch::new(
            n,
            (1..=port_count)
                .map(|m| Port::new(m, format!("s{}-eth{}", n, m)))
                .collect(),
        )
    }

    /// Switch `n` with the given port names, numbered from 1 in order
    pub fn switch_with_ports(n: u64, names: &[&str]) -> Switch {
        Switch::new(
            n,
            names
                .iter()
                .zip(1u32..)
                .map(|(name, m)| Port::new(m, *name))
                .collect(),
        )
    }

    /// Three switches in a line with hosts attached
    ///
    /// ```text
    /// h1,h2,h3 --- s1 --- s2 --- s3 --- h6
    ///                     |
    ///                   h4,h5
    /// ```
    ///
    /// s1 uses eth1-3 for hosts and eth4 towards s2; s2 uses eth1-2 for hosts,
    /// eth3 towards s1 and eth4 towards s3; s3 uses eth1 for h6 and eth2
    /// towards s2.
    pub fn three_switch_fabric() -> Vec<Switch> {
        vec![switch(1, 4), switch(2, 4), switch(3, 2)]
    }
}

/// A flow a scenario expects to see
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedFlow {
    /// Target switch
    pub datapath: DatapathId,
    /// Ingress port the flow matches
    pub in_port: PortNo,
    /// Tenant tag for tenant rules, `None` for trunk rules
    pub inner_tag: Option<u16>,
}

impl ExpectedFlow {
    /// A tenant rule on `in_port` stamping `tag`
    pub fn tenant(datapath: u64, in_port: u32, tag: u16) -> Self {
        Self {
            datapath: DatapathId::new(datapath),
            in_port: PortNo::new(in_port),
            inner_tag: Some(tag),
        }
    }

    /// A trunk rule on `in_port`
    pub fn trunk(datapath: u64, in_port: u32) -> Self {
        Self {
            datapath: DatapathId::new(datapath),
            in_port: PortNo::new(in_port),
            inner_tag: None,
        }
    }
}

/// Scenario builder for multi-switch provisioning tests
#[derive(Debug)]
pub struct ProvisionScenario {
    /// Scenario name
    pub name: String,
    /// Group table
    pub spec: TableSpec,
    /// Switches attaching, in order
    pub switches: Vec<Switch>,
    /// Flows expected after all switches attached
    pub expected: Vec<ExpectedFlow>,
}

impl ProvisionScenario {
    /// Create a new scenario over `spec`
    pub fn new(name: impl Into<String>, spec: TableSpec) -> Self {
        Self {
            name: name.into(),
            spec,
            switches: Vec::new(),
            expected: Vec::new(),
        }
    }

    /// Add an attaching switch
    pub fn attach(mut self, switch: Switch) -> Self {
        self.switches.push(switch);
        self
    }

    /// Add an expected flow
    pub fn expect(mut self, flow: ExpectedFlow) -> Self {
        self.expected.push(flow);
        self
    }
}
