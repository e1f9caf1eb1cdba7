//! Rule builders for tenant and trunk ports
//!
//! Tenant ports receive plain customer traffic: the rule pushes an 802.1Q
//! customer tag and stamps it with the tenant's VLAN id. Trunk ports already
//! carry tenant-tagged traffic and only get the shared 802.1ad outer envelope.

use qinq_common::{FlowAction, FlowMatch, FlowMod, GroupKind};
use qinq_types::{Port, VlanId};

use crate::constants::{
    CUSTOMER_TAG_ETHERTYPE, FLOW_PRIORITY, FLOW_TABLE_ID, MATCH_ETH_TYPE, SERVICE_TAG_ETHERTYPE,
};

/// Match shared by both rule kinds: IPv4 arriving on `port`.
fn build_port_match(port: &Port) -> FlowMatch {
    FlowMatch::in_port(port.number).with_eth_type(MATCH_ETH_TYPE)
}

/// Build the rule for a tenant-facing port
pub fn build_tenant_rule(port: &Port, tenant_tag: VlanId) -> FlowMod {
    FlowMod::add(
        FLOW_TABLE_ID,
        FLOW_PRIORITY,
        build_port_match(port),
        vec![
            FlowAction::PushVlan {
                ethertype: CUSTOMER_TAG_ETHERTYPE,
            },
            FlowAction::SetVlanVid {
                vlan_id: tenant_tag,
            },
        ],
    )
}

/// Build the rule for a trunk-facing port
///
/// The trunk group's tag is not part of the rule; it only shows up in
/// provisioning reports.
pub fn build_trunk_rule(port: &Port) -> FlowMod {
    FlowMod::add(
        FLOW_TABLE_ID,
        FLOW_PRIORITY,
        build_port_match(port),
        vec![FlowAction::PushVlan {
            ethertype: SERVICE_TAG_ETHERTYPE,
        }],
    )
}

/// Build the rule for a group of the given kind
pub fn build_rule(kind: GroupKind, port: &Port, tag: VlanId) -> FlowMod {
    match kind {
        GroupKind::Tenant => build_tenant_rule(port, tag),
        GroupKind::Trunk => build_trunk_rule(port),
    }
}
