//! Fixed flow parameters for qinqmgrd

use qinq_types::EtherType;

/// Priority of every installed rule.
///
/// All rules share it, so they are mutually exclusive by match alone.
pub const FLOW_PRIORITY: u16 = 0xff;

/// Flow table receiving the rules.
pub const FLOW_TABLE_ID: u8 = 0;

/// Payload type matched on every provisioned port.
pub const MATCH_ETH_TYPE: EtherType = EtherType::IPV4;

/// Tag protocol id of the inner (customer) tag stamped with the tenant id.
pub const CUSTOMER_TAG_ETHERTYPE: EtherType = EtherType::VLAN_8021Q;

/// Tag protocol id of the outer (service) tag.
pub const SERVICE_TAG_ETHERTYPE: EtherType = EtherType::QINQ_8021AD;

/// Default depth of the submission queue.
pub const DEFAULT_QUEUE_DEPTH: usize = 1024;

/// Environment variable naming the group table file.
pub const CONFIG_ENV: &str = "QINQMGRD_CONFIG";
