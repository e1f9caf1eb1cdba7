//! qinqmgrd - Q-in-Q provisioning manager
//!
//! Installs tenant isolation rules on switches as they attach: every tenant
//! port pushes an 802.1Q customer tag carrying the tenant's VLAN id, and
//! trunk ports push the shared 802.1ad service tag.

mod constants;
mod daemon;
mod installer;
mod inventory;
mod qinq_mgr;
mod report;
mod resolver;
mod rules;

pub use constants::*;
pub use daemon::{run_daemon, DaemonOptions};
pub use installer::{write_flow_requests, FlowInstaller};
pub use inventory::load_inventory;
pub use qinq_mgr::QinqMgr;
pub use report::{DispatchSummary, GroupOutcome, GroupResult, ProvisionReport};
pub use resolver::resolve;
pub use rules::{build_rule, build_tenant_rule, build_trunk_rule};
