//! Common infrastructure for Q-in-Q provisioning.
//!
//! This crate holds everything the provisioning engine shares with its
//! configuration and with the external switch control layer:
//!
//! - [`config`]: the immutable Tenant Configuration Table and its loader
//! - [`flow`]: abstract add-flow descriptors (match, actions, priority, table)
//! - [`sink`]: the [`FlowSink`] seam through which flows leave the engine
//! - [`handler`]: the [`AttachHandler`] subscription to switch-attach events
//! - [`error`]: error taxonomy shared by all of the above
//!
//! # Architecture
//!
//! 1. The group table is loaded once at startup into a [`TenantTable`],
//!    which validates label ownership and assigns tag ids.
//! 2. The external layer delivers a [`SwitchAttached`] event per switch.
//! 3. An [`AttachHandler`] turns the table plus the switch's port inventory
//!    into [`FlowMod`]s.
//! 4. Each flow is handed to a [`FlowSink`] without waiting for an ack.
//!
//! # Example
//!
//! ```
//! use qinq_common::{GroupKind, TenantTable};
//!
//! let table = TenantTable::from_yaml_str(
//!     r#"
//! groups:
//!   - { name: tenant-a, kind: tenant, ports: [s1-eth1] }
//!   - { name: trunk, kind: trunk, ports: [s1-eth4] }
//! "#,
//! )
//! .unwrap();
//!
//! assert_eq!(table.len(), 2);
//! assert_eq!(table.groups()[1].kind(), GroupKind::Trunk);
//! ```

pub mod config;
pub mod error;
pub mod flow;
pub mod handler;
pub mod sink;

// Re-export commonly used items at crate root
pub use config::{
    read_document, Group, GroupKind, GroupSpec, PortLabel, TableSpec, TenantTable,
    DEFAULT_TRUNK_TAG_START,
};
pub use error::{ProvisionError, ProvisionResult};
pub use flow::{FlowAction, FlowMatch, FlowMod, FlowModCommand, Instruction};
pub use handler::{AttachHandler, SwitchAttached};
pub use sink::{ChannelFlowSink, FlowRequest, FlowSink};
