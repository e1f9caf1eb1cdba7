//! Abstract add-flow descriptors.
//!
//! These types carry the parameters of an OpenFlow 1.3 flow-mod without
//! committing to a wire encoding. The external switch layer owns the
//! translation to bytes.

use std::fmt;

use qinq_types::{EtherType, PortNo, VlanId};
use serde::{Deserialize, Serialize};

/// `OFP_NO_BUFFER`: the flow-mod does not refer to a buffered packet.
pub const NO_BUFFER: u32 = 0xffff_ffff;

/// `OFPG_ANY`: no output group constraint.
pub const GROUP_ANY: u32 = 0xffff_ffff;

/// Match criteria of a flow.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlowMatch {
    /// Ingress port.
    pub in_port: PortNo,
    /// Ethernet payload type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eth_type: Option<EtherType>,
    /// VLAN id already present on the frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan_vid: Option<VlanId>,
}

impl FlowMatch {
    /// Matches everything arriving on `port`.
    pub fn in_port(port: PortNo) -> Self {
        Self {
            in_port: port,
            eth_type: None,
            vlan_vid: None,
        }
    }

    /// Restricts the match to one ethertype.
    pub fn with_eth_type(mut self, eth_type: EtherType) -> Self {
        self.eth_type = Some(eth_type);
        self
    }
}

impl fmt::Display for FlowMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "in_port={}", self.in_port)?;
        if let Some(eth_type) = self.eth_type {
            write!(f, ",eth_type={}", eth_type)?;
        }
        if let Some(vid) = self.vlan_vid {
            write!(f, ",vlan_vid={}", vid)?;
        }
        Ok(())
    }
}

/// A single action applied to a matched frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FlowAction {
    /// Push a new outermost VLAN header with the given tag protocol id.
    PushVlan {
        /// Tag protocol identifier of the new header.
        ethertype: EtherType,
    },
    /// Set the VLAN id of the outermost VLAN header.
    SetVlanVid {
        /// New VLAN id.
        vlan_id: VlanId,
    },
}

impl fmt::Display for FlowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PushVlan { ethertype } => write!(f, "push_vlan:{}", ethertype),
            Self::SetVlanVid { vlan_id } => write!(f, "set_field:vlan_vid={}", vlan_id),
        }
    }
}

/// Flow instruction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Instruction {
    /// Apply the actions immediately, in order.
    ApplyActions(Vec<FlowAction>),
}

/// Flow-mod command. Only additions are ever issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowModCommand {
    /// `OFPFC_ADD`
    #[default]
    Add,
}

/// A complete add-flow request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlowMod {
    pub table_id: u8,
    pub command: FlowModCommand,
    pub priority: u16,
    pub cookie: u64,
    pub cookie_mask: u64,
    pub idle_timeout: u16,
    pub hard_timeout: u16,
    pub buffer_id: u32,
    pub out_port: PortNo,
    pub out_group: u32,
    pub flags: u16,
    #[serde(rename = "match")]
    pub flow_match: FlowMatch,
    pub instructions: Vec<Instruction>,
}

impl FlowMod {
    /// Builds a permanent add-flow with a single apply-actions instruction.
    pub fn add(
        table_id: u8,
        priority: u16,
        flow_match: FlowMatch,
        actions: Vec<FlowAction>,
    ) -> Self {
        Self {
            table_id,
            command: FlowModCommand::Add,
            priority,
            cookie: 0,
            cookie_mask: 0,
            idle_timeout: 0,
            hard_timeout: 0,
            buffer_id: NO_BUFFER,
            out_port: PortNo::ANY,
            out_group: GROUP_ANY,
            flags: 0,
            flow_match,
            instructions: vec![Instruction::ApplyActions(actions)],
        }
    }

    /// All actions across instructions, in application order.
    pub fn actions(&self) -> impl Iterator<Item = &FlowAction> {
        self.instructions.iter().flat_map(|i| match i {
            Instruction::ApplyActions(actions) => actions.iter(),
        })
    }
}

impl fmt::Display for FlowMod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "table={} priority={} {} actions=",
            self.table_id, self.priority, self.flow_match
        )?;
        for (i, action) in self.actions().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", action)?;
        }
        Ok(())
    }
}
