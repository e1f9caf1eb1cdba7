//! Submission seam towards the external switch control layer.

use qinq_types::DatapathId;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::error::{ProvisionError, ProvisionResult};
use crate::flow::FlowMod;

/// An add-flow request addressed to one switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowRequest {
    /// Target switch.
    pub datapath: DatapathId,
    /// The flow to add.
    pub flow: FlowMod,
}

/// Receives add-flow requests on behalf of the switch control layer.
///
/// Submission is fire-and-forget: `Ok` means the request was accepted for
/// delivery, not that the switch installed it. Implementations must return
/// without blocking since they are called from inside attach-event handling.
pub trait FlowSink: Send + Sync {
    /// Submits an add-flow request for `datapath`.
    fn submit_add_flow(&self, datapath: DatapathId, flow: FlowMod) -> ProvisionResult<()>;
}

/// [`FlowSink`] backed by a bounded tokio channel.
///
/// The receiving half belongs to whatever speaks to the switches. A full or
/// closed queue is reported as a submission failure right away.
#[derive(Debug, Clone)]
pub struct ChannelFlowSink {
    tx: mpsc::Sender<FlowRequest>,
}

impl ChannelFlowSink {
    /// Creates a sink with room for `depth` pending requests (at least one).
    pub fn bounded(depth: usize) -> (Self, mpsc::Receiver<FlowRequest>) {
        let (tx, rx) = mpsc::channel(depth.max(1));
        (Self { tx }, rx)
    }
}

impl FlowSink for ChannelFlowSink {
    fn submit_add_flow(&self, datapath: DatapathId, flow: FlowMod) -> ProvisionResult<()> {
        self.tx
            .try_send(FlowRequest { datapath, flow })
            .map_err(|e| match e {
                TrySendError::Full(_) => {
                    ProvisionError::submission(datapath, "submission queue is full")
                }
                TrySendError::Closed(_) => {
                    ProvisionError::submission(datapath, "switch session is closed")
                }
            })
    }
}
