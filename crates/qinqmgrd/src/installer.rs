//! Rule installation for qinqmgrd

use std::sync::Arc;

use qinq_common::{FlowMod, FlowRequest, FlowSink, ProvisionResult};
use qinq_types::Switch;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, instrument};

/// Submits rules to the switch control layer
///
/// Every call issues an unconditional add-flow. Nothing is deduplicated:
/// installing the same rule twice yields two submissions, and whether the
/// switch merges them is up to the switch.
#[derive(Clone)]
pub struct FlowInstaller {
    sink: Arc<dyn FlowSink>,
}

impl FlowInstaller {
    /// Creates an installer on top of `sink`
    pub fn new(sink: Arc<dyn FlowSink>) -> Self {
        Self { sink }
    }

    /// Submit `flow` to `switch` without waiting for an acknowledgment
    #[instrument(skip(self, switch, flow), fields(datapath = %switch.id))]
    pub fn install(&self, switch: &Switch, flow: FlowMod) -> ProvisionResult<()> {
        debug!("Submitting add-flow: {}", flow);
        self.sink.submit_add_flow(switch.id, flow)
    }
}

impl std::fmt::Debug for FlowInstaller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowInstaller").finish_non_exhaustive()
    }
}

/// Drain submitted requests into `out` as JSON lines
///
/// Returns once every sender is gone. Used by the daemon to stand in for a
/// live switch session.
pub async fn write_flow_requests<W>(
    mut requests: mpsc::Receiver<FlowRequest>,
    mut out: W,
) -> std::io::Result<usize>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0;
    while let Some(request) = requests.recv().await {
        let mut line = serde_json::to_vec(&request)?;
        line.push(b'\n');
        out.write_all(&line).await?;
        written += 1;
    }
    out.flush().await?;
    Ok(written)
}
