//! Daemon wiring: group table, switch inventory, dispatcher and flow output

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tokio::io::AsyncWrite;
use tokio::sync::mpsc;
use tracing::info;

use qinq_common::{ChannelFlowSink, SwitchAttached, TenantTable};

use crate::constants::DEFAULT_QUEUE_DEPTH;
use crate::installer::write_flow_requests;
use crate::inventory::load_inventory;
use crate::qinq_mgr::QinqMgr;
use crate::report::DispatchSummary;

/// Inputs of one daemon run
#[derive(Debug, Clone)]
pub struct DaemonOptions {
    /// Group table file
    pub config: PathBuf,
    /// Switches to replay as attach events; `None` only checks the table
    pub inventory: Option<PathBuf>,
    /// Pending add-flow requests allowed before submissions fail
    pub queue_depth: usize,
}

impl DaemonOptions {
    pub fn new(config: impl Into<PathBuf>) -> Self {
        Self {
            config: config.into(),
            inventory: None,
            queue_depth: DEFAULT_QUEUE_DEPTH,
        }
    }

    pub fn with_inventory(mut self, inventory: impl Into<PathBuf>) -> Self {
        self.inventory = Some(inventory.into());
        self
    }
}

/// Load the table, replay the inventory and write every submitted flow to
/// `out` as one JSON line.
///
/// Fails when the group table or the inventory is rejected; nothing is
/// written to `out` in that case.
pub async fn run_daemon<W>(options: DaemonOptions, out: W) -> anyhow::Result<DispatchSummary>
where
    W: AsyncWrite + Unpin,
{
    let table = TenantTable::load(&options.config)
        .with_context(|| format!("rejecting configuration {}", options.config.display()))?;
    info!(
        tenants = table.tenants().count(),
        trunks = table.trunks().count(),
        "Group table ready"
    );

    let Some(inventory) = options.inventory else {
        info!("No inventory given, configuration check only");
        return Ok(DispatchSummary::default());
    };
    let switches = load_inventory(&inventory)?;

    let (sink, flows) = ChannelFlowSink::bounded(options.queue_depth);
    let mgr = Arc::new(QinqMgr::new(Arc::new(table), Arc::new(sink)));

    let (events, event_rx) = mpsc::channel(switches.len().max(1));
    let dispatcher = tokio::spawn(mgr.run(event_rx));

    let feed = async move {
        for switch in switches {
            events
                .send(SwitchAttached::new(switch))
                .await
                .context("dispatcher stopped early")?;
        }
        drop(events);
        dispatcher.await.context("dispatcher task failed")
    };

    // The writer ends once the dispatcher drops the last sink handle.
    let (summary, written) = tokio::join!(feed, write_flow_requests(flows, out));
    let summary = summary?;
    let written = written.context("failed to write flows")?;
    info!(flows = written, "All submitted flows written");

    Ok(summary)
}
