//! QinqMgr - attach-event dispatcher

use std::sync::Arc;

use qinq_common::{AttachHandler, FlowSink, Group, ProvisionError, SwitchAttached, TenantTable};
use qinq_types::Switch;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use crate::installer::FlowInstaller;
use crate::report::{DispatchSummary, GroupOutcome, ProvisionReport};
use crate::resolver::resolve;
use crate::rules::build_rule;

/// QinqMgr provisions Q-in-Q rules on attaching switches
///
/// Provisioning flow, per attach event and per group in table order:
/// 1. Resolve the group's labels to one port on the switch (skip if none)
/// 2. Build the tenant or trunk rule for that port
/// 3. Submit it through the installer
///
/// The manager keeps no per-switch state. Every attach event is handled from
/// scratch, so a switch that attaches twice receives its rules twice.
#[derive(Debug, Clone)]
pub struct QinqMgr {
    /// Group table, shared read-only by all handler tasks
    table: Arc<TenantTable>,

    installer: FlowInstaller,
}

impl QinqMgr {
    /// Creates a new QinqMgr instance
    pub fn new(table: Arc<TenantTable>, sink: Arc<dyn FlowSink>) -> Self {
        Self {
            table,
            installer: FlowInstaller::new(sink),
        }
    }

    /// Provision every configured group on `switch`
    ///
    /// Failures stay local to their group; the loop always runs to the end.
    #[instrument(skip(self, switch), fields(datapath = %switch.id))]
    pub fn provision(&self, switch: &Switch) -> ProvisionReport {
        info!(
            ports = switch.ports.len(),
            groups = self.table.len(),
            "Installing Q-in-Q rules"
        );

        let mut report = ProvisionReport::new(switch.id);
        for group in self.table.groups() {
            let outcome = self.provision_group(switch, group);
            report.push(group.name(), group.kind(), outcome);
        }

        info!(
            installed = report.installed_count(),
            skipped = report.skipped_count(),
            failed = report.failed_count(),
            "Switch provisioned"
        );
        report
    }

    fn provision_group(&self, switch: &Switch, group: &Group) -> GroupOutcome {
        let Some(port) = resolve(switch, group.labels()) else {
            debug!("{}", ProvisionError::port_not_found(switch.id, group.name()));
            return GroupOutcome::Skipped;
        };

        let rule = build_rule(group.kind(), port, group.tag());
        match self.installer.install(switch, rule) {
            Ok(()) => {
                info!(
                    group = group.name(),
                    kind = %group.kind(),
                    port = %port,
                    tag = %group.tag(),
                    "Tagging port"
                );
                GroupOutcome::Installed {
                    port: port.clone(),
                    tag: group.tag(),
                }
            }
            Err(e) => {
                warn!(group = group.name(), port = %port, "Rule not submitted: {}", e);
                GroupOutcome::Failed {
                    port: port.clone(),
                    error: e,
                }
            }
        }
    }

    /// Handle attach events until the stream closes
    ///
    /// Each event gets its own task so that switches attaching together are
    /// provisioned concurrently. Returns once the stream is closed and every
    /// task has finished.
    pub async fn run(self: Arc<Self>, mut events: mpsc::Receiver<SwitchAttached>) -> DispatchSummary {
        let mut tasks = JoinSet::new();
        let mut summary = DispatchSummary::default();

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => {
                        debug!(datapath = %event.switch.id, "Switch attached");
                        let mgr = Arc::clone(&self);
                        tasks.spawn(async move { mgr.on_switch_attached(&event) });
                    }
                    None => break,
                },
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    summary.absorb(joined);
                }
            }
        }

        while let Some(joined) = tasks.join_next().await {
            summary.absorb(joined);
        }

        info!(
            switches = summary.switches,
            installed = summary.installed,
            skipped = summary.skipped,
            failed = summary.failed,
            "Attach event stream closed"
        );
        summary
    }
}

impl AttachHandler for QinqMgr {
    type Report = ProvisionReport;

    fn name(&self) -> &str {
        "qinqmgr"
    }

    fn on_switch_attached(&self, event: &SwitchAttached) -> ProvisionReport {
        self.provision(&event.switch)
    }
}
