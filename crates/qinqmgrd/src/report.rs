//! Provisioning outcomes

use qinq_common::{GroupKind, ProvisionError};
use qinq_types::{DatapathId, Port, VlanId};
use tokio::task::JoinError;
use tracing::error;

/// What happened to one group on one switch
#[derive(Debug)]
pub enum GroupOutcome {
    /// The rule was accepted by the switch layer
    Installed {
        /// Port the rule matches on
        port: Port,
        /// Tenant or trunk tag of the group
        tag: VlanId,
    },
    /// No port on the switch matched the group's labels
    Skipped,
    /// The switch layer refused the submission
    Failed {
        /// Port the rule would have matched on
        port: Port,
        /// Submission error
        error: ProvisionError,
    },
}

/// Outcome for a single group
#[derive(Debug)]
pub struct GroupResult {
    pub group: String,
    pub kind: GroupKind,
    pub outcome: GroupOutcome,
}

/// Result of handling one attach event
#[derive(Debug)]
pub struct ProvisionReport {
    /// Switch that attached
    pub datapath: DatapathId,
    /// One entry per configured group, in table order
    pub groups: Vec<GroupResult>,
}

impl ProvisionReport {
    /// Creates an empty report for `datapath`
    pub fn new(datapath: DatapathId) -> Self {
        Self {
            datapath,
            groups: Vec::new(),
        }
    }

    /// Records the outcome for a group
    pub fn push(&mut self, group: impl Into<String>, kind: GroupKind, outcome: GroupOutcome) {
        self.groups.push(GroupResult {
            group: group.into(),
            kind,
            outcome,
        });
    }

    /// Looks up the outcome for a group
    pub fn outcome(&self, group: &str) -> Option<&GroupOutcome> {
        self.groups
            .iter()
            .find(|r| r.group == group)
            .map(|r| &r.outcome)
    }

    pub fn installed_count(&self) -> usize {
        self.count(|o| matches!(o, GroupOutcome::Installed { .. }))
    }

    pub fn skipped_count(&self) -> usize {
        self.count(|o| matches!(o, GroupOutcome::Skipped))
    }

    pub fn failed_count(&self) -> usize {
        self.count(|o| matches!(o, GroupOutcome::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&GroupOutcome) -> bool) -> usize {
        self.groups.iter().filter(|r| pred(&r.outcome)).count()
    }
}

/// Totals across every attach event handled by a dispatcher run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Attach events handled to completion
    pub switches: usize,
    /// Rules accepted by the switch layer
    pub installed: usize,
    /// Groups absent from their switch
    pub skipped: usize,
    /// Rules refused by the switch layer
    pub failed: usize,
    /// Handler tasks that panicked or were cancelled
    pub aborted: usize,
}

impl DispatchSummary {
    /// Adds one report to the totals
    pub fn record(&mut self, report: &ProvisionReport) {
        self.switches += 1;
        self.installed += report.installed_count();
        self.skipped += report.skipped_count();
        self.failed += report.failed_count();
    }

    /// Adds the result of a joined handler task
    pub fn absorb(&mut self, joined: Result<ProvisionReport, JoinError>) {
        match joined {
            Ok(report) => self.record(&report),
            Err(e) => {
                error!("Provisioning task did not complete: {}", e);
                self.aborted += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts() {
        let mut report = ProvisionReport::new(DatapathId::new(1));
        report.push(
            "tenant-a",
            GroupKind::Tenant,
            GroupOutcome::Installed {
                port: Port::new(1, "s1-eth1"),
                tag: VlanId::FIRST,
            },
        );
        report.push("tenant-b", GroupKind::Tenant, GroupOutcome::Skipped);
        report.push(
            "trunk",
            GroupKind::Trunk,
            GroupOutcome::Failed {
                port: Port::new(4, "s1-eth4"),
                error: ProvisionError::submission(DatapathId::new(1), "closed"),
            },
        );

        assert_eq!(report.installed_count(), 1);
        assert_eq!(report.skipped_count(), 1);
        assert_eq!(report.failed_count(), 1);
        assert!(matches!(report.outcome("tenant-b"), Some(GroupOutcome::Skipped)));
        assert!(report.outcome("tenant-c").is_none());

        let mut summary = DispatchSummary::default();
        summary.record(&report);
        summary.record(&report);
        assert_eq!(
            summary,
            DispatchSummary {
                switches: 2,
                installed: 2,
                skipped: 2,
                failed: 2,
                aborted: 0,
            }
        );
    }
}
