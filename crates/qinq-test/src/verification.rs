//! Verification helpers for testing provisioning
//!
//! Provides a recording flow sink and assertion helpers over the add-flow
//! requests it captured.

use std::collections::HashSet;

use parking_lot::Mutex;
use thiserror::Error;

use qinq_common::{FlowAction, FlowMod, FlowRequest, FlowSink, ProvisionError, ProvisionResult};
use qinq_types::{DatapathId, EtherType, PortNo, VlanId};

use crate::fixtures::ExpectedFlow;

/// Verification error types
#[derive(Error, Debug, PartialEq, Eq)]
pub enum VerificationError {
    #[error("Expected a flow on {datapath} in_port={in_port}, none submitted")]
    FlowNotFound {
        datapath: DatapathId,
        in_port: PortNo,
    },

    #[error("Unexpected flow on {datapath} in_port={in_port}")]
    UnexpectedFlow {
        datapath: DatapathId,
        in_port: PortNo,
    },

    #[error("Action mismatch on {datapath} in_port={in_port}: expected '{expected}', got '{actual}'")]
    ActionMismatch {
        datapath: DatapathId,
        in_port: PortNo,
        expected: String,
        actual: String,
    },

    #[error("Expected {expected} flows for {scope}, found {actual}")]
    FlowCountMismatch {
        scope: String,
        expected: usize,
        actual: usize,
    },
}

/// Result type for verification operations
pub type VerifyResult<T> = Result<T, VerificationError>;

/// Flow sink that records every accepted request
///
/// Switches listed via [`RecordingFlowSink::rejecting`] have their requests
/// refused with a submission failure and are not recorded.
#[derive(Debug, Default)]
pub struct RecordingFlowSink {
    requests: Mutex<Vec<FlowRequest>>,
    rejected: HashSet<DatapathId>,
}

impl RecordingFlowSink {
    /// Create a sink accepting everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink refusing requests for `datapaths`
    pub fn rejecting(datapaths: impl IntoIterator<Item = u64>) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            rejected: datapaths.into_iter().map(DatapathId::new).collect(),
        }
    }

    /// Snapshot of recorded requests, in submission order
    pub fn requests(&self) -> Vec<FlowRequest> {
        self.requests.lock().clone()
    }

    /// Recorded flows for one switch
    pub fn flows_for(&self, datapath: u64) -> Vec<FlowMod> {
        let datapath = DatapathId::new(datapath);
        self.requests
            .lock()
            .iter()
            .filter(|r| r.datapath == datapath)
            .map(|r| r.flow.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.lock().is_empty()
    }

    /// Forget recorded requests
    pub fn clear(&self) {
        self.requests.lock().clear();
    }

    /// Verifier over the current snapshot
    pub fn verifier(&self) -> FlowVerifier {
        FlowVerifier::new(self.requests())
    }
}

impl FlowSink for RecordingFlowSink {
    fn submit_add_flow(&self, datapath: DatapathId, flow: FlowMod) -> ProvisionResult<()> {
        if self.rejected.contains(&datapath) {
            return Err(ProvisionError::submission(datapath, "rejected by test sink"));
        }
        self.requests.lock().push(FlowRequest { datapath, flow });
        Ok(())
    }
}

/// Assertion helper over a set of submitted requests
#[derive(Debug, Clone)]
pub struct FlowVerifier {
    requests: Vec<FlowRequest>,
}

impl FlowVerifier {
    pub fn new(requests: Vec<FlowRequest>) -> Self {
        Self { requests }
    }

    fn on(&self, datapath: DatapathId) -> impl Iterator<Item = &FlowMod> {
        self.requests
            .iter()
            .filter(move |r| r.datapath == datapath)
            .map(|r| &r.flow)
    }

    fn find(&self, datapath: DatapathId, in_port: PortNo) -> VerifyResult<&FlowMod> {
        self.on(datapath)
            .find(|f| f.flow_match.in_port == in_port)
            .ok_or(VerificationError::FlowNotFound { datapath, in_port })
    }

    fn check_actions(
        flow: &FlowMod,
        datapath: DatapathId,
        expected: &[FlowAction],
    ) -> VerifyResult<()> {
        let actual: Vec<FlowAction> = flow.actions().copied().collect();
        if actual != expected {
            return Err(VerificationError::ActionMismatch {
                datapath,
                in_port: flow.flow_match.in_port,
                expected: render(expected),
                actual: render(&actual),
            });
        }
        Ok(())
    }

    /// Verify the total number of submitted flows
    pub fn assert_flow_count(&self, expected: usize) -> VerifyResult<()> {
        let actual = self.requests.len();
        if actual != expected {
            return Err(VerificationError::FlowCountMismatch {
                scope: "all switches".to_string(),
                expected,
                actual,
            });
        }
        Ok(())
    }

    /// Verify the number of flows submitted to one switch
    pub fn assert_switch_flow_count(&self, datapath: u64, expected: usize) -> VerifyResult<()> {
        let datapath = DatapathId::new(datapath);
        let actual = self.on(datapath).count();
        if actual != expected {
            return Err(VerificationError::FlowCountMismatch {
                scope: format!("switch {}", datapath),
                expected,
                actual,
            });
        }
        Ok(())
    }

    /// Verify a tenant rule: push an 802.1Q header, then set `tag`
    pub fn assert_tenant_flow(&self, datapath: u64, in_port: u32, tag: u16) -> VerifyResult<()> {
        let datapath = DatapathId::new(datapath);
        let flow = self.find(datapath, PortNo::new(in_port))?;
        let vlan_id = match VlanId::new(tag) {
            Ok(vlan_id) => vlan_id,
            Err(e) => {
                return Err(VerificationError::ActionMismatch {
                    datapath,
                    in_port: PortNo::new(in_port),
                    expected: format!("set_field:vlan_vid={}", tag),
                    actual: e.to_string(),
                })
            }
        };
        Self::check_actions(
            flow,
            datapath,
            &[
                FlowAction::PushVlan {
                    ethertype: EtherType::VLAN_8021Q,
                },
                FlowAction::SetVlanVid { vlan_id },
            ],
        )
    }

    /// Verify a trunk rule: push an 802.1ad header only
    pub fn assert_trunk_flow(&self, datapath: u64, in_port: u32) -> VerifyResult<()> {
        let datapath = DatapathId::new(datapath);
        let flow = self.find(datapath, PortNo::new(in_port))?;
        Self::check_actions(
            flow,
            datapath,
            &[FlowAction::PushVlan {
                ethertype: EtherType::QINQ_8021AD,
            }],
        )
    }

    /// Verify nothing was submitted for `in_port` on a switch
    pub fn assert_no_flow(&self, datapath: u64, in_port: u32) -> VerifyResult<()> {
        let datapath = DatapathId::new(datapath);
        let in_port = PortNo::new(in_port);
        if self.on(datapath).any(|f| f.flow_match.in_port == in_port) {
            return Err(VerificationError::UnexpectedFlow { datapath, in_port });
        }
        Ok(())
    }

    /// Verify one expected flow
    pub fn assert_expected(&self, expected: &ExpectedFlow) -> VerifyResult<()> {
        match expected.inner_tag {
            Some(tag) => self.assert_tenant_flow(
                expected.datapath.as_u64(),
                expected.in_port.as_u32(),
                tag,
            ),
            None => self.assert_trunk_flow(expected.datapath.as_u64(), expected.in_port.as_u32()),
        }
    }

    /// Verify exactly the expected flows were submitted
    pub fn assert_exactly(&self, expected: &[ExpectedFlow]) -> VerifyResult<()> {
        for flow in expected {
            self.assert_expected(flow)?;
        }
        self.assert_flow_count(expected.len())
    }
}

fn render(actions: &[FlowAction]) -> String {
    actions
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use qinq_common::FlowMatch;

    fn tenant_flow(port: u32, tag: u16) -> FlowMod {
        FlowMod::add(
            0,
            0xff,
            FlowMatch::in_port(PortNo::new(port)),
            vec![
                FlowAction::PushVlan {
                    ethertype: EtherType::VLAN_8021Q,
                },
                FlowAction::SetVlanVid {
                    vlan_id: VlanId::new(tag).unwrap(),
                },
            ],
        )
    }

    #[test]
    fn test_recording_sink_records_in_order() {
        let sink = RecordingFlowSink::new();
        sink.submit_add_flow(DatapathId::new(1), tenant_flow(1, 1))
            .unwrap();
        sink.submit_add_flow(DatapathId::new(2), tenant_flow(3, 2))
            .unwrap();

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.requests()[1].datapath, DatapathId::new(2));
        assert_eq!(sink.flows_for(1), vec![tenant_flow(1, 1)]);

        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_rejecting_sink() {
        let sink = RecordingFlowSink::rejecting([2]);
        assert!(sink
            .submit_add_flow(DatapathId::new(1), tenant_flow(1, 1))
            .is_ok());
        let err = sink
            .submit_add_flow(DatapathId::new(2), tenant_flow(1, 1))
            .unwrap_err();
        assert!(matches!(err, ProvisionError::InstallSubmissionFailure { .. }));
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_verifier_tenant_flow() {
        let sink = RecordingFlowSink::new();
        sink.submit_add_flow(DatapathId::new(1), tenant_flow(1, 7))
            .unwrap();
        let verifier = sink.verifier();

        assert!(verifier.assert_tenant_flow(1, 1, 7).is_ok());
        assert!(matches!(
            verifier.assert_tenant_flow(1, 1, 8),
            Err(VerificationError::ActionMismatch { .. })
        ));
        assert!(verifier.assert_trunk_flow(1, 1).is_err());
        assert_eq!(
            verifier.assert_tenant_flow(2, 1, 7),
            Err(VerificationError::FlowNotFound {
                datapath: DatapathId::new(2),
                in_port: PortNo::new(1),
            })
        );
    }

    #[test]
    fn test_tenant_flow_needs_customer_tag() {
        let mut flow = tenant_flow(1, 7);
        flow.instructions = vec![qinq_common::Instruction::ApplyActions(vec![
            FlowAction::PushVlan {
                ethertype: EtherType::QINQ_8021AD,
            },
            FlowAction::SetVlanVid {
                vlan_id: VlanId::new(7).unwrap(),
            },
        ])];
        let verifier = FlowVerifier::new(vec![FlowRequest {
            datapath: DatapathId::new(1),
            flow,
        }]);

        assert!(matches!(
            verifier.assert_tenant_flow(1, 1, 7),
            Err(VerificationError::ActionMismatch { .. })
        ));
    }

    #[test]
    fn test_verifier_counts() {
        let verifier = FlowVerifier::new(vec![
            FlowRequest {
                datapath: DatapathId::new(1),
                flow: tenant_flow(1, 1),
            },
            FlowRequest {
                datapath: DatapathId::new(1),
                flow: tenant_flow(2, 2),
            },
        ]);

        assert!(verifier.assert_flow_count(2).is_ok());
        assert!(verifier.assert_switch_flow_count(1, 2).is_ok());
        assert!(verifier.assert_switch_flow_count(2, 0).is_ok());
        assert!(verifier.assert_no_flow(1, 3).is_ok());
        assert!(verifier.assert_no_flow(1, 2).is_err());
        assert!(verifier
            .assert_exactly(&[ExpectedFlow::tenant(1, 1, 1), ExpectedFlow::tenant(1, 2, 2)])
            .is_ok());
    }
}
