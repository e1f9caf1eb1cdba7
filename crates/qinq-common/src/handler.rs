//! Switch-attach subscription.

use qinq_types::Switch;
use serde::{Deserialize, Serialize};

/// Notification that a switch finished session setup.
///
/// Delivered once per session by the external control layer; the port
/// inventory is complete at that point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchAttached {
    /// The switch and its ports.
    pub switch: Switch,
}

impl SwitchAttached {
    /// Wraps a switch handle.
    pub fn new(switch: Switch) -> Self {
        Self { switch }
    }
}

impl From<Switch> for SwitchAttached {
    fn from(switch: Switch) -> Self {
        Self::new(switch)
    }
}

/// Subscriber to [`SwitchAttached`] events.
///
/// # Thread Safety
///
/// Handlers are shared across tasks so that switches attaching at the same
/// time are handled concurrently. An invocation must only touch the switch
/// it was given plus read-only shared state.
pub trait AttachHandler: Send + Sync {
    /// Outcome of one invocation.
    type Report: Send + 'static;

    /// Returns the handler name (for logging).
    fn name(&self) -> &str;

    /// Handles one attach event to completion.
    fn on_switch_attached(&self, event: &SwitchAttached) -> Self::Report;
}

#[cfg(test)]
mod tests {
    use super::*;
    use qinq_types::Port;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct PortCounter {
        seen: AtomicUsize,
    }

    impl AttachHandler for PortCounter {
        type Report = usize;

        fn name(&self) -> &str {
            "port-counter"
        }

        fn on_switch_attached(&self, event: &SwitchAttached) -> usize {
            self.seen.fetch_add(1, Ordering::Relaxed);
            event.switch.ports.len()
        }
    }

    #[test]
    fn test_attach_handler() {
        let handler = PortCounter {
            seen: AtomicUsize::new(0),
        };
        let event: SwitchAttached =
            Switch::new(1, vec![Port::new(1, "s1-eth1"), Port::new(2, "s1-eth2")]).into();

        assert_eq!(handler.name(), "port-counter");
        assert_eq!(handler.on_switch_attached(&event), 2);
        assert_eq!(handler.seen.load(Ordering::Relaxed), 1);
    }
}
