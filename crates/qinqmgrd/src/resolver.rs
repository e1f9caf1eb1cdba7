//! Port resolution for group labels
//!
//! Policy is "first label, first matching port": labels are tried in order
//! and the first label that matches any port wins, with ties broken by the
//! switch's port order. Only one representative port per group is returned
//! even when several ports would match.

use qinq_common::PortLabel;
use qinq_types::{Port, Switch};

/// Resolves `labels` to one runtime port on `switch`.
///
/// Returns `None` when no label matches any port, meaning the group is not
/// present on this switch.
pub fn resolve<'a>(switch: &'a Switch, labels: &[PortLabel]) -> Option<&'a Port> {
    labels
        .iter()
        .find_map(|label| switch.ports.iter().find(|port| label.matches(port)))
}
