//! Switch inventory replay files

use std::path::Path;

use qinq_common::{read_document, ProvisionError, ProvisionResult};
use qinq_types::Switch;
use tracing::info;

/// Load a list of switches to replay as attach events
///
/// The file is a YAML (or `.json`) list of `{ id, ports: [{ number, name }] }`.
/// Datapath ids must be unique within the file.
pub fn load_inventory(path: &Path) -> ProvisionResult<Vec<Switch>> {
    let switches: Vec<Switch> = read_document(path)?;

    let mut seen = std::collections::HashSet::new();
    for sw in &switches {
        if !seen.insert(sw.id) {
            return Err(ProvisionError::invalid_config(
                "inventory",
                format!("switch {} listed twice", sw.id),
            ));
        }
    }

    info!(path = %path.display(), switches = switches.len(), "Loaded switch inventory");
    Ok(switches)
}
