//! Tenant Configuration Table.
//!
//! The table maps each group (a tenant or the trunk) to an ordered list of
//! port labels and a tag id. It is loaded once at startup and is immutable
//! afterwards; handlers share it behind an `Arc`.
//!
//! Tag ids come from two independent counters walked in declaration order:
//! tenants get 1, 2, 3, ... and trunk groups start at `trunk_tag_start`.
//! Reordering the groups therefore changes the ids they receive.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use qinq_types::{Port, VlanId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ProvisionError, ProvisionResult};

/// Service tag given to the first trunk group when the file does not say.
pub const DEFAULT_TRUNK_TAG_START: u16 = 1;

fn default_trunk_tag_start() -> u16 {
    DEFAULT_TRUNK_TAG_START
}

/// Reads and deserializes a configuration document.
///
/// Files ending in `.json` are parsed as JSON, anything else as YAML.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> ProvisionResult<T> {
    let doc = std::fs::read_to_string(path).map_err(|source| ProvisionError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    let origin = path.display().to_string();
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(&doc).map_err(|e| ProvisionError::parse(origin, e))
    } else {
        serde_yaml::from_str(&doc).map_err(|e| ProvisionError::parse(origin, e))
    }
}

/// Role a group plays in the fabric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    /// Customer-facing ports of one tenant.
    Tenant,
    /// Shared uplink ports.
    Trunk,
}

impl GroupKind {
    /// Returns the kind as written in the configuration file.
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupKind::Tenant => "tenant",
            GroupKind::Trunk => "trunk",
        }
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A group as written in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupSpec {
    /// Unique group name (e.g. `tenant-a`, `trunk`).
    pub name: String,
    /// Tenant or trunk.
    pub kind: GroupKind,
    /// Port labels, in resolution order.
    pub ports: Vec<String>,
}

impl GroupSpec {
    /// Creates a tenant group spec.
    pub fn tenant<I, S>(name: impl Into<String>, ports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            kind: GroupKind::Tenant,
            ports: ports.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a trunk group spec.
    pub fn trunk<I, S>(name: impl Into<String>, ports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            kind: GroupKind::Trunk,
            ports: ports.into_iter().map(Into::into).collect(),
        }
    }
}

/// The whole configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableSpec {
    /// Service tag handed to the first trunk group.
    #[serde(default = "default_trunk_tag_start")]
    pub trunk_tag_start: u16,
    /// Groups in declaration order.
    #[serde(default)]
    pub groups: Vec<GroupSpec>,
}

impl TableSpec {
    /// Creates a spec with the default trunk tag start.
    pub fn new(groups: Vec<GroupSpec>) -> Self {
        Self {
            trunk_tag_start: DEFAULT_TRUNK_TAG_START,
            groups,
        }
    }

    /// Overrides the first trunk tag.
    pub fn with_trunk_tag_start(mut self, start: u16) -> Self {
        self.trunk_tag_start = start;
        self
    }
}

/// A logical port label.
///
/// A label matches every port whose name contains it, so `s1-eth1` also
/// matches `s1-eth10`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortLabel(String);

impl PortLabel {
    /// Creates a label.
    pub fn new(label: impl Into<String>) -> Self {
        PortLabel(label.into())
    }

    /// Returns the label text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if `port` is a runtime match for this label.
    pub fn matches(&self, port: &Port) -> bool {
        port.name.contains(self.0.as_str())
    }
}

impl fmt::Display for PortLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated group with its assigned tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    name: String,
    kind: GroupKind,
    tag: VlanId,
    labels: Vec<PortLabel>,
}

impl Group {
    /// Group name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tenant or trunk.
    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    /// Inner VLAN id for a tenant, service tag id for a trunk.
    pub fn tag(&self) -> VlanId {
        self.tag
    }

    /// Labels in resolution order.
    pub fn labels(&self) -> &[PortLabel] {
        &self.labels
    }
}

/// Immutable table of groups in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TenantTable {
    groups: Vec<Group>,
}

impl TenantTable {
    /// Validates a spec and assigns tag ids.
    ///
    /// # Errors
    ///
    /// - [`ProvisionError::ConfigurationConflict`] if a label of one group
    ///   contains, or is contained in, a label of another group
    /// - [`ProvisionError::InvalidConfig`] for empty or duplicate names, groups
    ///   without labels, or tag ids outside 1-4094
    pub fn from_spec(spec: TableSpec) -> ProvisionResult<Self> {
        let mut next_tenant = Some(VlanId::FIRST);
        let mut next_trunk = Some(VlanId::new(spec.trunk_tag_start).map_err(|e| {
            ProvisionError::invalid_config("trunk_tag_start", e.to_string())
        })?);

        let mut names = HashSet::new();
        let mut owners: Vec<(String, String)> = Vec::new();
        let mut groups = Vec::with_capacity(spec.groups.len());

        for g in spec.groups {
            if g.name.trim().is_empty() {
                return Err(ProvisionError::invalid_config(
                    "groups.name",
                    "group name must not be empty",
                ));
            }
            if !names.insert(g.name.clone()) {
                return Err(ProvisionError::invalid_config(
                    "groups.name",
                    format!("duplicate group '{}'", g.name),
                ));
            }
            if g.ports.is_empty() {
                return Err(ProvisionError::invalid_config(
                    format!("groups.{}.ports", g.name),
                    "group has no port labels",
                ));
            }

            for label in &g.ports {
                if label.is_empty() {
                    return Err(ProvisionError::invalid_config(
                        format!("groups.{}.ports", g.name),
                        "empty port label",
                    ));
                }
                // Substring matching lets `s1-eth1` claim `s1-eth10` too.
                let clash = owners.iter().find(|(claimed, owner)| {
                    owner != &g.name
                        && (claimed.contains(label.as_str()) || label.contains(claimed.as_str()))
                });
                if let Some((claimed, owner)) = clash {
                    let shorter = if claimed.len() <= label.len() { claimed } else { label };
                    return Err(ProvisionError::conflict(shorter, owner, &g.name));
                }
                owners.push((label.clone(), g.name.clone()));
            }

            let counter = match g.kind {
                GroupKind::Tenant => &mut next_tenant,
                GroupKind::Trunk => &mut next_trunk,
            };
            let tag = counter.ok_or_else(|| {
                ProvisionError::invalid_config(
                    format!("groups.{}", g.name),
                    format!("no {} tag ids left", g.kind),
                )
            })?;
            *counter = tag.next();

            debug!(group = %g.name, kind = %g.kind, tag = %tag, "Assigned tag");

            groups.push(Group {
                name: g.name,
                kind: g.kind,
                tag,
                labels: g.ports.into_iter().map(PortLabel::new).collect(),
            });
        }

        if groups.is_empty() {
            warn!("Group table is empty, attach events will install nothing");
        }

        Ok(Self { groups })
    }

    /// Parses and validates a YAML document.
    pub fn from_yaml_str(doc: &str) -> ProvisionResult<Self> {
        let spec: TableSpec =
            serde_yaml::from_str(doc).map_err(|e| ProvisionError::parse("<inline>", e))?;
        Self::from_spec(spec)
    }

    /// Loads the table from a file.
    ///
    /// Files ending in `.json` are parsed as JSON, anything else as YAML.
    pub fn load(path: impl AsRef<Path>) -> ProvisionResult<Self> {
        let path = path.as_ref();
        let table = Self::from_spec(read_document(path)?)?;
        info!(path = %path.display(), groups = table.len(), "Loaded group table");
        Ok(table)
    }

    /// Groups in declaration order.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Looks up a group by name.
    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Tenant groups in declaration order.
    pub fn tenants(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter().filter(|g| g.kind == GroupKind::Tenant)
    }

    /// Trunk groups in declaration order.
    pub fn trunks(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter().filter(|g| g.kind == GroupKind::Trunk)
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns true if the table has no groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn tags(table: &TenantTable) -> Vec<(String, u16)> {
        table
            .groups()
            .iter()
            .map(|g| (g.name().to_string(), g.tag().as_u16()))
            .collect()
    }

    #[test]
    fn test_tenant_tags_follow_declaration_order() {
        let table = TenantTable::from_spec(TableSpec::new(vec![
            GroupSpec::tenant("tenant-a", ["s1-eth1"]),
            GroupSpec::trunk("trunk", ["s1-eth4"]),
            GroupSpec::tenant("tenant-b", ["s1-eth2"]),
            GroupSpec::tenant("tenant-c", ["s1-eth3"]),
        ]))
        .unwrap();

        assert_eq!(
            tags(&table),
            vec![
                ("tenant-a".to_string(), 1),
                ("trunk".to_string(), 1),
                ("tenant-b".to_string(), 2),
                ("tenant-c".to_string(), 3),
            ]
        );
    }

    #[test]
    fn test_reordering_changes_tags() {
        let table = TenantTable::from_spec(TableSpec::new(vec![
            GroupSpec::tenant("tenant-b", ["s1-eth2"]),
            GroupSpec::tenant("tenant-a", ["s1-eth1"]),
        ]))
        .unwrap();

        assert_eq!(table.group("tenant-b").unwrap().tag().as_u16(), 1);
        assert_eq!(table.group("tenant-a").unwrap().tag().as_u16(), 2);
    }

    #[test]
    fn test_trunk_counter_is_independent() {
        let table = TenantTable::from_spec(
            TableSpec::new(vec![
                GroupSpec::trunk("uplink-1", ["s1-eth4"]),
                GroupSpec::tenant("tenant-a", ["s1-eth1"]),
                GroupSpec::trunk("uplink-2", ["s2-eth4"]),
            ])
            .with_trunk_tag_start(2),
        )
        .unwrap();

        let trunk_tags: Vec<u16> = table.trunks().map(|g| g.tag().as_u16()).collect();
        assert_eq!(trunk_tags, vec![2, 3]);
        assert_eq!(table.group("tenant-a").unwrap().tag().as_u16(), 1);
    }

    #[test]
    fn test_label_in_two_groups_is_rejected() {
        let err = TenantTable::from_spec(TableSpec::new(vec![
            GroupSpec::tenant("tenant-a", ["s1-eth1", "s1-eth3"]),
            GroupSpec::trunk("trunk", ["s1-eth4", "s1-eth3"]),
        ]))
        .unwrap_err();

        match err {
            ProvisionError::ConfigurationConflict {
                label,
                first,
                second,
            } => {
                assert_eq!(label, "s1-eth3");
                assert_eq!(first, "tenant-a");
                assert_eq!(second, "trunk");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_overlapping_labels_in_two_groups_are_rejected() {
        let err = TenantTable::from_spec(TableSpec::new(vec![
            GroupSpec::tenant("tenant-a", ["s1-eth10"]),
            GroupSpec::tenant("tenant-b", ["s1-eth1"]),
        ]))
        .unwrap_err();

        match err {
            ProvisionError::ConfigurationConflict {
                label,
                first,
                second,
            } => {
                assert_eq!(label, "s1-eth1");
                assert_eq!(first, "tenant-a");
                assert_eq!(second, "tenant-b");
            }
            other => panic!("unexpected error: {other}"),
        }

        // Same overlap, shorter label declared first.
        assert!(TenantTable::from_spec(TableSpec::new(vec![
            GroupSpec::tenant("tenant-a", ["s1-eth1"]),
            GroupSpec::trunk("trunk", ["s1-eth10"]),
        ]))
        .is_err());
    }

    #[test]
    fn test_overlapping_labels_within_one_group_are_allowed() {
        let table = TenantTable::from_spec(TableSpec::new(vec![GroupSpec::tenant(
            "tenant-a",
            ["s1-eth1", "s1-eth10"],
        )]))
        .unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_invalid_groups_are_rejected() {
        let dup = TenantTable::from_spec(TableSpec::new(vec![
            GroupSpec::tenant("t", ["a"]),
            GroupSpec::tenant("t", ["b"]),
        ]));
        assert!(matches!(dup, Err(ProvisionError::InvalidConfig { .. })));

        let empty = TenantTable::from_spec(TableSpec::new(vec![GroupSpec::tenant(
            "t",
            Vec::<String>::new(),
        )]));
        assert!(matches!(empty, Err(ProvisionError::InvalidConfig { .. })));

        let bad_start = TenantTable::from_spec(
            TableSpec::new(vec![GroupSpec::trunk("trunk", ["x"])]).with_trunk_tag_start(0),
        );
        assert!(matches!(bad_start, Err(ProvisionError::InvalidConfig { .. })));
    }

    #[test]
    fn test_trunk_tags_exhausted() {
        let err = TenantTable::from_spec(
            TableSpec::new(vec![
                GroupSpec::trunk("up-1", ["a"]),
                GroupSpec::trunk("up-2", ["b"]),
            ])
            .with_trunk_tag_start(VlanId::MAX),
        )
        .unwrap_err();
        assert!(err.to_string().contains("no trunk tag ids left"));
    }

    #[test]
    fn test_port_label_matches_substring() {
        let label = PortLabel::new("s1-eth1");
        assert!(label.matches(&Port::new(1, "s1-eth1")));
        assert!(label.matches(&Port::new(10, "s1-eth10")));
        assert!(!label.matches(&Port::new(2, "s1-eth2")));
        assert!(!label.matches(&Port::new(1, "s2-eth1")));
    }

    #[test]
    fn test_from_yaml_str() {
        let table = TenantTable::from_yaml_str(
            r#"
trunk_tag_start: 2
groups:
  - name: tenant-a
    kind: tenant
    ports: [s1-eth1, s1-eth3, s2-eth2]
  - name: trunk
    kind: trunk
    ports: [s1-eth4, s2-eth3, s3-eth2]
"#,
        )
        .unwrap();

        let trunk = table.group("trunk").unwrap();
        assert_eq!(trunk.tag().as_u16(), 2);
        assert_eq!(trunk.labels()[1].as_str(), "s2-eth3");
    }

    #[test]
    fn test_from_yaml_str_rejects_unknown_kind() {
        let err = TenantTable::from_yaml_str(
            "groups:\n  - { name: x, kind: customer, ports: [a] }\n",
        )
        .unwrap_err();
        assert!(matches!(err, ProvisionError::ConfigParse { .. }));
    }

    #[test]
    fn test_load_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"groups": [{{"name": "tenant-a", "kind": "tenant", "ports": ["s1-eth1"]}}]}}"#
        )
        .unwrap();

        let table = TenantTable::load(file.path()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.tenants().count(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let err = TenantTable::load("/nonexistent/groups.yaml").unwrap_err();
        assert!(matches!(err, ProvisionError::ConfigRead { .. }));
        assert!(err.is_fatal());
    }
}
