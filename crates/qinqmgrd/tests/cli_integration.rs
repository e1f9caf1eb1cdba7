//! Command line behavior of the qinqmgrd binary

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use pretty_assertions::assert_eq;
use qinq_common::FlowRequest;

fn sample(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../config")
        .join(name)
}

fn qinqmgrd(args: &[&Path]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_qinqmgrd"));
    cmd.env_remove("RUST_LOG").env_remove("QINQMGRD_CONFIG");
    for pair in args.chunks(2) {
        cmd.arg(pair[0]).arg(pair[1]);
    }
    cmd.output().expect("failed to start qinqmgrd")
}

#[test]
fn test_inventory_replay_prints_only_flow_json() {
    let config = sample("groups.yaml");
    let inventory = sample("inventory.yaml");
    let output = qinqmgrd(&[
        Path::new("--config"),
        config.as_path(),
        Path::new("--inventory"),
        inventory.as_path(),
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let requests: Vec<FlowRequest> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("stdout line is a flow request"))
        .collect();
    assert_eq!(requests.len(), 8);
}

#[test]
fn test_inventory_is_optional() {
    let config = sample("groups.yaml");
    let output = qinqmgrd(&[Path::new("--config"), config.as_path()]);

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_rejected_config_exits_non_zero() {
    let mut config = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(
        config,
        "groups:\n  - {{ name: tenant-a, kind: tenant, ports: [s1-eth1] }}\n  - {{ name: trunk, kind: trunk, ports: [s1-eth1] }}"
    )
    .unwrap();
    let inventory = sample("inventory.yaml");

    let output = qinqmgrd(&[
        Path::new("--config"),
        config.path(),
        Path::new("--inventory"),
        inventory.as_path(),
    ]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("claimed by both"));
}
