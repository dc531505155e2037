//! Integration tests for the subcommand handlers, driven through their
//! `run_*` entry points against the shipped contract documents.

use std::path::PathBuf;

use scx_cli::canonicalize::{run_canonicalize, CanonicalizeArgs};
use scx_cli::config::ContractArgs;
use scx_cli::drift::{run_drift, DriftArgs};
use scx_cli::validate::{run_validate, ValidateArgs};
use scx_schema::DEFAULT_SCHEMA_DIR;

fn repo_root() -> PathBuf {
    let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    dir.pop(); // crates/
    dir.pop(); // repo root
    dir
}

fn fixture_payload() -> PathBuf {
    repo_root().join("crates/scx-schema/tests/fixtures/scenes_v2.json")
}

fn contract(version: &str) -> ContractArgs {
    ContractArgs {
        schema_roots: vec![repo_root()],
        schema_version: Some(version.to_string()),
        schema_dir: PathBuf::from(DEFAULT_SCHEMA_DIR),
    }
}

fn write_json(dir: &tempfile::TempDir, name: &str, value: &serde_json::Value) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

#[test]
fn validate_reports_violations_with_exit_code_one() {
    let args = ValidateArgs {
        payload: fixture_payload(),
        contract: contract("v2"),
        json: false,
    };
    assert_eq!(run_validate(&args, &repo_root()).unwrap(), 1);
}

#[test]
fn validate_clean_payload_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let payload = write_json(
        &dir,
        "clean.json",
        &serde_json::json!([{
            "code": "projects.list",
            "name": "Projects",
            "layout": {"kind": "list"},
            "access": {"visible": true},
            "target": {"model": "project.project"},
            "list_profile": {
                "columns": ["name"],
                "hidden_columns": ["create_uid", "write_uid"],
                "row_primary": "name"
            }
        }]),
    );
    let args = ValidateArgs {
        payload,
        contract: contract("2"),
        json: true,
    };
    assert_eq!(run_validate(&args, &repo_root()).unwrap(), 0);
}

#[test]
fn validate_missing_contract_is_an_error() {
    let mut contract = contract("v2");
    contract.schema_dir = PathBuf::from("no-such-tree/contract-docs");
    let args = ValidateArgs {
        payload: fixture_payload(),
        contract,
        json: false,
    };
    let err = run_validate(&args, &repo_root()).unwrap_err();
    assert!(format!("{err:#}").contains("scene_schema_v2.json"));
}

#[test]
fn canonicalize_writes_snapshot_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("snapshot.json");
    let args = CanonicalizeArgs {
        payload: fixture_payload(),
        output: Some(output.clone()),
        digest: true,
    };
    assert_eq!(run_canonicalize(&args, &repo_root()).unwrap(), 0);

    let snapshot: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    let codes: Vec<&str> = snapshot
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, ["finance.dashboard", "portal.home", "projects.list"]);
}

#[test]
fn drift_between_payload_and_its_snapshot_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("snapshot.json");
    let canonicalize = CanonicalizeArgs {
        payload: fixture_payload(),
        output: Some(output.clone()),
        digest: false,
    };
    run_canonicalize(&canonicalize, &repo_root()).unwrap();

    let args = DriftArgs {
        expected: output,
        actual: fixture_payload(),
        json: false,
    };
    assert_eq!(run_drift(&args, &repo_root()).unwrap(), 0);
}

#[test]
fn drift_detects_changed_scene() {
    let dir = tempfile::tempdir().unwrap();
    let expected = write_json(
        &dir,
        "expected.json",
        &serde_json::json!([{"code": "a", "name": "A"}, {"code": "b", "name": "B"}]),
    );
    let actual = write_json(
        &dir,
        "actual.json",
        &serde_json::json!({"scenes": [{"code": "a", "name": "Renamed"}, {"code": "c"}]}),
    );
    let args = DriftArgs {
        expected,
        actual,
        json: true,
    };
    assert_eq!(run_drift(&args, &repo_root()).unwrap(), 1);
}
