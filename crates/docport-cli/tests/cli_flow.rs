//! cli_flow.rs
//!
//! Drives the `docport` binary end to end against the shared fixtures:
//! import, validate, migrate, then export a session and import it again.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use serde_json::Value;
use tempfile::tempdir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../docport-core/tests/fixtures")
        .join(name)
}

fn docport() -> Command {
    let mut cmd = Command::cargo_bin("docport").unwrap();
    cmd.env("DOCPORT_LOG", "off");
    cmd
}

fn stdout_json(out: &std::process::Output) -> Value {
    serde_json::from_slice(&out.stdout).unwrap()
}

#[test]
fn import_reports_success() {
    let out = docport()
        .args(["--json", "import"])
        .arg(fixture("contract_v1_1_0.json"))
        .output()
        .unwrap();
    assert!(out.status.success());
    let v = stdout_json(&out);
    assert_eq!(v["success"], true);
    assert_eq!(v["document"]["version"], "1.1.0");
    assert!(v["validation"]["warnings"].as_array().unwrap().is_empty());
}

#[test]
fn non_json_extension_is_a_file_read_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("contract.txt");
    fs::copy(fixture("contract_v1_1_0.json"), &path).unwrap();

    let out = docport().args(["--json", "import"]).arg(&path).output().unwrap();
    assert_eq!(out.status.code(), Some(1));
    let v = stdout_json(&out);
    assert_eq!(v["success"], false);
    assert_eq!(v["validation"]["errors"][0]["code"], "FILE_READ_ERROR");
}

#[test]
fn legacy_import_needs_auto_migrate() {
    let out = docport()
        .args(["--json", "import"])
        .arg(fixture("legacy_v1_0_0.json"))
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(stdout_json(&out)["validation"]["errors"][0]["code"], "VERSION_MISMATCH");

    let out = docport()
        .args(["--json", "import", "--auto-migrate"])
        .arg(fixture("legacy_v1_0_0.json"))
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_eq!(stdout_json(&out)["document"]["version"], "1.1.0");
}

#[test]
fn migrate_writes_current_version() {
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("migrated.json");

    docport()
        .arg("migrate")
        .arg(fixture("legacy_v1_0_0.json"))
        .arg("--out")
        .arg(&out_path)
        .assert()
        .success();

    let v: Value = serde_json::from_str(&fs::read_to_string(&out_path).unwrap()).unwrap();
    assert_eq!(v["version"], "1.1.0");
    assert_eq!(v["pageConfig"]["showPageNumbers"], true);
    assert_eq!(v["pageConfig"]["pageGap"], 40.0);
    assert!(v["signingWorkflow"].is_object());
}

#[test]
fn validate_json_lists_schema_errors() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, r#"{"version":"1.1.0","content":{"type":"doc"}}"#).unwrap();

    let out = docport().args(["--json", "validate"]).arg(&path).output().unwrap();
    assert_eq!(out.status.code(), Some(1));
    let v = stdout_json(&out);
    assert_eq!(v["valid"], false);
    let errors = v["errors"].as_array().unwrap();
    assert!(!errors.is_empty());
    assert!(errors.iter().all(|e| e["code"] == "SCHEMA_ERROR"));
}

#[test]
fn catalog_flags_orphans() {
    let dir = tempdir().unwrap();
    let catalog = dir.path().join("vars.json");
    fs::write(&catalog, r#"[{"variableId":"buyer_name"}]"#).unwrap();

    let out = docport()
        .args(["--json", "import", "--catalog"])
        .arg(&catalog)
        .arg(fixture("contract_v1_1_0.json"))
        .output()
        .unwrap();
    assert!(out.status.success());
    let v = stdout_json(&out);
    let orphaned = v["orphanedVariables"].as_array().unwrap();
    assert!(!orphaned.is_empty());
    assert!(!orphaned.iter().any(|o| o == "buyer_name"));
}

#[test]
fn export_session_then_reimport_with_checksum() {
    let dir = tempdir().unwrap();
    let session = dir.path().join("session.json");
    let exported = dir.path().join("out").join("exported.json");

    docport()
        .arg("import")
        .arg(fixture("contract_v1_1_0.json"))
        .arg("--state-out")
        .arg(&session)
        .assert()
        .success();
    assert!(session.exists());

    docport()
        .arg("export")
        .arg(&session)
        .args(["--checksum", "--exported-by", "tester", "--out"])
        .arg(&exported)
        .assert()
        .success();

    let doc: Value = serde_json::from_str(&fs::read_to_string(&exported).unwrap()).unwrap();
    assert_eq!(doc["exportInfo"]["exportedBy"], "tester");
    assert_eq!(doc["exportInfo"]["checksum"].as_str().unwrap().len(), 64);
    assert!(doc["exportInfo"]["sourceApp"]
        .as_str()
        .unwrap()
        .starts_with("docport-cli/"));

    let out = docport()
        .args(["--json", "import", "--verify-checksum"])
        .arg(&exported)
        .output()
        .unwrap();
    assert!(out.status.success());
    let v = stdout_json(&out);
    assert!(v["validation"]["warnings"].as_array().unwrap().is_empty());
}
