use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn fixture(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join(path)
}

fn router_tools(workdir: &std::path::Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("router-tools"));
    cmd.current_dir(workdir)
        .env("ROUTER_HOST_1", "edge-a")
        .env("ROUTER_HOST_2", "edge-b")
        .arg("--no-color")
        .arg("--snapshots")
        .arg(fixture("fixtures/snapshots"));
    cmd
}

#[test]
fn counts_first_router_by_default() {
    let dir = tempdir().expect("tempdir");
    router_tools(dir.path())
        .arg("nat-count")
        .assert()
        .success()
        .stdout(predicate::str::contains("Mode:   nat-count"))
        .stdout(predicate::str::contains(
            "Router: edge-a\nMatch:  ip nat inside source static\nCount:  4\nTook:   ",
        ));
}

#[test]
fn counts_second_router_on_request() {
    let dir = tempdir().expect("tempdir");
    router_tools(dir.path())
        .args(["nat-count", "--router", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Router: edge-b"))
        .stdout(predicate::str::contains("Count:  5"));
}

#[test]
fn unreachable_router_exits_with_generic_error() {
    let dir = tempdir().expect("tempdir");
    router_tools(dir.path())
        .env("ROUTER_HOST_1", "ghost")
        .arg("nat-count")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("cannot fetch from ghost"));
}

#[test]
fn json_output_has_count() {
    let dir = tempdir().expect("tempdir");
    router_tools(dir.path())
        .args(["--format", "json", "nat-count"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\": 4"))
        .stdout(predicate::str::contains("\"match_prefix\": \"ip nat inside source static\""));
}

#[test]
fn dotenv_file_supplies_missing_settings() {
    let dir = tempdir().expect("tempdir");
    std::fs::write(dir.path().join(".env"), "ROUTER_HOST_1=edge-b\n").expect("write .env");
    router_tools(dir.path())
        .env_remove("ROUTER_HOST_1")
        .arg("nat-count")
        .assert()
        .success()
        .stdout(predicate::str::contains("Router: edge-b"));
}

#[test]
fn malformed_dotenv_file_is_fatal() {
    let dir = tempdir().expect("tempdir");
    std::fs::write(dir.path().join(".env"), "ROUTER_HOST_1='edge-b\n").expect("write .env");
    router_tools(dir.path())
        .arg("nat-count")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("ERROR: failed to load .env"))
        .stdout(predicate::str::is_empty());
}
