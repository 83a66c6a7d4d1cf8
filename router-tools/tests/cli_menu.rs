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
fn menu_dispatches_selected_mode() {
    let dir = tempdir().expect("tempdir");
    router_tools(dir.path())
        .write_stdin("2\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. nat-diff\n2. nat-count\n3. config-diff"))
        .stdout(predicate::str::contains("Mode:   nat-count"))
        .stdout(predicate::str::contains("Count:  4"));
}

#[test]
fn explicit_menu_subcommand_runs_config_diff() {
    let dir = tempdir().expect("tempdir");
    router_tools(dir.path())
        .arg("menu")
        .write_stdin("3\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("--- edge-a:running-config"));
}

#[test]
fn invalid_selection_exits_one() {
    let dir = tempdir().expect("tempdir");
    router_tools(dir.path())
        .write_stdin("7\n")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Invalid selection."));
}
