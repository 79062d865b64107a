//! Integration tests for the app-packager CLI
//!
//! These tests run the built binary end-to-end without touching the network.

use std::process::Command;

/// Get the path to the app-packager binary
fn packager_binary() -> std::path::PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // Remove test executable name
    path.pop(); // Remove deps directory

    path.push("app-packager");

    if cfg!(windows) {
        path.set_extension("exe");
    }

    path
}

/// Run app-packager with a clean settings environment
fn run_packager(args: &[&str]) -> std::process::Output {
    let home = tempfile::tempdir().unwrap();

    Command::new(packager_binary())
        .args(args)
        .env("HOME", home.path())
        .env_remove("SUMOLOGIC_DEPLOYMENT")
        .env_remove("SUMOLOGIC_ACCESS_ID")
        .env_remove("SUMOLOGIC_ACCESS_KEY")
        .env_remove("TERRAFORMER_PATH")
        .output()
        .expect("Failed to execute app-packager")
}

#[test]
fn test_version() {
    let output = run_packager(&["--version"]);

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("app-packager"));
}

#[test]
fn test_help_lists_commands() {
    let output = run_packager(&["--help"]);

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("Commands:"));
    assert!(stdout.contains("import"));
    assert!(stdout.contains("discover"));
    assert!(stdout.contains("screenshots"));
}

#[test]
fn test_import_help() {
    let output = run_packager(&["import", "--help"]);

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--folder-id"));
    assert!(stdout.contains("--dest"));
    assert!(stdout.contains("--skip-dashboards"));
    assert!(stdout.contains("--deployment"));
}

#[test]
fn test_import_requires_folder_id() {
    let output = run_packager(&["import", "--dest", "out"]);

    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--folder-id"));
}

#[test]
fn test_discover_without_deployment_fails() {
    let output = run_packager(&["discover", "--folder-id", "000000000000000A"]);

    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("deployment"));
}

#[test]
fn test_discover_rejects_invalid_folder_id() {
    let output = run_packager(&[
        "discover",
        "--deployment",
        "us2",
        "--folder-id",
        "not-a-folder",
    ]);

    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not-a-folder"));
}

#[test]
fn test_missing_config_file_fails() {
    let output = run_packager(&[
        "--config",
        "/definitely/not/here.yaml",
        "discover",
        "--folder-id",
        "10",
    ]);

    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Config file not found"));
}
