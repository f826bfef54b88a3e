//! Shared E2E test helpers for `pagegate` binary tests.

use assert_cmd::cargo::cargo_bin_cmd;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

/// Default timeout for CLI tests.
pub const TIMEOUT_BASIC: Duration = Duration::from_secs(10);

/// Environment variables read by the config loader.
const PAGEGATE_VARS: &[&str] = &[
    "PAGEGATE_DEBUG",
    "PAGEGATE_SECURITY",
    "PAGEGATE_REDIRECT",
    "PAGEGATE_ALLOWED_GROUPS",
    "PAGEGATE_VERIFY_TOKEN",
];

/// A project directory with `.pagegate/config.toml`.
///
/// Keep the returned value alive for the test's duration.
pub fn project(config: &str) -> TempDir {
    let dir = tempfile::tempdir().expect("create temp project");
    let config_dir = dir.path().join(".pagegate");
    std::fs::create_dir_all(&config_dir).expect("create .pagegate");
    std::fs::write(config_dir.join("config.toml"), config).expect("write config");
    dir
}

/// Build a `pagegate` command isolated from the host's config and env.
pub fn pagegate_cmd(project: &Path) -> assert_cmd::Command {
    let mut cmd: assert_cmd::Command = cargo_bin_cmd!("pagegate");
    cmd.timeout(TIMEOUT_BASIC);
    for var in PAGEGATE_VARS {
        cmd.env_remove(var);
    }
    cmd.env_remove("RUST_LOG");
    cmd.arg("--no-global-config")
        .arg("-C")
        .arg(project.as_os_str());
    cmd
}

/// Parses the single JSON line a successful command prints.
pub fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(stdout.trim()).expect("stdout is one JSON object")
}
