//! Shared E2E test helpers for `specbus` binary tests.

use assert_cmd::cargo::cargo_bin_cmd;
use std::path::Path;
use std::time::Duration;

/// Default timeout for CLI tests.
pub const TIMEOUT_BASIC: Duration = Duration::from_secs(10);

/// Environment variables that would leak host configuration into a test.
const HOST_VARS: &[&str] = &[
    "RUST_LOG",
    "SPECBUS_DEBUG",
    "SPECBUS_CATCH_PANICS",
    "SPECBUS_SLOW_HANDLER_MS",
    "SPECBUS_LOG_LEVEL",
];

/// Build a Command for the `specbus` binary with an isolated HOME and
/// project root.
///
/// Returns (command, _guard). Keep the guard alive for the test's duration.
pub fn specbus_cmd() -> (assert_cmd::Command, tempfile::TempDir) {
    let tmp = tempfile::tempdir().expect("create temp dir for HOME");
    let mut cmd: assert_cmd::Command = cargo_bin_cmd!("specbus");
    cmd.timeout(TIMEOUT_BASIC);
    for var in HOST_VARS {
        cmd.env_remove(var);
    }
    cmd.env("HOME", tmp.path());
    cmd.args(["-C", tmp.path().to_str().expect("valid utf8")]);
    (cmd, tmp)
}

/// Writes a JSON extension file into `dir` and returns its path as a string.
pub fn write_extension(dir: &Path, file: &str, content: &str) -> String {
    let path = dir.join(file);
    std::fs::write(&path, content).expect("write extension file");
    path.to_str().expect("valid utf8").to_string()
}

/// Writes `.specbus/config.toml` under the project root `dir`.
pub fn write_project_config(dir: &Path, content: &str) {
    let config_dir = dir.join(".specbus");
    std::fs::create_dir_all(&config_dir).expect("create .specbus");
    std::fs::write(config_dir.join("config.toml"), content).expect("write config");
}
