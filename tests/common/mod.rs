// Shared test helpers for integration tests.
// Used by cli_contract.rs and cli_flows.rs.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

pub fn binary_path() -> PathBuf {
    let path = PathBuf::from(env!("CARGO_BIN_EXE_claude-settings-merge"));
    assert!(path.exists(), "binary not found at {}", path.display());
    path
}

/// Runs the binary from `cwd` with the given args.
/// Returns (stdout, stderr, exit_code).
pub fn run_merge(cwd: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(binary_path())
        .current_dir(cwd)
        .args(args)
        .output()
        .expect("failed to execute binary");

    let stdout = String::from_utf8(output.stdout).expect("stdout not valid UTF-8");
    let stderr = String::from_utf8(output.stderr).expect("stderr not valid UTF-8");
    let exit_code = output.status.code().unwrap_or(-1);
    (stdout, stderr, exit_code)
}

/// Runs the binary against `root`, writing to `output`.
/// The working directory is the parent of `root`, which need not exist itself.
pub fn run_merge_into(root: &Path, output: &Path, extra_args: &[&str]) -> (String, String, i32) {
    let cwd = root.parent().expect("root must have a parent");
    let mut args = vec![root.to_str().unwrap(), "-o", output.to_str().unwrap()];
    args.extend_from_slice(extra_args);
    run_merge(cwd, &args)
}

/// Writes `<root>/<project>/.claude/settings.local.json` and returns its path.
pub fn write_local_settings(root: &Path, project: &str, content: &str) -> PathBuf {
    let dir = root.join(project).join(".claude");
    fs::create_dir_all(&dir).expect("failed to create .claude dir");
    let path = dir.join("settings.local.json");
    fs::write(&path, content).expect("failed to write settings");
    path
}

/// A local settings document with the given allow list.
pub fn allow_json(allow: &[&str]) -> String {
    serde_json::json!({ "permissions": { "allow": allow } }).to_string()
}

pub fn read_json(path: &Path) -> serde_json::Value {
    let text = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()));
    serde_json::from_str(&text).expect("output should be valid JSON")
}
