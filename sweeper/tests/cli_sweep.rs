//! CLI tests for the two sweeper phases.
//!
//! Spawns the sweeper binary and verifies state handoff, exit codes, and the
//! files left on disk.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use sweeper::exit_codes;

fn sweeper(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sweeper"))
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("spawn sweeper")
}

fn read_state(path: &Path) -> BTreeMap<String, String> {
    let raw = fs::read_to_string(path).expect("read state");
    serde_json::from_str(&raw).expect("parse state")
}

#[test]
fn stamp_writes_timestamp_and_clears_failure_flag() {
    let temp = tempfile::tempdir().expect("tempdir");

    let output = sweeper(temp.path(), &["stamp"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));

    let state = read_state(&temp.path().join(".sweeper/state.json"));
    let printed = String::from_utf8_lossy(&output.stdout).trim().to_string();
    assert_eq!(state.get("timestamp"), Some(&printed));
    assert!(printed.parse::<u64>().is_ok());
    assert_eq!(state.get("failed").map(String::as_str), Some("false"));
}

#[test]
fn sweep_skips_when_upstream_failed() {
    let temp = tempfile::tempdir().expect("tempdir");
    let stale = temp.path().join("target/debug/app");
    fs::create_dir_all(stale.parent().expect("parent")).expect("mkdir");
    fs::write(&stale, "binary").expect("write");

    let state = temp.path().join("state.json");
    let state_arg = state.to_str().expect("utf8 path");
    assert_eq!(
        sweeper(temp.path(), &["--state", state_arg, "stamp"])
            .status
            .code(),
        Some(exit_codes::OK)
    );
    assert_eq!(
        sweeper(temp.path(), &["--state", state_arg, "mark-failed"])
            .status
            .code(),
        Some(exit_codes::OK)
    );

    let output = sweeper(temp.path(), &["--state", state_arg, "sweep"]);
    assert_eq!(output.status.code(), Some(exit_codes::UPSTREAM_FAILED));
    assert!(stale.exists());
}

#[test]
fn sweep_without_stamp_is_fatal() {
    let temp = tempfile::tempdir().expect("tempdir");
    let output = sweeper(temp.path(), &["sweep"]);
    assert_eq!(output.status.code(), Some(exit_codes::FATAL));
    assert!(String::from_utf8_lossy(&output.stderr).contains("no timestamp recorded"));
}

#[test]
fn invalid_config_is_fatal() {
    let temp = tempfile::tempdir().expect("tempdir");
    fs::write(temp.path().join("sweeper.toml"), "workers = 0\n").expect("write config");
    let output = sweeper(temp.path(), &["stamp"]);
    assert_eq!(output.status.code(), Some(exit_codes::FATAL));
    assert!(!temp.path().join(".sweeper/state.json").exists());
}

#[cfg(unix)]
mod with_fake_cargo {
    use super::*;
    use std::time::{Duration, SystemTime};

    use sweeper::test_support::write_file_with_atime;

    /// Project with a `target` dir and a config whose `cargo` is a shell
    /// script that prints the manifest location, or exits 101 if `broken`.
    fn project(broken: bool) -> tempfile::TempDir {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path();
        fs::write(root.join("Cargo.toml"), "[package]\nname = \"demo\"\n").expect("manifest");

        let script = root.join("fake-cargo.sh");
        let body = if broken {
            "echo 'error: could not find `Cargo.toml`' >&2\nexit 101\n".to_string()
        } else {
            format!("echo {}\n", root.join("Cargo.toml").display())
        };
        fs::write(&script, body).expect("script");

        let config = format!(
            "workers = 2\ncargo = [\"sh\", \"{}\"]\n",
            script.display()
        );
        fs::write(root.join("sweeper.toml"), config).expect("config");
        temp
    }

    #[test]
    fn stamp_then_sweep_removes_stale_files() {
        let temp = project(false);
        let root = temp.path();

        assert_eq!(
            sweeper(root, &["stamp"]).status.code(),
            Some(exit_codes::OK)
        );

        let now = SystemTime::now();
        let stale = root.join("target/debug/deps/libold.rlib");
        let fresh = root.join("target/debug/deps/libnew.rlib");
        let marker = root.join("target/CACHEDIR.TAG");
        let hour = Duration::from_secs(3600);
        write_file_with_atime(&stale, &[0u8; 1536], now - hour).expect("stale");
        write_file_with_atime(&fresh, &[0u8; 10], now + hour).expect("fresh");
        write_file_with_atime(&marker, b"Signature", now - hour).expect("marker");

        let output = sweeper(root, &["sweep"]);
        assert_eq!(output.status.code(), Some(exit_codes::OK));
        assert_eq!(
            String::from_utf8_lossy(&output.stdout).trim(),
            "1.5 KiB of unused build artifacts have been cleaned."
        );
        assert!(!stale.exists());
        assert!(fresh.exists());
        assert!(marker.exists());
        assert!(root.join("target/debug/deps").is_dir());
    }

    #[test]
    fn locate_failure_is_fatal_and_deletes_nothing() {
        let temp = project(true);
        let root = temp.path();
        let stale = root.join("target/debug/app");
        write_file_with_atime(&stale, b"binary", SystemTime::UNIX_EPOCH).expect("stale");

        assert_eq!(
            sweeper(root, &["stamp"]).status.code(),
            Some(exit_codes::OK)
        );
        let output = sweeper(root, &["sweep"]);
        assert_eq!(output.status.code(), Some(exit_codes::FATAL));
        assert!(String::from_utf8_lossy(&output.stderr).contains("exited with code 101"));
        assert!(stale.exists());
    }

    #[test]
    fn run_skips_sweep_when_build_fails() {
        let temp = project(false);
        let root = temp.path();
        let stale = root.join("target/debug/app");
        write_file_with_atime(&stale, b"binary", SystemTime::UNIX_EPOCH).expect("stale");

        let output = sweeper(root, &["run", "--", "sh", "-c", "exit 4"]);
        assert_eq!(output.status.code(), Some(exit_codes::BUILD_FAILED));
        assert!(stale.exists());

        let state = read_state(&root.join(".sweeper/state.json"));
        assert_eq!(state.get("failed").map(String::as_str), Some("true"));
    }

    #[test]
    fn run_sweeps_after_successful_build() {
        let temp = project(false);
        let root = temp.path();
        let stale = root.join("target/release/app");
        write_file_with_atime(&stale, &[0u8; 100], SystemTime::UNIX_EPOCH).expect("stale");

        let output = sweeper(root, &["run", "--", "sh", "-c", "true"]);
        assert_eq!(output.status.code(), Some(exit_codes::OK));
        assert_eq!(
            String::from_utf8_lossy(&output.stdout).trim(),
            "100 B of unused build artifacts have been cleaned."
        );
        assert!(!stale.exists());
    }
}
