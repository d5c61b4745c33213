use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_keep"))
}

const MASTER_PASSWORD: &str = "flow-test-master-password";

/// Low scrypt cost so the flow tests stay fast; the CLI behavior under test
/// does not depend on the work factor.
const TEST_SCRYPT_LOG_N: &str = "12";

fn keep(store_dir: &Path, password: &str) -> Command {
    let mut cmd = Command::new(bin());
    cmd.env_clear()
        .env("PATH", std::env::var_os("PATH").unwrap_or_default())
        .env("KEEP_STORE_DIR", store_dir)
        .env("KEEP_PASSWORD", password)
        .env("KEEP_SCRYPT_LOG_N", TEST_SCRYPT_LOG_N);
    cmd
}

fn run_with_stdin(mut cmd: Command, stdin_data: &[u8]) -> Output {
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    let mut child = cmd.spawn().expect("spawn keep");
    child
        .stdin
        .take()
        .expect("stdin handle")
        .write_all(stdin_data)
        .expect("write stdin");
    child.wait_with_output().expect("wait for keep")
}

fn set_item(store_dir: &Path, key: &str, data: &[u8]) -> String {
    let mut cmd = keep(store_dir, MASTER_PASSWORD);
    cmd.arg("set").arg(key);
    let output = run_with_stdin(cmd, data);
    assert!(
        output.status.success(),
        "set failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8(output.stdout).expect("utf8 stdout");
    stdout
        .trim_end()
        .rsplit(' ')
        .next()
        .expect("access password in output")
        .to_string()
}

#[test]
fn set_prints_access_password() {
    let dir = tempfile::tempdir().expect("tempdir");
    let access = set_item(dir.path(), "item/1", b"hello");
    assert_eq!(access.len(), 40);
    assert!(access.starts_with("vvvvv"));
}

#[test]
fn get_round_trip_with_master_and_access_password() {
    let dir = tempfile::tempdir().expect("tempdir");
    let access = set_item(dir.path(), "item/1", b"hello");

    // Retrieve to stdout with the master password.
    let output = run_with_stdin(
        {
            let mut cmd = keep(dir.path(), MASTER_PASSWORD);
            cmd.arg("get").arg("-").arg("item/1");
            cmd
        },
        b"",
    );
    assert!(output.status.success());
    assert_eq!(output.stdout, b"hello");

    // Retrieve to stdout with the access password.
    let output = run_with_stdin(
        {
            let mut cmd = keep(dir.path(), &access);
            cmd.arg("get").arg("-").arg("item/1");
            cmd
        },
        b"",
    );
    assert!(output.status.success());
    assert_eq!(output.stdout, b"hello");
}

#[test]
fn get_writes_target_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    set_item(dir.path(), "item/1", b"file contents");

    let target = dir.path().join("out.bin");
    let output = run_with_stdin(
        {
            let mut cmd = keep(dir.path(), MASTER_PASSWORD);
            cmd.arg("get").arg(&target).arg("item/1");
            cmd
        },
        b"",
    );
    assert!(output.status.success());
    assert_eq!(std::fs::read(&target).expect("read target"), b"file contents");
}

#[test]
fn pass_prints_registered_access_password() {
    let dir = tempfile::tempdir().expect("tempdir");
    let access = set_item(dir.path(), "item/1", b"hello");

    let output = run_with_stdin(
        {
            let mut cmd = keep(dir.path(), MASTER_PASSWORD);
            cmd.arg("pass").arg("item/1");
            cmd
        },
        b"",
    );
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim_end(),
        access
    );
}

#[test]
fn wrong_password_fails_and_writes_no_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    set_item(dir.path(), "item/1", b"hello");

    let target = dir.path().join("should-not-exist");
    let output = run_with_stdin(
        {
            let mut cmd = keep(dir.path(), "wrong-master-password");
            cmd.arg("get").arg(&target).arg("item/1");
            cmd
        },
        b"",
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error"));
    assert!(!target.exists());
}

#[test]
fn invalid_key_fails_with_message() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = run_with_stdin(
        {
            let mut cmd = keep(dir.path(), MASTER_PASSWORD);
            cmd.arg("set").arg("bad*key");
            cmd
        },
        b"data",
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid key"));
}

#[test]
fn set_with_access_password_is_refused() {
    let dir = tempfile::tempdir().expect("tempdir");
    let access = set_item(dir.path(), "item/1", b"hello");

    let output = run_with_stdin(
        {
            let mut cmd = keep(dir.path(), &access);
            cmd.arg("set").arg("item/2");
            cmd
        },
        b"data",
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("master password"));
}

#[test]
fn missing_store_configuration_fails() {
    let mut cmd = Command::new(bin());
    cmd.env_clear()
        .env("PATH", std::env::var_os("PATH").unwrap_or_default())
        .env("KEEP_PASSWORD", MASTER_PASSWORD)
        .arg("set")
        .arg("item/1");
    let output = run_with_stdin(cmd, b"data");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("mandatory"));
}

#[test]
fn get_before_any_set_reports_item_not_found() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = run_with_stdin(
        {
            let mut cmd = keep(dir.path(), MASTER_PASSWORD);
            cmd.arg("get").arg("-").arg("item/1");
            cmd
        },
        b"",
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not found"));
}
