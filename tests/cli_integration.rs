//! Integration tests for the encrypted-storage CLI.
//!
//! These exercise the binary end-to-end using `assert_cmd`. The OS
//! keyring is not available on CI, so store behaviour is driven through
//! `--backend memory serve`, which keeps one store alive for a whole
//! stdin session.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

/// Helper: get a Command pointing at the encrypted-storage binary,
/// running inside `dir` so no config or audit files leak.
fn encrypted_storage(dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("encrypted-storage").expect("binary should exist");
    cmd.current_dir(dir.path())
        .env_remove("ENCRYPTED_STORAGE_BACKEND");
    cmd
}

#[test]
fn help_flag_shows_usage() {
    let tmp = TempDir::new().unwrap();
    encrypted_storage(&tmp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("OS credential vault"))
        .stdout(predicate::str::contains("set"))
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("remove"))
        .stdout(predicate::str::contains("clear"))
        .stdout(predicate::str::contains("serve"));
}

#[test]
fn version_flag_shows_version() {
    let tmp = TempDir::new().unwrap();
    encrypted_storage(&tmp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("encrypted-storage"));
}

#[test]
fn no_args_shows_help() {
    let tmp = TempDir::new().unwrap();
    encrypted_storage(&tmp)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn serve_answers_host_calls() {
    let tmp = TempDir::new().unwrap();
    let input = "\
{\"id\":1,\"method\":\"setItem\",\"args\":[\"token\",\"abc123\"]}
{\"id\":2,\"method\":\"getItem\",\"args\":[\"token\"]}
{\"id\":3,\"method\":\"removeItem\",\"args\":[\"token\"]}
{\"id\":4,\"method\":\"getItem\",\"args\":[\"token\"]}
";

    encrypted_storage(&tmp)
        .args(["--backend", "memory", "serve"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"{"id":1,"resolve":"abc123"}"#))
        .stdout(predicate::str::contains(r#"{"id":2,"resolve":"abc123"}"#))
        .stdout(predicate::str::contains(r#"{"id":3,"resolve":"token"}"#))
        .stdout(predicate::str::contains(r#"{"id":4,"resolve":null}"#));
}

#[test]
fn get_missing_key_exits_zero_with_empty_stdout() {
    let tmp = TempDir::new().unwrap();
    encrypted_storage(&tmp)
        .args(["--backend", "memory", "get", "nope"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("No value stored"));
}

#[test]
fn read_only_commands_leave_no_audit_files() {
    let tmp = TempDir::new().unwrap();
    encrypted_storage(&tmp)
        .args(["--backend", "memory", "get", "nope"])
        .assert()
        .success();
    encrypted_storage(&tmp)
        .args(["--backend", "memory", "list"])
        .assert()
        .success();

    tmp.child(".encrypted-storage").assert(predicate::path::missing());
}

#[test]
fn remove_missing_key_succeeds() {
    let tmp = TempDir::new().unwrap();
    encrypted_storage(&tmp)
        .args(["--backend", "memory", "remove", "nope"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 'nope'"));
}

#[test]
fn set_reads_piped_value() {
    let tmp = TempDir::new().unwrap();
    encrypted_storage(&tmp)
        .args(["--backend", "memory", "set", "token"])
        .write_stdin("abc123\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Stored 'token'"));
}

#[test]
fn clear_with_force_on_empty_store_succeeds() {
    let tmp = TempDir::new().unwrap();
    encrypted_storage(&tmp)
        .args(["--backend", "memory", "clear", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared RN_ENCRYPTED_STORAGE_VAULT"));
}

#[test]
fn config_file_sets_backend_and_resource() {
    let tmp = TempDir::new().unwrap();
    tmp.child(".encrypted-storage.toml")
        .write_str("backend = \"memory\"\nresource_name = \"MY_APP\"\naudit = false\n")
        .unwrap();

    encrypted_storage(&tmp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("MY_APP"));

    tmp.child(".encrypted-storage").assert(predicate::path::missing());
}

#[test]
fn invalid_config_is_reported() {
    let tmp = TempDir::new().unwrap();
    tmp.child(".encrypted-storage.toml")
        .write_str("not valid {{toml")
        .unwrap();

    encrypted_storage(&tmp)
        .args(["--backend", "memory", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file error"));
}

#[test]
fn audit_records_serve_calls() {
    let tmp = TempDir::new().unwrap();
    encrypted_storage(&tmp)
        .args(["--backend", "memory", "serve"])
        .write_stdin("{\"method\":\"setItem\",\"args\":[\"token\",\"super-secret\"]}\n")
        .assert()
        .success();

    tmp.child(".encrypted-storage/audit.db")
        .assert(predicate::path::exists());

    encrypted_storage(&tmp)
        .args(["audit", "--last", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("setItem"))
        .stdout(predicate::str::contains("token"))
        .stdout(predicate::str::contains("super-secret").not());
}

#[test]
fn completions_for_unknown_shell_fail() {
    let tmp = TempDir::new().unwrap();
    encrypted_storage(&tmp)
        .args(["completions", "csh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'csh'"));
}

#[test]
fn completions_for_bash_print_script() {
    let tmp = TempDir::new().unwrap();
    encrypted_storage(&tmp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("encrypted-storage"));
}
