//! Integration tests for the `lak` binary.
//!
//! Every test runs in its own temp dir with `LAK_PASSWORD` set, so no
//! interactive prompt is ever shown.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

const PASSWORD: &str = "correct-horse";

/// Helper: get a Command pointing at the lak binary.
fn lak() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("lak").expect("binary should exist")
}

/// Helper: `lak` running inside `dir` with the test password.
fn lak_in(dir: &TempDir) -> Command {
    let mut cmd = lak();
    cmd.current_dir(dir.path())
        .env("LAK_PASSWORD", PASSWORD)
        .env_remove("LAK_VAULT")
        .env_remove("LAK_LOG");
    cmd
}

/// Helper: a temp dir holding a freshly initialized `vault.lak`.
fn initialized() -> TempDir {
    let tmp = TempDir::new().unwrap();
    lak_in(&tmp).arg("init").assert().success();
    tmp
}

// ---------------------------------------------------------------------------
// Help and arguments
// ---------------------------------------------------------------------------

#[test]
fn help_flag_shows_usage() {
    lak()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Local encrypted password vault"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("group"))
        .stdout(predicate::str::contains("export"))
        .stdout(predicate::str::contains("import"))
        .stdout(predicate::str::contains("generate"));
}

#[test]
fn version_flag_shows_version() {
    lak()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("lak"));
}

#[test]
fn no_args_shows_help() {
    lak()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn secret_and_generate_conflict() {
    lak()
        .args(["add", "Mail", "--secret", "x", "--generate"])
        .assert()
        .failure();
}

// ---------------------------------------------------------------------------
// Vault lifecycle
// ---------------------------------------------------------------------------

#[test]
fn init_creates_vault_file() {
    let tmp = initialized();
    tmp.child("vault.lak").assert(predicate::path::exists());
}

#[test]
fn init_refuses_to_overwrite() {
    let tmp = initialized();
    lak_in(&tmp)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn init_rejects_short_password() {
    let tmp = TempDir::new().unwrap();
    lak_in(&tmp)
        .env("LAK_PASSWORD", "short")
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 8"));
}

#[test]
fn list_on_missing_vault_fails() {
    let tmp = TempDir::new().unwrap();
    lak_in(&tmp)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn wrong_password_fails() {
    let tmp = initialized();
    lak_in(&tmp)
        .env("LAK_PASSWORD", "not-the-password")
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Wrong password"));
}

#[test]
fn add_show_and_reveal() {
    let tmp = initialized();
    lak_in(&tmp)
        .args(["add", "Mail", "--secret", "hunter2", "--login", "me@example.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Entry #1"));

    lak_in(&tmp)
        .args(["show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("me@example.com"))
        .stdout(predicate::str::contains("hunter2").not());

    lak_in(&tmp)
        .args(["show", "1", "--reveal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hunter2"));
}

#[test]
fn add_reads_piped_secret() {
    let tmp = initialized();
    lak_in(&tmp)
        .args(["add", "Piped"])
        .write_stdin("from-stdin\n")
        .assert()
        .success();

    lak_in(&tmp)
        .args(["show", "1", "--reveal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("from-stdin"));
}

#[test]
fn edit_keeps_unspecified_fields() {
    let tmp = initialized();
    lak_in(&tmp)
        .args(["add", "Mail", "--secret", "hunter2", "--login", "me"])
        .assert()
        .success();
    lak_in(&tmp)
        .args(["edit", "1", "--name", "Email"])
        .assert()
        .success();

    lak_in(&tmp)
        .args(["show", "1", "--reveal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Email"))
        .stdout(predicate::str::contains("hunter2"))
        .stdout(predicate::str::contains("me"));
}

#[test]
fn list_filters_by_glob() {
    let tmp = initialized();
    for name in ["apple", "Amazon", "banana"] {
        lak_in(&tmp)
            .args(["add", name, "--secret", "pw"])
            .assert()
            .success();
    }

    lak_in(&tmp)
        .args(["list", "--filter", "a*"])
        .assert()
        .success()
        .stdout(predicate::str::contains("apple"))
        .stdout(predicate::str::contains("Amazon"))
        .stdout(predicate::str::contains("banana").not());
}

#[test]
fn list_json_masks_secrets() {
    let tmp = initialized();
    lak_in(&tmp)
        .args(["add", "Mail", "--secret", "hunter2"])
        .assert()
        .success();

    lak_in(&tmp)
        .args(["list", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"Mail\""))
        .stdout(predicate::str::contains("hunter2").not());
}

#[test]
fn delete_is_idempotent() {
    let tmp = initialized();
    lak_in(&tmp)
        .args(["add", "Mail", "--secret", "pw"])
        .assert()
        .success();

    lak_in(&tmp)
        .args(["delete", "1", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted entry #1"));
    lak_in(&tmp)
        .args(["delete", "1", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to delete"));
}

#[test]
fn deleting_group_ungroups_entries() {
    let tmp = initialized();
    lak_in(&tmp)
        .args(["group", "add", "Work", "--icon", "terminal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Group #1"));
    lak_in(&tmp)
        .args(["add", "VPN", "--secret", "pw", "--group", "1"])
        .assert()
        .success();

    lak_in(&tmp)
        .args(["group", "delete", "1", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 entries ungrouped"));

    lak_in(&tmp)
        .args(["show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("VPN"));
}

#[test]
fn add_with_unknown_group_fails() {
    let tmp = initialized();
    lak_in(&tmp)
        .args(["add", "VPN", "--secret", "pw", "--group", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Group #7 not found"));
}

// ---------------------------------------------------------------------------
// Export and import
// ---------------------------------------------------------------------------

#[test]
fn export_then_import_into_new_vault() {
    let tmp = initialized();
    lak_in(&tmp)
        .args(["group", "add", "Personal", "--icon", "mail"])
        .assert()
        .success();
    lak_in(&tmp)
        .args(["add", "Mail", "--secret", "hunter2", "--group", "1"])
        .assert()
        .success();

    lak_in(&tmp).args(["export", "dump.csv"]).assert().success();
    tmp.child("dump.csv")
        .assert(predicate::str::contains("# Entries:"))
        .assert(predicate::str::contains("hunter2"));

    lak_in(&tmp)
        .args(["--vault", "second.lak", "init"])
        .assert()
        .success();
    lak_in(&tmp)
        .args(["--vault", "second.lak", "import", "dump.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 rows"));

    lak_in(&tmp)
        .args(["--vault", "second.lak", "show", "1", "--reveal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hunter2"))
        .stdout(predicate::str::contains("Personal"));
}

#[test]
fn export_refuses_lak_extension() {
    let tmp = initialized();
    lak_in(&tmp)
        .args(["export", "other.lak"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("refusing"));
}

#[test]
fn import_missing_file_fails() {
    let tmp = initialized();
    lak_in(&tmp)
        .args(["import", "nope.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

// ---------------------------------------------------------------------------
// Generator and config
// ---------------------------------------------------------------------------

#[test]
fn generate_respects_length() {
    let tmp = TempDir::new().unwrap();
    let out = lak_in(&tmp)
        .args(["generate", "--length", "24", "--charset", "alphanumeric"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let text = String::from_utf8(out).unwrap();
    let password = text.lines().next().unwrap();
    assert_eq!(password.chars().count(), 24);
    assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[test]
fn config_file_sets_default_vault_path() {
    let tmp = TempDir::new().unwrap();
    tmp.child("lak.toml")
        .write_str("vault_path = \"home.lak\"\n")
        .unwrap();

    lak_in(&tmp).arg("init").assert().success();
    tmp.child("home.lak").assert(predicate::path::exists());
    tmp.child("vault.lak").assert(predicate::path::missing());
}

#[test]
fn broken_config_is_reported() {
    let tmp = TempDir::new().unwrap();
    tmp.child("lak.toml").write_str("not valid {{toml").unwrap();

    lak_in(&tmp)
        .arg("generate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file error"));
}
