use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cli(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("wallabag-sync").expect("binary built");
    cmd.env("HOME", home.path())
        .env_remove("WALLABAG_ACCESS_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

fn init(home: &TempDir, vault: &TempDir) {
    cli(home)
        .args(["init", "--server", "https://wallabag.example", "--vault"])
        .arg(vault.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote settings"));
}

#[test]
fn init_writes_config_under_home() {
    let home = TempDir::new().unwrap();
    let vault = TempDir::new().unwrap();

    init(&home, &vault);

    let config = home.path().join(".wallabag-sync").join("config.yaml");
    let raw = std::fs::read_to_string(config).unwrap();
    assert!(raw.contains("server_url: https://wallabag.example"), "config was: {raw}");
    assert!(raw.contains("folder: wallabag"));
}

#[test]
fn init_refuses_to_overwrite_without_force() {
    let home = TempDir::new().unwrap();
    let vault = TempDir::new().unwrap();
    init(&home, &vault);

    cli(&home)
        .args(["init", "--server", "https://other.example", "--vault"])
        .arg(vault.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    cli(&home)
        .args(["init", "--force", "--server", "https://other.example", "--vault"])
        .arg(vault.path())
        .assert()
        .success();
}

#[test]
fn init_rejects_missing_vault() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["init", "--server", "https://wallabag.example", "--vault"])
        .arg(home.path().join("no-such-vault"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot resolve vault"));
}

#[test]
fn init_rejects_non_http_server_without_writing() {
    let home = TempDir::new().unwrap();
    let vault = TempDir::new().unwrap();
    cli(&home)
        .args(["init", "--server", "ftp://wallabag.example", "--vault"])
        .arg(vault.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("server_url"));
    assert!(!home.path().join(".wallabag-sync").join("config.yaml").exists());
}

#[test]
fn status_json_reports_fresh_state() {
    let home = TempDir::new().unwrap();
    let vault = TempDir::new().unwrap();
    init(&home, &vault);

    let out = cli(&home).args(["status", "--json"]).output().unwrap();
    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["synced_count"], 0);
    assert_eq!(json["authenticated"], false);
    assert_eq!(json["mode"], "markdown");
    assert_eq!(json["last_sync_at"], serde_json::Value::Null);
}

#[test]
fn status_picks_up_token_from_environment() {
    let home = TempDir::new().unwrap();
    let vault = TempDir::new().unwrap();
    init(&home, &vault);

    let out = cli(&home)
        .env("WALLABAG_ACCESS_TOKEN", "tok")
        .args(["status", "--json"])
        .output()
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["authenticated"], true);
}

#[test]
fn commands_without_settings_point_at_init() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("wallabag-sync init"));
}

#[test]
fn sync_without_token_asks_for_authentication() {
    let home = TempDir::new().unwrap();
    let vault = TempDir::new().unwrap();
    init(&home, &vault);

    cli(&home)
        .arg("sync")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please authenticate with wallabag first."));

    assert!(!home.path().join(".wallabag-sync").join(".synced").exists());
    assert!(std::fs::read_dir(vault.path()).unwrap().next().is_none());
}

#[test]
fn reset_removes_synced_file() {
    let home = TempDir::new().unwrap();
    let vault = TempDir::new().unwrap();
    init(&home, &vault);
    let synced = home.path().join(".wallabag-sync").join(".synced");
    std::fs::write(&synced, "[1,2,3]").unwrap();

    cli(&home)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("3 article(s) synced"));

    cli(&home)
        .arg("reset")
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed"));
    assert!(!synced.exists());

    cli(&home)
        .arg("reset")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to reset"));
}

#[test]
fn config_flag_overrides_default_location() {
    let home = TempDir::new().unwrap();
    let vault = TempDir::new().unwrap();
    let custom = home.path().join("alt").join("wb.yaml");

    cli(&home)
        .arg("--config")
        .arg(&custom)
        .args(["init", "--server", "https://wallabag.example", "--vault"])
        .arg(vault.path())
        .assert()
        .success();
    assert!(custom.exists());
    assert!(!home.path().join(".wallabag-sync").join("config.yaml").exists());

    cli(&home)
        .args(["status", "--json", "--config"])
        .arg(&custom)
        .assert()
        .success()
        .stdout(predicate::str::contains("wb.yaml"));
}
