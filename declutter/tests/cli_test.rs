//! Command-line tests for the `declutter` binary

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Binary with home, config and log locations inside `dir`
fn declutter(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("declutter").expect("binary should build");
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join("config"))
        .env("XDG_DATA_HOME", dir.path().join("data"))
        .env("NO_COLOR", "1")
        .env_remove("ANTHROPIC_API_KEY")
        .env_remove("OPENAI_API_KEY");
    cmd
}

/// Config pointing at a local key file and an unreachable service
fn write_config(dir: &TempDir) -> std::path::PathBuf {
    let key_path = dir.path().join("key");
    fs::write(&key_path, "sk-test").unwrap();

    let config_path = dir.path().join("declutter.yml");
    let yaml = format!(
        "analysis:\n  api-key-file: {}\n  base-url: http://127.0.0.1:1\n  timeout-ms: 2000\n",
        key_path.display()
    );
    fs::write(&config_path, yaml).unwrap();
    config_path
}

fn write_png(dir: &Path) -> std::path::PathBuf {
    write_png_named(dir, "room.png")
}

fn write_png_named(dir: &Path, name: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    let bytes = [&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A][..], &[0u8; 16][..]].concat();
    fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn test_tips_prints_maintenance_hacks() {
    let dir = TempDir::new().unwrap();
    declutter(&dir)
        .arg("tips")
        .assert()
        .success()
        .stdout(predicate::str::contains("Maintenance Hacks"))
        .stdout(predicate::str::contains("One In, One Out"));
}

#[test]
fn test_version() {
    let dir = TempDir::new().unwrap();
    declutter(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("declutter"));
}

#[test]
fn test_scan_rejects_unknown_format() {
    let dir = TempDir::new().unwrap();
    declutter(&dir)
        .args(["scan", "room.png", "--format", "yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown format"));
}

#[test]
fn test_scan_without_api_key_fails() {
    let dir = TempDir::new().unwrap();
    let image = write_png(dir.path());
    declutter(&dir)
        .arg("scan")
        .arg(&image)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to create analysis client"));
}

#[test]
fn test_scan_rejects_non_image() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);
    let notes = dir.path().join("notes.txt");
    fs::write(&notes, "not a picture").unwrap();

    declutter(&dir)
        .arg("--config")
        .arg(&config)
        .arg("scan")
        .arg(&notes)
        .assert()
        .failure()
        .stderr(predicate::str::contains("CaptureRejected"));
}

#[test]
fn test_scan_unreachable_service_is_transport_error() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);
    let image = write_png(dir.path());

    declutter(&dir)
        .arg("--config")
        .arg(&config)
        .arg("scan")
        .arg(&image)
        .assert()
        .failure()
        .stderr(predicate::str::contains("TransportError"));
}

#[test]
#[cfg(unix)]
fn test_scan_keeps_backslash_in_file_name() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir);
    let image = write_png_named(dir.path(), "a\\b.png");

    // The image is read and sent; only the unreachable service fails
    declutter(&dir)
        .arg("--config")
        .arg(&config)
        .arg("scan")
        .arg(&image)
        .assert()
        .failure()
        .stderr(predicate::str::contains("TransportError"))
        .stderr(predicate::str::contains("CaptureRejected").not());
}
