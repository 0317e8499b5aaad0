use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn giffer(settings_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("giffer").unwrap();
    cmd.env_remove("GIFFER_SETTINGS")
        .env_remove("RUST_LOG")
        .arg("--settings")
        .arg(settings_dir.path().join("giffer_settings.toml"));
    cmd
}

#[test]
fn test_help_lists_commands() {
    Command::cargo_bin("giffer")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("export"))
        .stdout(predicate::str::contains("settings"))
        .stdout(predicate::str::contains("shortcut"));
}

#[test]
fn test_settings_show_creates_defaults() {
    let dir = tempfile::tempdir().unwrap();

    giffer(&dir)
        .args(["settings", "show", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"use_optimizer\": false"))
        .stdout(predicate::str::contains("\"optimizer_colors\": 256"));

    assert!(dir.path().join("giffer_settings.toml").is_file());
}

#[test]
fn test_settings_set_persists() {
    let dir = tempfile::tempdir().unwrap();

    giffer(&dir)
        .args(["settings", "set", "colors", "64"])
        .assert()
        .success();
    giffer(&dir)
        .args(["settings", "set", "use_optimizer", "true"])
        .assert()
        .success();

    let saved = fs::read_to_string(dir.path().join("giffer_settings.toml")).unwrap();
    assert!(saved.contains("optimizer_colors = 64"));
    assert!(saved.contains("use_optimizer = true"));
}

#[test]
fn test_settings_rejects_bad_colors() {
    let dir = tempfile::tempdir().unwrap();

    giffer(&dir)
        .args(["settings", "set", "colors", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid value for optimizer_colors"));
}

#[test]
fn test_export_without_ffmpeg_is_a_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let video = dir.path().join("clip.mp4");
    fs::write(&video, b"not really a video").unwrap();

    giffer(&dir)
        .arg("export")
        .arg("--input")
        .arg(&video)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid ffmpeg path!"));

    assert!(!dir.path().join("clip.gif").exists());
}

#[test]
fn test_settings_path_prints_location() {
    let dir = tempfile::tempdir().unwrap();

    giffer(&dir)
        .args(["settings", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("giffer_settings.toml"));
}
