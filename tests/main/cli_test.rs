//! CLI contract tests.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;

fn main_source() -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("src/main.rs");
    match fs::read_to_string(&path) {
        Ok(source) => source,
        Err(err) => panic!("main source should load from {}: {err}", path.display()),
    }
}

fn coverbot() -> Command {
    Command::cargo_bin("coverbot").expect("binary should build")
}

#[test]
fn main_defines_subcommands() {
    let source = main_source();
    assert!(source.contains("Start"));
    assert!(source.contains("CheckConfig"));
    assert!(source.contains("Ogg2mp3"));
}

#[test]
fn help_lists_subcommands() {
    let output = coverbot().arg("--help").output().expect("should run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("start"));
    assert!(stdout.contains("check-config"));
    assert!(stdout.contains("ogg2mp3"));
}

#[test]
fn ogg2mp3_requires_files() {
    coverbot().arg("ogg2mp3").assert().failure();
}

#[test]
fn ogg2mp3_rejects_quality_out_of_range() {
    coverbot()
        .args(["ogg2mp3", "-V", "12", "a.ogg"])
        .assert()
        .failure();
}

#[test]
fn check_config_prints_effective_values() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let config = tmp.path().join("config.toml");
    fs::write(&config, "[media]\ngif_fps = 15\n").expect("should write config");

    let output = coverbot()
        .arg("check-config")
        .env("COVERBOT_CONFIG", &config)
        .env("COVERBOT_BOT_USERNAME", "TestCoverBot")
        .env_remove("COVERBOT_TELEGRAM_TOKEN")
        .current_dir(tmp.path())
        .output()
        .expect("should run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("gif_fps = 15"));
    assert!(stdout.contains("TestCoverBot"));
    assert!(stdout.contains("warning"));
}

#[test]
fn check_config_rejects_invalid_file() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let config = tmp.path().join("config.toml");
    fs::write(&config, "[media\n").expect("should write config");

    coverbot()
        .arg("check-config")
        .env("COVERBOT_CONFIG", &config)
        .current_dir(tmp.path())
        .assert()
        .failure();
}
