//! CLI integration tests using assert_cmd
//!
//! These tests verify the CLI commands work correctly end-to-end.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;
use zip::write::FileOptions;
use zip::ZipWriter;

/// Get a command instance isolated from the user's config directory
fn scanomatic_cmd(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("scanomatic").expect("Failed to find scanomatic binary");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG");
    cmd
}

fn write_zip(path: &Path, members: &[(&str, &[u8])]) {
    let file = File::create(path).expect("Failed to create zip");
    let mut zip = ZipWriter::new(file);
    for (name, data) in members {
        zip.start_file(*name, FileOptions::default())
            .expect("Failed to start member");
        zip.write_all(data).expect("Failed to write member");
    }
    zip.finish().expect("Failed to finish zip");
}

fn nes_rom() -> Vec<u8> {
    let mut data = vec![0xAAu8; 16];
    data.extend(b"payload".repeat(10));
    data
}

#[test]
fn test_help_command() {
    let home = TempDir::new().unwrap();
    scanomatic_cmd(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Scanomatic - archive scanner and zip toolkit",
        ));
}

#[test]
fn test_version_command() {
    let home = TempDir::new().unwrap();
    scanomatic_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("scanomatic"));
}

#[test]
fn test_scan_help() {
    let home = TempDir::new().unwrap();
    scanomatic_cmd(home.path())
        .args(["scan", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Scan archives and files"));
}

#[test]
fn test_scan_requires_path() {
    let home = TempDir::new().unwrap();
    scanomatic_cmd(home.path()).arg("scan").assert().failure();
}

#[test]
fn test_scan_zip_json() {
    let temp_dir = TempDir::new().unwrap();
    let zip_path = temp_dir.path().join("set.zip");
    write_zip(&zip_path, &[("readme.txt", b"hello")]);

    let output = scanomatic_cmd(temp_dir.path())
        .args(["scan", "--format", "json"])
        .arg(&zip_path)
        .output()
        .unwrap();
    assert!(output.status.success());

    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["file_name"], "readme.txt");
    assert_eq!(entries[0]["crc"], "3610a686");
    assert_eq!(entries[0]["size"], "5");
    assert_eq!(entries[0]["type"], "zip");
}

#[test]
fn test_scan_offset_flag() {
    let temp_dir = TempDir::new().unwrap();
    let zip_path = temp_dir.path().join("nes.zip");
    write_zip(&zip_path, &[("rom.nes", &nes_rom())]);

    scanomatic_cmd(temp_dir.path())
        .args(["scan", "--format", "jsonl", "--offset", "nes=16"])
        .arg(&zip_path)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""size":"70""#));
}

#[test]
fn test_scan_directory_to_file() {
    let temp_dir = TempDir::new().unwrap();
    let roms = temp_dir.path().join("roms");
    fs::create_dir(&roms).unwrap();
    write_zip(&roms.join("a.zip"), &[("a.bin", b"a")]);
    fs::write(roms.join("b.zip"), b"garbage").unwrap();
    fs::write(roms.join("c.bin"), b"plain").unwrap();
    let out = temp_dir.path().join("scan.jsonl");

    scanomatic_cmd(temp_dir.path())
        .args(["scan", "--format", "jsonl", "--output"])
        .arg(&out)
        .arg(&roms)
        .assert()
        .success()
        .stdout(predicate::str::contains("scanning archive: 3 of 3"))
        .stderr(predicate::str::contains("Skipped 1 file(s), 0 deleted"));

    let content = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains(r#""file_name":"a.bin""#));
    assert!(lines[1].contains(r#""type":"file""#));
    assert!(roms.join("b.zip").exists());
}

#[test]
fn test_scan_clean_deletes_corrupt() {
    let temp_dir = TempDir::new().unwrap();
    let bad = temp_dir.path().join("bad.zip");
    fs::write(&bad, b"garbage").unwrap();

    scanomatic_cmd(temp_dir.path())
        .args(["scan", "--clean"])
        .arg(&bad)
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"))
        .stderr(predicate::str::contains("1 deleted"));

    assert!(!bad.exists());
}

#[test]
fn test_scan_missing_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    scanomatic_cmd(temp_dir.path())
        .arg("scan")
        .arg(temp_dir.path().join("missing.zip"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_scan_uses_config_offsets() {
    let temp_dir = TempDir::new().unwrap();
    let zip_path = temp_dir.path().join("nes.zip");
    write_zip(&zip_path, &[("rom.nes", &nes_rom())]);
    let config = temp_dir.path().join("scanomatic.toml");
    fs::write(&config, "[offsets]\nnes = 16\n").unwrap();

    scanomatic_cmd(temp_dir.path())
        .args(["scan", "--format", "table", "--config"])
        .arg(&config)
        .arg(&zip_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("70 bytes"));
}

#[test]
fn test_config_show_defaults() {
    let temp_dir = TempDir::new().unwrap();
    scanomatic_cmd(temp_dir.path())
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("chunk_size = 16777216"))
        .stdout(predicate::str::contains("using defaults"));
}

#[test]
fn test_checksums_command() {
    let temp_dir = TempDir::new().unwrap();
    let zip_path = temp_dir.path().join("set.zip");
    write_zip(&zip_path, &[("abc.txt", b"abc")]);

    scanomatic_cmd(temp_dir.path())
        .arg("checksums")
        .arg(&zip_path)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "a9993e364706816aba3e25717850c26c9cd0d89d  abc.txt",
        ));
}

#[test]
fn test_append_rename_remove_round() {
    let temp_dir = TempDir::new().unwrap();
    let zip_path = temp_dir.path().join("set.zip");
    let file = temp_dir.path().join("game.bin");
    fs::write(&file, b"game").unwrap();

    scanomatic_cmd(temp_dir.path())
        .arg("append")
        .arg(&zip_path)
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Added 'game.bin'"));

    scanomatic_cmd(temp_dir.path())
        .arg("rename")
        .arg(&zip_path)
        .arg("game.bin=Game (Europe).bin")
        .assert()
        .success()
        .stdout(predicate::str::contains("Renamed 1 member(s)"));

    let out = temp_dir.path().join("out");
    scanomatic_cmd(temp_dir.path())
        .arg("extract")
        .arg(&zip_path)
        .arg("Game (Europe).bin")
        .arg("--dest")
        .arg(&out)
        .assert()
        .success();
    assert_eq!(fs::read(out.join("Game (Europe).bin")).unwrap(), b"game");

    scanomatic_cmd(temp_dir.path())
        .arg("remove")
        .arg(&zip_path)
        .arg("Game (Europe).bin")
        .assert()
        .success();

    scanomatic_cmd(temp_dir.path())
        .arg("remove")
        .arg(&zip_path)
        .arg("Game (Europe).bin")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_merge_command() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("source.zip");
    write_zip(&source, &[("a.bin", b"a"), ("b.bin", b"b")]);
    let target = temp_dir.path().join("target.zip");

    scanomatic_cmd(temp_dir.path())
        .arg("merge")
        .arg(&target)
        .arg("--source")
        .arg(&source)
        .args(["--member", "a.bin", "--member", "b.bin=renamed.bin"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Copied 2 member(s)"));

    scanomatic_cmd(temp_dir.path())
        .arg("checksums")
        .arg(&target)
        .assert()
        .success()
        .stdout(predicate::str::contains("renamed.bin"))
        .stdout(predicate::str::contains("a.bin"));
}
