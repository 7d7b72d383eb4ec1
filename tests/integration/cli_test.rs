//! Integration tests for the turtle CLI.
//!
//! Runs the binary end to end: decode listings, config file handling and
//! argument errors.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use turtle::telnet::{GA, IAC, SB, SE, WILL};

use crate::helpers::run_turtle;

fn turtle() -> Command {
    let mut cmd = Command::cargo_bin("turtle").unwrap();
    cmd.env_remove("TURTLE_LOG");
    cmd
}

/// Write `bytes` to a capture file in `dir`.
fn capture(dir: &TempDir, bytes: &[u8]) -> String {
    let path = dir.path().join("capture.bin");
    fs::write(&path, bytes).unwrap();
    path.to_string_lossy().to_string()
}

fn sample_stream() -> Vec<u8> {
    let mut bytes = b"\x1b[1;32mHello\x1b[0m ".to_vec();
    bytes.extend_from_slice(&[IAC, WILL, 1]);
    bytes.extend_from_slice("w\u{f6}rld".as_bytes());
    bytes.extend_from_slice(&[IAC, SB, 24, 1, IAC, SE, IAC, GA]);
    bytes
}

#[test]
fn decode_lists_runs_and_codes() {
    let temp = TempDir::new().unwrap();
    let file = capture(&temp, &sample_stream());
    let config = temp.path().join("config.toml");

    turtle()
        .args(["decode", file.as_str(), "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(
            "text 0 brightgreen defaultback bold \"Hello\"\n\
             text 1 defaultfront defaultback - \" \"\n\
             telnet IAC WILL 1\n\
             text 0 defaultfront defaultback - \"w\u{f6}rld\"\n\
             telnet IAC SB 24 1 IAC SE\n\
             telnet IAC GA\n",
        );
}

#[test]
fn decode_chunked_keeps_codes_and_text() {
    let temp = TempDir::new().unwrap();
    let file = capture(&temp, &sample_stream());
    let config = temp.path().join("config.toml");

    turtle()
        .args(["decode", file.as_str(), "--chunk", "1", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("telnet IAC WILL 1"))
        .stdout(predicate::str::contains("telnet IAC SB 24 1 IAC SE"))
        .stdout(predicate::str::contains("\u{fffd}").not());
}

#[test]
fn decode_missing_file_fails() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("config.toml");
    let missing = temp.path().join("missing.bin");

    turtle()
        .arg("decode")
        .arg(&missing)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn decode_rejects_zero_chunk() {
    let (_, stderr, code) = run_turtle(&["decode", "x.bin", "--chunk", "0"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("--chunk"));
}

#[test]
fn config_init_then_show() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("turtle").join("config.toml");
    let config_arg = config.to_string_lossy().to_string();

    turtle()
        .args(["config", "init", "--config", config_arg.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));
    assert!(config.exists());

    turtle()
        .args(["config", "show", "--config", config_arg.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("[connection]"))
        .stdout(predicate::str::contains("max_subnegotiation = 8192"));
}

#[test]
fn config_init_refuses_to_overwrite() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("config.toml");
    fs::write(&config, "[log]\nlevel = \"info\"\n").unwrap();
    let config_arg = config.to_string_lossy().to_string();

    turtle()
        .args(["config", "init", "--config", config_arg.as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    turtle()
        .args(["config", "init", "--force", "--config", config_arg.as_str()])
        .assert()
        .success();
    let written = fs::read_to_string(&config).unwrap();
    assert!(written.contains("level = \"warn\""));
}

#[test]
fn invalid_config_is_reported() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("config.toml");
    fs::write(&config, "[codec]\nread_buffer_size = 0\n").unwrap();
    let file = capture(&temp, b"hi");

    turtle()
        .args(["decode", file.as_str(), "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid config"));
}

#[test]
fn help_lists_commands() {
    let (stdout, _, code) = run_turtle(&["--help"]);
    assert_eq!(code, 0);
    for command in ["connect", "decode", "config"] {
        assert!(stdout.contains(command), "missing {} in help", command);
    }
}
