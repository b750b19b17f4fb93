//! End-to-end runs of the `nsqwire` binary.

use std::process::{Command, Output};

fn run_nsqwire(args: &[&str]) -> Output {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "").unwrap();

    Command::new(env!("CARGO_BIN_EXE_nsqwire"))
        .args(args)
        .env("NSQWIRE_CONFIG", &config)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn ping_writes_raw_frame_to_stdout() {
    let out = run_nsqwire(&["ping"]);
    assert!(out.status.success());
    assert_eq!(out.stdout, b"PING\n");
    assert!(out.stderr.is_empty());
}

#[test]
fn failure_is_reported_once() {
    let out = run_nsqwire(&["fin", "zz"]);
    assert!(!out.status.success());
    assert!(out.stdout.is_empty());

    let stderr = String::from_utf8(out.stderr).unwrap();
    assert_eq!(stderr.matches("invalid message id hex").count(), 1);
    assert!(stderr.starts_with("error: "));
}

#[test]
fn json_log_format_keeps_stdout_clean() {
    let out = run_nsqwire(&["--debug", "--log-format", "json", "--hex", "rdy", "5"]);
    assert!(out.status.success());
    assert_eq!(out.stdout, hex_line("RDY 5\n"));

    let stderr = String::from_utf8(out.stderr).unwrap();
    let first: serde_json::Value = serde_json::from_str(stderr.lines().next().unwrap()).unwrap();
    assert_eq!(first["level"], "DEBUG");
}

fn hex_line(frame: &str) -> Vec<u8> {
    format!("{}\n", hex::encode(frame)).into_bytes()
}
