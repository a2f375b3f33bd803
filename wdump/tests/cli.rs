//! Integration tests for the wdump binary

use std::{
    fs,
    io::Write,
    process::{Command, Output, Stdio},
};

use tempfile::TempDir;

const MEMORY_MODULE: &str = "(module (memory 1) (export \"mem\" (memory 0)))";
const MEMORY_MODULE_TEXT: &str = "(module\n  (memory 1)\n  (export \"mem\" (memory 0)))\n";

fn wdump() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_wdump"));
    command.env_remove("WDUMP_VERBOSE").env_remove("WDUMP_LENIENT").env_remove("RUST_LOG");
    command
}

fn write_module(dir: &TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, bytes).unwrap();
    path
}

fn run_with_stdin(mut command: Command, input: &[u8]) -> Output {
    let mut child = command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(input).unwrap();
    child.wait_with_output().unwrap()
}

#[test]
fn test_prints_file_to_stdout() {
    let dir = TempDir::new().unwrap();
    let path = write_module(&dir, "memory.wasm", &wat::parse_str(MEMORY_MODULE).unwrap());

    let output = wdump().arg(&path).output().unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), MEMORY_MODULE_TEXT);
}

#[test]
fn test_reads_stdin() {
    let bytes = wat::parse_str(MEMORY_MODULE).unwrap();
    let output = run_with_stdin(wdump(), &bytes);
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), MEMORY_MODULE_TEXT);
}

#[test]
fn test_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let input = write_module(&dir, "memory.wasm", &wat::parse_str(MEMORY_MODULE).unwrap());
    let target = dir.path().join("memory.txt");

    let output = wdump().arg(&input).arg("-o").arg(&target).output().unwrap();
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert_eq!(fs::read_to_string(&target).unwrap(), MEMORY_MODULE_TEXT);
}

#[test]
fn test_verbose_flag_and_env() {
    let dir = TempDir::new().unwrap();
    let path = write_module(&dir, "memory.wasm", &wat::parse_str(MEMORY_MODULE).unwrap());

    let flag = wdump().arg("--verbose").arg(&path).output().unwrap();
    let text = String::from_utf8(flag.stdout).unwrap();
    assert!(text.contains(";; section memory (3 bytes)"));
    assert!(text.contains(";; count: 1"));

    let env = wdump().env("WDUMP_VERBOSE", "true").arg(&path).output().unwrap();
    assert_eq!(String::from_utf8(env.stdout).unwrap(), text);
}

#[test]
fn test_invalid_module_fails() {
    let dir = TempDir::new().unwrap();
    let path = write_module(&dir, "bad.wasm", b"\0asm\x02\0\0\0");

    let output = wdump().arg(&path).output().unwrap();
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Failed to decode"));
    assert!(stderr.contains("Unsupported version"));
}

#[test]
fn test_lenient_flag() {
    let dir = TempDir::new().unwrap();
    // Header, then a start section whose length covers a stray byte
    let path = write_module(&dir, "trailing.wasm", b"\0asm\x01\0\0\0\x08\x02\x00\xff");

    assert!(!wdump().arg(&path).output().unwrap().status.success());

    let output = wdump().arg("--lenient").arg(&path).output().unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "(module\n  (start 0))\n");
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let output = wdump().arg(dir.path().join("absent.wasm")).output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8(output.stderr).unwrap().contains("Failed to read WebAssembly file"));
}
