//! CLI tests for the `cforge` binary.
//!
//! A small shell script plays the toolchain: it creates whatever file follows
//! `-o` and fails when any argument mentions `broken`.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const FAKE_TOOLCHAIN: &str = r#"#!/bin/sh
out=""
prev=""
for arg in "$@"; do
  case "$arg" in
    *broken*) echo "fake-cc: error in $arg" >&2; exit 1 ;;
  esac
  if [ "$prev" = "-o" ]; then out="$arg"; fi
  prev="$arg"
done
if [ -n "$out" ]; then : > "$out"; fi
exit 0
"#;

fn cforge() -> Command {
    Command::new(env!("CARGO_BIN_EXE_cforge"))
}

/// Project with a fake toolchain and the given sources under `src/`.
fn create_test_project(dir: &Path, sources: &[&str]) -> PathBuf {
    let toolchain = dir.join("fake-cc");
    fs::write(&toolchain, FAKE_TOOLCHAIN).unwrap();
    fs::set_permissions(&toolchain, fs::Permissions::from_mode(0o755)).unwrap();

    let manifest = format!(
        r#"[package]
name = "demo"

[build]
compiler = "{}"
flags = ["-Wall"]
"#,
        toolchain.display()
    );
    fs::write(dir.join("cforge.toml"), manifest).unwrap();

    fs::create_dir_all(dir.join("src")).unwrap();
    for name in sources {
        fs::write(dir.join("src").join(name), "int main() { return 0; }\n").unwrap();
    }
    dir.to_path_buf()
}

fn run_in(dir: &Path, args: &[&str]) -> Output {
    cforge()
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to execute cforge")
}

#[test]
fn test_build_creates_objects_and_executable() {
    let temp = tempfile::tempdir().unwrap();
    let project = create_test_project(temp.path(), &["a.cpp", "b.cpp"]);

    let output = run_in(&project, &["build"]);
    assert!(
        output.status.success(),
        "Build failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    assert!(project.join("obj").join("a.o").exists());
    assert!(project.join("obj").join("b.o").exists());
    assert!(project.join("demo").exists());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("RELEASE BUILD"));
    assert!(stdout.contains("-O2"));
}

#[test]
fn test_default_command_is_build() {
    let temp = tempfile::tempdir().unwrap();
    let project = create_test_project(temp.path(), &["main.cpp"]);

    let output = run_in(&project, &[]);
    assert!(output.status.success());
    assert!(project.join("demo").exists());
}

#[test]
fn test_compile_error_exits_nonzero_without_linking() {
    let temp = tempfile::tempdir().unwrap();
    let project = create_test_project(temp.path(), &["a_broken.cpp", "b.cpp"]);

    let output = run_in(&project, &["build", "--debug"]);
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("a_broken.cpp"), "stderr: {}", stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Stopped at: "), "stdout: {}", stdout);
    assert!(!project.join("obj").join("b.o").exists());
    assert!(!project.join("demo").exists());
}

#[test]
fn test_dry_run_spawns_nothing() {
    let temp = tempfile::tempdir().unwrap();
    let project = create_test_project(temp.path(), &["a.cpp"]);

    let output = run_in(&project, &["build", "--dry-run"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Would execute"));
    assert!(!project.join("obj").exists());
    assert!(!project.join("demo").exists());
}

#[test]
fn test_clean_all_then_clean_again() {
    let temp = tempfile::tempdir().unwrap();
    let project = create_test_project(temp.path(), &["a.cpp"]);
    assert!(run_in(&project, &["build"]).status.success());

    let output = run_in(&project, &["clean", "--all"]);
    assert!(output.status.success());
    assert!(!project.join("obj").join("a.o").exists());
    assert!(!project.join("demo").exists());

    let again = run_in(&project, &["clean", "--all"]);
    assert!(again.status.success());
    let stdout = String::from_utf8_lossy(&again.stdout);
    assert!(stdout.contains("Object files already cleaned."));
    assert!(stdout.contains("Executable already cleaned."));
    assert!(!stdout.contains("Clean complete."));
    assert!(!stdout.contains("Nothing to clean"));
}

#[test]
fn test_missing_manifest_suggests_init() {
    let temp = tempfile::tempdir().unwrap();
    let output = run_in(temp.path(), &["build"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("cforge init"));
}

#[test]
fn test_init_writes_manifest() {
    let temp = tempfile::tempdir().unwrap();
    let output = run_in(temp.path(), &["init", "--name", "engine"]);
    assert!(output.status.success());

    let content = fs::read_to_string(temp.path().join("cforge.toml")).unwrap();
    assert!(content.contains("engine"));

    // Second init refuses to overwrite
    assert!(!run_in(temp.path(), &["init"]).status.success());
}
