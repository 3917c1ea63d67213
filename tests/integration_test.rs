//! Integration tests for the full create / build / run cycle
//!
//! These tests need `cmake`, `make` and a C++ compiler on the PATH and are
//! skipped when any of them is missing.

use harbour::process::ProcessRunner;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

fn tool_available(tool: &str) -> bool {
    !ProcessRunner::new().run(&[tool, "--version"], true).spawn_failed()
}

fn toolchain_available() -> bool {
    let found = ["cmake", "make", "c++"].iter().all(|t| tool_available(t));
    if !found {
        eprintln!("Skipping test: cmake, make or c++ not found");
    }
    found
}

fn harbour(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_harbour"))
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("Failed to execute harbour")
}

#[test]
fn test_new_builds_and_runs_console_project() {
    if !toolchain_available() {
        return;
    }
    let dir = tempdir().unwrap();

    let output = harbour(&["new", "demo"], dir.path());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "new failed: {}\n{}",
        stdout,
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout.contains("Hello, world!"));

    let root = dir.path().join("demo");
    assert!(root.join("build").join("release").join("bin").join("demo").exists());
    assert!(root.join("compile_commands.json").exists());
}

#[test]
fn test_debug_build_then_run_prefers_newest_binary() {
    if !toolchain_available() {
        return;
    }
    let dir = tempdir().unwrap();

    let created = harbour(&["new", "-g", "--std", "20", "dbg"], dir.path());
    assert!(
        created.status.success(),
        "{}",
        String::from_utf8_lossy(&created.stderr)
    );

    let root = dir.path().join("dbg");
    let cmake = fs::read_to_string(root.join("CMakeLists.txt")).unwrap();
    assert!(cmake.contains("set(CMAKE_CXX_STANDARD 20)"));

    // `new -g` builds the debug profile, so DEBUG logging is compiled in.
    let run = harbour(&["run"], &root);
    assert!(run.status.success());
    assert!(String::from_utf8_lossy(&run.stdout).contains("Test debug log"));

    // A newer release build wins, and it was compiled without -DDEBUG.
    let build = harbour(&["build"], &root);
    assert!(
        build.status.success(),
        "{}",
        String::from_utf8_lossy(&build.stderr)
    );
    let run = harbour(&["run"], &root);
    let stdout = String::from_utf8_lossy(&run.stdout);
    assert!(stdout.contains("Hello, world!"));
    assert!(!stdout.contains("Test debug log"));
}

#[test]
fn test_make_reports_compile_error() {
    if !toolchain_available() {
        return;
    }
    let dir = tempdir().unwrap();
    let created = harbour(&["new", "broken"], dir.path());
    assert!(created.status.success());

    let root = dir.path().join("broken");
    fs::write(
        root.join("src").join("main.cpp"),
        "#include \"missing_header.hpp\"\nint main() { return 0; }\n",
    )
    .unwrap();

    let output = harbour(&["make", "--clean"], &root);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing_header.hpp"), "{}", stderr);
}
