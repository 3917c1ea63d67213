use super::run::run_project;
use super::utils::{Profile, report_failure, run_step};
use crate::config::HarbourConfig;
use crate::deps;
use crate::process::ProcessRunner;
use crate::ui::{self, Style, paint};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// Build the debug profile and define `DEBUG` for the compiler.
    pub debug: bool,
    /// Remove the profile's build directory first.
    pub clean: bool,
}

// --- CORE: Build Project ---
pub fn build_project(root: &Path, options: &BuildOptions) -> Result<bool> {
    let start_time = Instant::now();
    let config = HarbourConfig::load(root)?;

    // 1. Setup Directories
    let profile = Profile::from_debug(options.debug);
    let build_dir = profile.build_dir(root);
    if options.clean && build_dir.exists() {
        debug!(path = %build_dir.display(), "removing build directory");
        fs::remove_dir_all(&build_dir)
            .with_context(|| format!("Failed to remove {}", build_dir.display()))?;
    }
    fs::create_dir_all(&build_dir)
        .with_context(|| format!("Failed to create {}", build_dir.display()))?;

    // 2. Fetch Dependencies
    ui::section("Checking for dependencies...");
    if !deps::check_dependencies(root, &config)? {
        return Ok(false);
    }

    // 3. Configure
    ui::section("Configuring build...");
    let abs_root = root
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", root.display()))?;
    let mut cmake_args = vec!["cmake".to_string(), abs_root.to_string_lossy().to_string()];
    if options.debug {
        println!("{}", paint(Style::Info, "Debug mode enabled"));
        cmake_args.push("-DCMAKE_CXX_FLAGS=-DDEBUG".to_string());
    }

    let runner = ProcessRunner::new().current_dir(&build_dir);
    let cmake = run_step(&runner, "Running cmake...", cmake_args.as_slice());
    if !cmake.success() {
        report_failure("CMake", &cmake);
        return Ok(false);
    }

    // 4. Compile
    ui::section("Building project...");
    let jobs = std::thread::available_parallelism().map_or(1, |n| n.get());
    let make = run_step(&runner, "Compiling...", &["make".to_string(), format!("-j{}", jobs)]);
    if !make.success() {
        report_failure("Make", &make);
        return Ok(false);
    }

    // 5. compile_commands.json for clangd
    ui::section("Linking the Compile Commands for clangd");
    let bin_path = profile.binary_path(root, &config);
    debug!(path = %bin_path.display(), "expected binary");
    if !bin_path.exists() {
        ui::error(&format!(
            "Build did not produce expected binary: {}",
            bin_path.display()
        ));
        return Ok(false);
    }

    let compile_commands = build_dir.join("compile_commands.json");
    if compile_commands.exists() {
        fs::copy(&compile_commands, root.join("compile_commands.json"))
            .context("Failed to copy compile_commands.json")?;
        ui::success("Copied compile_commands.json to project root.");
    }

    let line = ui::rule();
    println!("{}", paint(Style::Rule, &line));
    ui::success(&format!(
        "Build finished in {:.2?}. Run it via 'harbour run'",
        start_time.elapsed()
    ));
    println!("{}", paint(Style::Rule, &line));

    Ok(true)
}

// --- COMMAND: Build & Run ---
pub fn build_and_run(root: &Path, options: &BuildOptions, run_args: &[String]) -> Result<bool> {
    if !build_project(root, options)? {
        ui::error("Build failed.");
        return Ok(false);
    }
    run_project(root, run_args)
}
