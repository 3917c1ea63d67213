//! `harbour new` handler.
//!
//! Writes the project tree, then runs the same pipeline as `harbour make`:
//! fetch dependencies, clean-build, run.

use crate::build::{self, BuildOptions};
use crate::config::HarbourConfig;
use crate::deps::GRAPHICS_DEPENDENCIES;
use crate::files::FileResource;
use crate::templates;
use crate::ui::{self, Style, paint};
use anyhow::{Context, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The name becomes a directory and the CMake target, so keep it to
/// identifier-like characters.
const PROJECT_NAME_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_-]*$";

#[derive(Debug, Clone)]
pub struct NewOptions {
    pub name: String,
    pub cpp_version: u32,
    pub runtime_bin: String,
    pub runtime_lib: String,
    pub enable_debug: bool,
    pub enable_graphics: bool,
}

impl NewOptions {
    pub fn to_config(&self) -> HarbourConfig {
        let dependencies = if self.enable_graphics {
            GRAPHICS_DEPENDENCIES
                .iter()
                .map(|d| d.name.to_string())
                .collect()
        } else {
            Vec::new()
        };
        HarbourConfig {
            project_name: self.name.clone(),
            cpp_version: self.cpp_version,
            runtime_bin: self.runtime_bin.clone(),
            runtime_lib: self.runtime_lib.clone(),
            enable_debug: self.enable_debug,
            enable_graphics: self.enable_graphics,
            dependencies,
        }
    }
}

pub fn validate_project_name(name: &str) -> Result<()> {
    let re = Regex::new(PROJECT_NAME_PATTERN)?;
    if !re.is_match(name) {
        anyhow::bail!(
            "Invalid project name '{}': use letters, digits, '_' or '-', starting with a letter or '_'",
            name
        );
    }
    Ok(())
}

/// Create `<parent>/<name>` with its sources, CMakeLists.txt and
/// `.harbourConfig`. Returns the project root.
pub fn create_project(parent: &Path, options: &NewOptions) -> Result<PathBuf> {
    validate_project_name(&options.name)?;

    let root = parent.join(&options.name);
    if root.exists() {
        anyhow::bail!(
            "Directory '{}' already exists. Project creation aborted.",
            root.display()
        );
    }

    for dir in ["include", "src", "external"] {
        fs::create_dir_all(root.join(dir))
            .with_context(|| format!("Failed to create {}/", dir))?;
    }

    let config = options.to_config();
    write_file(&root.join("CMakeLists.txt"), &templates::cmake_lists(&config))?;
    write_file(
        &root.join("src").join("main.cpp"),
        &templates::main_cpp(config.enable_debug),
    )?;
    if config.enable_debug {
        write_file(&root.join("include").join("debug.hpp"), templates::debug_hpp())?;
    }
    write_file(&root.join("include").join("comp.h"), templates::comp_h())?;
    config.save(&root)?;

    debug!(root = %root.display(), "project created");
    Ok(root)
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    let mut file = FileResource::new(path, "w")?;
    file.try_open()
        .with_context(|| format!("Failed to create {}", path.display()))?;
    file.write_str(content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Create, build and run a new project in the current directory.
pub fn run_new(options: &NewOptions) -> Result<bool> {
    ui::section(&format!(
        "Creating C++{} project named {}",
        options.cpp_version, options.name
    ));

    let current_dir = std::env::current_dir()?;
    let root = match create_project(&current_dir, options) {
        Ok(root) => root,
        Err(e) => {
            ui::error(&format!("Project creation failed: {:#}", e));
            return Ok(false);
        }
    };
    ui::success("Project Created!");

    println!("{}", paint(Style::Info, "Configuring build..."));
    let build_options = BuildOptions {
        debug: options.enable_debug,
        clean: true,
    };
    if !build::build_project(&root, &build_options)? {
        ui::error("Build failed.");
        return Ok(false);
    }

    println!("{}", paint(Style::Info, "Running program:"));
    let ran = build::run_project(&root, &[])?;
    Ok(finish(&options.name, ran))
}

/// Closing banner. The project exists and builds at this point, so a
/// failing first run is only a warning.
fn finish(name: &str, ran: bool) -> bool {
    println!("{}", paint(Style::Rule, &ui::rule()));
    if !ran {
        ui::warn("The generated program did not run cleanly; see the output above.");
    }
    ui::success("Done!");
    println!("  cd {}\n  harbour run", name);
    true
}
