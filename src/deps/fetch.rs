//! Git-based dependency fetching.
//!
//! Dependencies are cloned into `<project>/external/<name>` with the system
//! `git`, then optionally post-processed by a generator (glad emits its loader
//! sources with Python). A dependency whose folder already exists is left
//! alone.

use crate::build::{report_failure, run_step};
use crate::config::HarbourConfig;
use crate::process::ProcessRunner;
use crate::ui::{self, Style, paint};
use anyhow::{Context, Result};
use std::ffi::OsStr;
use std::fs;
use std::path::Path;
use tracing::debug;

/// A command run inside a freshly cloned dependency.
#[derive(Debug)]
pub struct Generator {
    pub label: &'static str,
    /// Created (relative to the clone) before the generator runs.
    pub out_dir: &'static str,
    pub argv: &'static [&'static str],
}

#[derive(Debug)]
pub struct GitDependency {
    pub name: &'static str,
    pub label: &'static str,
    pub url: &'static str,
    pub generator: Option<Generator>,
}

/// Everything a graphics (`-G`) project links against.
pub const GRAPHICS_DEPENDENCIES: &[GitDependency] = &[
    GitDependency {
        name: "glfw",
        label: "GLFW",
        url: "https://github.com/glfw/glfw.git",
        generator: None,
    },
    GitDependency {
        name: "glm",
        label: "GLM",
        url: "https://github.com/g-truc/glm.git",
        generator: None,
    },
    GitDependency {
        name: "glad",
        label: "GLAD",
        url: "https://github.com/Dav1dde/glad.git",
        generator: Some(Generator {
            label: "glad generator (OpenGL C 3.3 compatibility)",
            out_dir: "GL",
            argv: &[
                "python3",
                "-m",
                "glad",
                "--out-path",
                "./GL",
                "--api",
                "gl:compatibility=3.3",
                "c",
            ],
        }),
    },
];

/// Graphics dependencies selected by the project's `dependencies` list, plus
/// the names in that list harbour does not know. An empty list selects all.
pub fn resolve_dependencies(config: &HarbourConfig) -> (Vec<&'static GitDependency>, Vec<String>) {
    if !config.enable_graphics {
        return (Vec::new(), Vec::new());
    }
    if config.dependencies.is_empty() {
        return (GRAPHICS_DEPENDENCIES.iter().collect(), Vec::new());
    }

    let selected = GRAPHICS_DEPENDENCIES
        .iter()
        .filter(|dep| config.dependencies.iter().any(|d| d == dep.name))
        .collect();
    let unknown = config
        .dependencies
        .iter()
        .filter(|d| !GRAPHICS_DEPENDENCIES.iter().any(|dep| dep.name == d.as_str()))
        .cloned()
        .collect();
    (selected, unknown)
}

/// Make sure every dependency the project needs is present under
/// `external/`. Returns `false` after reporting a failed clone or generator.
pub fn check_dependencies(root: &Path, config: &HarbourConfig) -> Result<bool> {
    let (deps, unknown) = resolve_dependencies(config);
    for name in &unknown {
        ui::warn(&format!("Unknown dependency '{}' ignored", name));
    }
    if deps.is_empty() {
        println!("{}", paint(Style::Success, "No external dependencies"));
        return Ok(true);
    }

    let external = root.join("external");
    fs::create_dir_all(&external)
        .with_context(|| format!("Failed to create {}", external.display()))?;

    for dep in deps {
        let dest = external.join(dep.name);
        if dest.exists() {
            ui::success(&format!("{} found", dep.label));
            continue;
        }
        if !fetch_dependency(dep, &dest)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn fetch_dependency(dep: &GitDependency, dest: &Path) -> Result<bool> {
    println!("{}", paint(Style::Info, &format!("Cloning {}...", dep.label)));
    debug!(name = dep.name, url = dep.url, dest = %dest.display(), "cloning dependency");

    let clone_args: [&OsStr; 4] = [
        OsStr::new("git"),
        OsStr::new("clone"),
        OsStr::new(dep.url),
        dest.as_os_str(),
    ];
    let clone = run_step(&ProcessRunner::new(), &format!("Cloning {}...", dep.label), &clone_args);
    if !clone.success() {
        report_failure(&format!("{} clone", dep.label), &clone);
        return Ok(false);
    }

    if let Some(generator) = &dep.generator {
        let out_dir = dest.join(generator.out_dir);
        fs::create_dir_all(&out_dir)
            .with_context(|| format!("Failed to create {}", out_dir.display()))?;

        println!(
            "{}",
            paint(Style::Info, &format!("Running {}...", generator.label))
        );
        let runner = ProcessRunner::new().current_dir(dest);
        let generated = run_step(&runner, generator.label, generator.argv);
        if !generated.success() {
            report_failure(&format!("{} generation", dep.label), &generated);
            return Ok(false);
        }
    }

    ui::success(&format!("{} ready", dep.label));
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(graphics: bool, deps: &[&str]) -> HarbourConfig {
        HarbourConfig {
            project_name: "demo".to_string(),
            enable_graphics: graphics,
            dependencies: deps.iter().map(|d| d.to_string()).collect(),
            ..Default::default()
        }
    }

    fn names(deps: &[&GitDependency]) -> Vec<&'static str> {
        deps.iter().map(|d| d.name).collect()
    }

    #[test]
    fn test_no_graphics_no_dependencies() {
        let (deps, unknown) = resolve_dependencies(&config(false, &["glfw"]));
        assert!(deps.is_empty());
        assert!(unknown.is_empty());
    }

    #[test]
    fn test_empty_list_selects_all() {
        let (deps, _) = resolve_dependencies(&config(true, &[]));
        assert_eq!(names(&deps), vec!["glfw", "glm", "glad"]);
    }

    #[test]
    fn test_list_filters_and_reports_unknown() {
        let (deps, unknown) = resolve_dependencies(&config(true, &["glad", "sdl2"]));
        assert_eq!(names(&deps), vec!["glad"]);
        assert_eq!(unknown, vec!["sdl2".to_string()]);
    }

    #[test]
    fn test_only_glad_has_generator() {
        for dep in GRAPHICS_DEPENDENCIES {
            assert_eq!(dep.generator.is_some(), dep.name == "glad");
        }
    }

    #[test]
    fn test_existing_dependencies_are_not_fetched() {
        let dir = tempfile::tempdir().unwrap();
        for dep in GRAPHICS_DEPENDENCIES {
            fs::create_dir_all(dir.path().join("external").join(dep.name)).unwrap();
        }
        assert!(check_dependencies(dir.path(), &config(true, &[])).unwrap());
    }

    #[test]
    fn test_console_project_skips_external() {
        let dir = tempfile::tempdir().unwrap();
        assert!(check_dependencies(dir.path(), &config(false, &[])).unwrap());
        assert!(!dir.path().join("external").exists());
    }
}
