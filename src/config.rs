//! Project configuration (`.harbourConfig`).
//!
//! The file sits at the project root and holds one `key="value"` assignment
//! per line:
//!
//! ```text
//! project_name="demo"
//! cpp_version="17"
//! runtime_bin="bin"
//! runtime_lib="lib"
//! enable_debug="false"
//! enable_graphics="true"
//! dependencies="glfw,glad,glm"
//! ```
//!
//! Unknown keys and lines without `=` are ignored when reading.

use crate::files::FileResource;
use anyhow::{Context, Result};
use std::path::Path;

pub const CONFIG_FILE: &str = ".harbourConfig";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarbourConfig {
    pub project_name: String,
    pub cpp_version: u32,
    pub runtime_bin: String,
    pub runtime_lib: String,
    pub enable_debug: bool,
    pub enable_graphics: bool,
    pub dependencies: Vec<String>,
}

impl Default for HarbourConfig {
    fn default() -> Self {
        Self {
            project_name: String::new(),
            cpp_version: 17,
            runtime_bin: "bin".to_string(),
            runtime_lib: "lib".to_string(),
            enable_debug: false,
            enable_graphics: false,
            dependencies: Vec::new(),
        }
    }
}

impl HarbourConfig {
    /// Load `<project_dir>/.harbourConfig`.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let path = project_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Err(anyhow::anyhow!(
                "{} not found in {}\n\n\
                💡 Tip: Run 'harbour new <name>' to create a project.",
                CONFIG_FILE,
                project_dir.display()
            ));
        }

        let mut file = FileResource::new(&path, "r")?;
        file.try_open()
            .with_context(|| format!("Failed to open {}", path.display()))?;
        let lines = file
            .read_lines()
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::parse(lines.as_slice()).with_context(|| format!("Invalid {}", path.display()))
    }

    /// Write `<project_dir>/.harbourConfig`, replacing any previous content.
    pub fn save(&self, project_dir: &Path) -> Result<()> {
        let path = project_dir.join(CONFIG_FILE);
        let mut file = FileResource::new(&path, "w")?;
        file.try_open()
            .with_context(|| format!("Failed to create {}", path.display()))?;
        file.write_lines(self.render())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn parse<S: AsRef<str>>(lines: &[S]) -> Result<Self> {
        let mut config = Self::default();
        for line in lines {
            let Some((key, raw)) = line.as_ref().split_once('=') else {
                continue;
            };
            let value = unquote(raw.trim());
            match key.trim() {
                "project_name" => config.project_name = value.to_string(),
                "cpp_version" => {
                    config.cpp_version = value
                        .parse()
                        .with_context(|| format!("cpp_version must be a number, got '{}'", value))?;
                }
                "runtime_bin" => config.runtime_bin = value.to_string(),
                "runtime_lib" => config.runtime_lib = value.to_string(),
                "enable_debug" => config.enable_debug = value == "true",
                "enable_graphics" => config.enable_graphics = value == "true",
                "dependencies" => {
                    config.dependencies = value
                        .split(',')
                        .map(str::trim)
                        .filter(|d| !d.is_empty())
                        .map(String::from)
                        .collect();
                }
                _ => {}
            }
        }

        if config.project_name.is_empty() {
            anyhow::bail!("project_name is missing");
        }
        Ok(config)
    }

    pub fn render(&self) -> Vec<String> {
        vec![
            format!("project_name=\"{}\"", self.project_name),
            format!("cpp_version=\"{}\"", self.cpp_version),
            format!("runtime_bin=\"{}\"", self.runtime_bin),
            format!("runtime_lib=\"{}\"", self.runtime_lib),
            format!("enable_debug=\"{}\"", self.enable_debug),
            format!("enable_graphics=\"{}\"", self.enable_graphics),
            format!("dependencies=\"{}\"", self.dependencies.join(",")),
        ]
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> HarbourConfig {
        HarbourConfig {
            project_name: "demo".to_string(),
            cpp_version: 20,
            runtime_bin: "out/bin".to_string(),
            runtime_lib: "out/lib".to_string(),
            enable_debug: true,
            enable_graphics: true,
            dependencies: vec!["glfw".into(), "glad".into(), "glm".into()],
        }
    }

    #[test]
    fn test_render_format() {
        let lines = sample().render();
        assert_eq!(lines[0], "project_name=\"demo\"");
        assert_eq!(lines[1], "cpp_version=\"20\"");
        assert_eq!(lines[4], "enable_debug=\"true\"");
        assert_eq!(lines[6], "dependencies=\"glfw,glad,glm\"");
    }

    #[test]
    fn test_parse_ignores_noise() {
        let lines = [
            "# comment without assignment",
            "project_name=\"demo\"",
            "unknown_key=\"whatever\"",
            "cpp_version=\"14\"",
            "enable_graphics=\"false\"",
            "dependencies=\"\"",
        ];
        let cfg = HarbourConfig::parse(&lines).unwrap();
        assert_eq!(cfg.project_name, "demo");
        assert_eq!(cfg.cpp_version, 14);
        assert_eq!(cfg.runtime_bin, "bin");
        assert!(!cfg.enable_graphics);
        assert!(cfg.dependencies.is_empty());
    }

    #[test]
    fn test_parse_unquoted_values() {
        let cfg = HarbourConfig::parse(&["project_name=raw", "cpp_version=11"]).unwrap();
        assert_eq!(cfg.project_name, "raw");
        assert_eq!(cfg.cpp_version, 11);
    }

    #[test]
    fn test_parse_rejects_bad_version() {
        let err = HarbourConfig::parse(&["project_name=\"x\"", "cpp_version=\"latest\""])
            .unwrap_err();
        assert!(err.to_string().contains("cpp_version"));
    }

    #[test]
    fn test_parse_requires_name() {
        assert!(HarbourConfig::parse(&["cpp_version=\"17\""]).is_err());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let cfg = sample();
        cfg.save(dir.path()).unwrap();
        let loaded = HarbourConfig::load(dir.path()).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = HarbourConfig::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains(".harbourConfig not found"));
    }
}
