use super::feedback::FeedbackAnalyzer;
use crate::config::HarbourConfig;
use crate::process::{ExecutionResult, ProcessRunner};
use crate::ui;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Lines of captured output shown when a step fails.
const FAILURE_TAIL_LINES: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Debug,
    Release,
}

impl Profile {
    pub fn from_debug(debug: bool) -> Self {
        if debug { Profile::Debug } else { Profile::Release }
    }

    pub fn dir_name(self) -> &'static str {
        match self {
            Profile::Debug => "debug",
            Profile::Release => "release",
        }
    }

    /// `<root>/build/<profile>`
    pub fn build_dir(self, root: &Path) -> PathBuf {
        root.join("build").join(self.dir_name())
    }

    /// Where CMake puts the project's executable for this profile.
    pub fn binary_path(self, root: &Path, config: &HarbourConfig) -> PathBuf {
        let bin_name = if cfg!(target_os = "windows") {
            format!("{}.exe", config.project_name)
        } else {
            config.project_name.clone()
        };
        self.build_dir(root).join(&config.runtime_bin).join(bin_name)
    }
}

/// Run one captured build step behind a spinner.
pub fn run_step<S: AsRef<OsStr>>(runner: &ProcessRunner, label: &str, argv: &[S]) -> ExecutionResult {
    let command_line = argv
        .iter()
        .map(|a| a.as_ref().to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ");
    debug!(step = label, command = %command_line, "running step");

    let style = ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    let pb = ProgressBar::new_spinner();
    pb.set_style(style);
    pb.set_message(label.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = runner.run(argv, true);
    pb.finish_and_clear();

    debug!(
        step = label,
        exit_code = result.exit_code(),
        stdout_bytes = result.stdout.len(),
        stderr_bytes = result.stderr.len(),
        "step finished"
    );
    result
}

/// Tell the user why `step` failed, with a hint when the output matches a
/// known problem.
pub fn report_failure(step: &str, result: &ExecutionResult) {
    if result.spawn_failed() {
        ui::error(&format!("{} could not be started: {}", step, result.stderr.trim()));
    } else {
        ui::error(&format!("{} failed (exit code {})", step, result.exit_code()));
        ui::print_output_tail("stderr", &result.stderr, FAILURE_TAIL_LINES);
        if result.stderr.trim().is_empty() {
            ui::print_output_tail("stdout", &result.stdout, FAILURE_TAIL_LINES);
        }
    }
    debug!(step, stdout = %result.stdout, stderr = %result.stderr, "failed step output");

    let combined = format!("{}\n{}", result.stdout, result.stderr);
    if let Some(hint) = FeedbackAnalyzer::analyze(&combined) {
        println!("\n{} {}", "💡".yellow(), hint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> HarbourConfig {
        HarbourConfig {
            project_name: "demo".to_string(),
            runtime_bin: "bin".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_profile_dirs() {
        assert_eq!(Profile::from_debug(true), Profile::Debug);
        assert_eq!(Profile::from_debug(false), Profile::Release);
        assert_eq!(
            Profile::Release.build_dir(Path::new("proj")),
            Path::new("proj").join("build").join("release")
        );
    }

    #[test]
    fn test_binary_path() {
        let path = Profile::Debug.binary_path(Path::new("proj"), &config());
        let expected = Path::new("proj").join("build").join("debug").join("bin");
        assert_eq!(path.parent().unwrap(), expected);
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("demo"));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_step_captures() {
        let result = run_step(&ProcessRunner::new(), "echo", &["echo", "step"]);
        assert!(result.success());
        assert_eq!(result.stdout.trim(), "step");
    }
}
