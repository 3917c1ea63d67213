//! Running the built executable.
//!
//! `harbour run` picks whichever of the debug and release binaries was built
//! most recently and runs it with the terminal attached.

use super::utils::Profile;
use crate::config::HarbourConfig;
use crate::process::ProcessRunner;
use crate::ui;
use anyhow::Result;
use std::ffi::OsString;
use std::fs;
use std::path::Path;
use std::time::SystemTime;
use tracing::debug;

/// Choose between the release and debug binaries by modification time.
/// Ties go to release.
pub fn select_profile(release: Option<SystemTime>, debug: Option<SystemTime>) -> Option<Profile> {
    match (release, debug) {
        (Some(r), Some(d)) if d > r => Some(Profile::Debug),
        (Some(_), _) => Some(Profile::Release),
        (None, Some(_)) => Some(Profile::Debug),
        (None, None) => None,
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

pub fn run_project(root: &Path, run_args: &[String]) -> Result<bool> {
    let config = HarbourConfig::load(root)?;
    let release_bin = Profile::Release.binary_path(root, &config);
    let debug_bin = Profile::Debug.binary_path(root, &config);

    let Some(profile) = select_profile(modified(&release_bin), modified(&debug_bin)) else {
        ui::error("No built binary found. Build the project first.");
        return Ok(false);
    };
    let bin = profile.binary_path(root, &config);

    ui::section(&format!("Running {} ...", bin.display()));

    let mut argv: Vec<OsString> = vec![bin.clone().into_os_string()];
    argv.extend(run_args.iter().map(OsString::from));
    debug!(binary = %bin.display(), args = ?run_args, "running project");

    let result = ProcessRunner::new().run(argv.as_slice(), false);
    if result.spawn_failed() {
        ui::error(&format!("Could not start {}: {}", bin.display(), result.stderr.trim()));
        return Ok(false);
    }
    if !result.success() {
        ui::error(&format!(
            "{} exited with code {}",
            config.project_name,
            result.exit_code()
        ));
        return Ok(false);
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_select_profile() {
        let old = SystemTime::UNIX_EPOCH + Duration::from_secs(100);
        let new = SystemTime::UNIX_EPOCH + Duration::from_secs(200);

        assert_eq!(select_profile(None, None), None);
        assert_eq!(select_profile(Some(old), None), Some(Profile::Release));
        assert_eq!(select_profile(None, Some(old)), Some(Profile::Debug));
        assert_eq!(select_profile(Some(old), Some(new)), Some(Profile::Debug));
        assert_eq!(select_profile(Some(new), Some(old)), Some(Profile::Release));
        assert_eq!(select_profile(Some(old), Some(old)), Some(Profile::Release));
    }

    #[test]
    fn test_run_without_binary_fails() {
        let dir = tempfile::tempdir().unwrap();
        HarbourConfig {
            project_name: "demo".to_string(),
            ..Default::default()
        }
        .save(dir.path())
        .unwrap();
        assert!(!run_project(dir.path(), &[]).unwrap());
    }
}
