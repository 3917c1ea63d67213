mod core;
mod feedback;
mod run;
mod utils;

pub use self::core::{BuildOptions, build_and_run, build_project};
pub use feedback::FeedbackAnalyzer;
pub use run::{run_project, select_profile};
pub use utils::{Profile, report_failure, run_step};
