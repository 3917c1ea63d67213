//! Diagnostic logging.
//!
//! User-facing progress goes to stdout through [`crate::ui`]. This module only
//! wires up `tracing` for diagnostics: the command lines harbour runs and the
//! captured output of steps that failed.
//!
//! The filter comes from `HARBOUR_LOG` (same syntax as `RUST_LOG`) and
//! defaults to `warn`; `--verbose` forces `harbour=debug`.
//!
//! ```bash
//! HARBOUR_LOG=harbour=debug harbour build
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_ENV: &str = "HARBOUR_LOG";

pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("harbour=debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).without_time().compact())
        .try_init();
}
