//! Child process execution.
//!
//! Every external tool harbour drives (`cmake`, `make`, `git`, the glad
//! generator, the user's own binary) goes through [`ProcessRunner::run`].
//!
//! ## Contract
//!
//! - One child per call, run to completion.
//! - With capture enabled, stdout and stderr are drained by two reader threads
//!   while the child runs, so a child that fills one pipe never blocks on it.
//! - With a deadline the child runs in its own process group (Unix), and an
//!   expired deadline kills the whole group. Readers still blocked shortly
//!   after that are abandoned, so `run` returns soon after the deadline.
//! - Failures are values: a missing executable, a non-zero exit, a signal or an
//!   expired deadline all come back as an [`ExecutionResult`].
//!
//! ## Example
//!
//! ```no_run
//! use harbour::process::ProcessRunner;
//!
//! let result = ProcessRunner::new().run(&["git", "--version"], true);
//! if result.success() {
//!     println!("{}", result.stdout.trim());
//! }
//! ```

use std::ffi::OsStr;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use wait_timeout::ChildExt;

/// Exit code reported when the child could not be started at all.
pub const SPAWN_FAILURE_CODE: i32 = -1;

/// Exit code reported when the child terminated without an exit status
/// (killed by a signal, or the wait itself failed).
pub const ABNORMAL_EXIT_CODE: i32 = -2;

/// Exit code reported when the child was killed for exceeding its deadline.
pub const TIMED_OUT_CODE: i32 = -3;

/// How long output readers may keep running once the child has been killed.
const READER_GRACE: Duration = Duration::from_millis(500);

/// How a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The child exited on its own with this status.
    Exited(i32),
    /// No exit status; `signal` is set when a signal ended the child.
    Abnormal { signal: Option<i32> },
    /// The child was never started.
    SpawnFailed,
    /// The child outlived the runner's deadline and was killed.
    TimedOut,
}

/// Outcome of a single [`ProcessRunner::run`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub termination: Termination,
    pub stdout: String,
    pub stderr: String,
}

impl ExecutionResult {
    /// Numeric status. Non-negative values come from the child; the negative
    /// sentinels are `SPAWN_FAILURE_CODE`, `ABNORMAL_EXIT_CODE` and
    /// `TIMED_OUT_CODE`.
    pub fn exit_code(&self) -> i32 {
        match self.termination {
            Termination::Exited(code) => code,
            Termination::Abnormal { .. } => ABNORMAL_EXIT_CODE,
            Termination::SpawnFailed => SPAWN_FAILURE_CODE,
            Termination::TimedOut => TIMED_OUT_CODE,
        }
    }

    pub fn success(&self) -> bool {
        self.termination == Termination::Exited(0)
    }

    pub fn spawn_failed(&self) -> bool {
        self.termination == Termination::SpawnFailed
    }

    fn spawn_failure(reason: String) -> Self {
        Self {
            termination: Termination::SpawnFailed,
            stdout: String::new(),
            stderr: reason,
        }
    }
}

/// Runs external commands synchronously.
///
/// The runner holds only per-call settings; it is cheap to clone and keeps no
/// state between calls.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    cwd: Option<PathBuf>,
    timeout: Option<Duration>,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run children in `dir` instead of the caller's working directory.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Kill the child, and everything it started, if it is still running
    /// after `timeout`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Run `argv[0]` (looked up on `PATH`) with the remaining elements as
    /// literal arguments, and wait for it to finish.
    ///
    /// With `capture_output` the child's stdout and stderr are collected into
    /// the result; otherwise they are inherited from this process and the
    /// result's text fields stay empty.
    pub fn run<S: AsRef<OsStr>>(&self, argv: &[S], capture_output: bool) -> ExecutionResult {
        let Some((program, args)) = argv.split_first() else {
            return ExecutionResult::spawn_failure("empty argument vector".to_string());
        };

        let mut cmd = Command::new(program);
        cmd.args(args);
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }
        if capture_output {
            cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        }
        // A deadline kills the whole group, including grandchildren.
        #[cfg(unix)]
        if self.timeout.is_some() {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                return ExecutionResult::spawn_failure(format!(
                    "failed to start '{}': {}",
                    program.as_ref().to_string_lossy(),
                    e
                ));
            }
        };

        // Both readers start before we block on the child.
        let stdout_reader = child.stdout.take().map(|out| thread::spawn(move || drain(out)));
        let stderr_reader = child.stderr.take().map(|err| thread::spawn(move || drain(err)));

        let (termination, wait_error) = match self.wait(&mut child) {
            Ok(termination) => (termination, None),
            Err(e) => {
                kill_child(&mut child);
                let _ = child.wait();
                (Termination::Abnormal { signal: None }, Some(e))
            }
        };

        // A killed child may have left descendants holding the pipes open.
        let give_up_at = (termination == Termination::TimedOut || wait_error.is_some())
            .then(|| Instant::now() + READER_GRACE);

        let mut notes = Vec::new();
        let stdout = join_reader(stdout_reader, "stdout", give_up_at, &mut notes);
        let mut stderr = join_reader(stderr_reader, "stderr", give_up_at, &mut notes);
        if let Some(e) = wait_error {
            notes.push(format!("failed to wait for child: {}", e));
        }
        for note in notes {
            if !stderr.is_empty() && !stderr.ends_with('\n') {
                stderr.push('\n');
            }
            stderr.push_str(&note);
        }

        ExecutionResult {
            termination,
            stdout,
            stderr,
        }
    }

    fn wait(&self, child: &mut Child) -> std::io::Result<Termination> {
        let Some(timeout) = self.timeout else {
            return child.wait().map(termination_of);
        };
        match child.wait_timeout(timeout)? {
            Some(status) => Ok(termination_of(status)),
            None => {
                kill_child(child);
                child.wait()?;
                Ok(Termination::TimedOut)
            }
        }
    }
}

fn termination_of(status: ExitStatus) -> Termination {
    match status.code() {
        Some(code) => Termination::Exited(code),
        None => Termination::Abnormal {
            signal: signal_of(&status),
        },
    }
}

#[cfg(unix)]
fn signal_of(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn signal_of(_status: &ExitStatus) -> Option<i32> {
    None
}

/// Kill the child's process group when it has one, else just the child.
#[cfg(unix)]
fn kill_child(child: &mut Child) {
    if let Ok(pgid) = i32::try_from(child.id()) {
        // The group exists only when a deadline was set; ESRCH otherwise.
        if unsafe { libc::kill(-pgid, libc::SIGKILL) } == 0 {
            return;
        }
    }
    let _ = child.kill();
}

#[cfg(not(unix))]
fn kill_child(child: &mut Child) {
    let _ = child.kill();
}

/// Bytes read from one pipe, and the error that stopped reading early.
struct Drained {
    bytes: Vec<u8>,
    error: Option<io::Error>,
}

fn drain<R: Read>(mut stream: R) -> Drained {
    let mut bytes = Vec::new();
    let mut chunk = [0u8; 8192];
    loop {
        match stream.read(&mut chunk) {
            Ok(0) => return Drained { bytes, error: None },
            Ok(n) => bytes.extend_from_slice(&chunk[..n]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Drained {
                    bytes,
                    error: Some(e),
                };
            }
        }
    }
}

/// Collect a reader's output. With `give_up_at`, a reader still blocked at
/// that instant is abandoned and whatever it had read is lost. Anything that
/// cut the capture short is pushed onto `notes`.
fn join_reader(
    reader: Option<JoinHandle<Drained>>,
    stream: &str,
    give_up_at: Option<Instant>,
    notes: &mut Vec<String>,
) -> String {
    let Some(handle) = reader else {
        return String::new();
    };

    if let Some(limit) = give_up_at {
        while !handle.is_finished() && Instant::now() < limit {
            thread::sleep(Duration::from_millis(10));
        }
        if !handle.is_finished() {
            notes.push(format!(
                "{} capture abandoned: pipe still open after the child was killed",
                stream
            ));
            return String::new();
        }
    }

    match handle.join() {
        Ok(drained) => {
            if let Some(e) = drained.error {
                notes.push(format!("{} capture truncated: {}", stream, e));
            }
            String::from_utf8_lossy(&drained.bytes).into_owned()
        }
        Err(_) => {
            notes.push(format!("{} reader thread panicked", stream));
            String::new()
        }
    }
}
