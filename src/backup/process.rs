//! Local process execution with combined output capture.
//!
//! Everything the backup does to the remote host or the network goes through
//! a [`CommandRunner`], which keeps the session logic testable without `ssh`.

use derive_more::Display;
use itertools::Itertools;
use std::io::{Read, Seek, SeekFrom};
use std::process::{Command, Stdio};

/// Status reported when a process ran but no exit code can be obtained, or
/// when it could not be started at all.
pub const FALLBACK_EXIT_CODE: i32 = 1;

/// How a child process terminated.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum ExitStatus {
    /// The process ran and exited with this code.
    #[display("exited with {_0}")]
    Exited(i32),
    /// The process could not be started, or it ended without an exit code
    /// (for instance killed by a signal).
    #[display("unknown status")]
    Unknown,
}

impl ExitStatus {
    pub fn code(&self) -> i32 {
        match self {
            ExitStatus::Exited(code) => *code,
            ExitStatus::Unknown => FALLBACK_EXIT_CODE,
        }
    }

    pub fn success(&self) -> bool {
        self.code() == 0
    }
}

impl From<std::process::ExitStatus> for ExitStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        status.code().map_or(ExitStatus::Unknown, ExitStatus::Exited)
    }
}

/// Combined stdout/stderr text of a finished process and its status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandOutput {
    pub output: String,
    pub status: ExitStatus,
}

impl CommandOutput {
    pub fn new<S: Into<String>>(output: S, status: ExitStatus) -> Self {
        Self {
            output: output.into(),
            status,
        }
    }
}

pub trait CommandRunner {
    /// Runs `program` with `args` to completion. Never fails: problems starting
    /// the process are reported as [`ExitStatus::Unknown`] with the error text
    /// as output.
    fn run(&self, program: &str, args: &[String]) -> CommandOutput;
}

/// Runs commands on the local machine.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[String]) -> CommandOutput {
        tracing::debug!("Running: {} {}", program, args.iter().join(" "));
        match run_with_combined_output(program, args) {
            Ok(output) => output,
            Err(e) => {
                tracing::debug!("Could not run {program}: {e}");
                CommandOutput::new(e.to_string(), ExitStatus::Unknown)
            }
        }
    }
}

// stdout and stderr share one file so their lines interleave in write order.
fn run_with_combined_output(program: &str, args: &[String]) -> std::io::Result<CommandOutput> {
    let mut capture = tempfile::tempfile()?;
    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(capture.try_clone()?)
        .stderr(capture.try_clone()?)
        .status()?;

    capture.seek(SeekFrom::Start(0))?;
    let mut raw = Vec::new();
    capture.read_to_end(&mut raw)?;

    Ok(CommandOutput::new(
        String::from_utf8_lossy(&raw),
        status.into(),
    ))
}
