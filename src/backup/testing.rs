//! Scripted [`CommandRunner`] for exercising the session without a network.

use crate::backup::process::{CommandOutput, CommandRunner, ExitStatus};
use itertools::Itertools;
use std::cell::RefCell;

/// Answers each command with the first rule whose needle occurs in the full
/// command line, or with empty output and status 0 when no rule matches.
#[derive(Default)]
pub struct FakeRunner {
    rules: Vec<(String, CommandOutput)>,
    calls: RefCell<Vec<String>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond<S: Into<String>>(mut self, needle: S, output: CommandOutput) -> Self {
        self.rules.push((needle.into(), output));
        self
    }

    pub fn fail<S: Into<String>>(self, needle: S, exit_code: i32, output: &str) -> Self {
        self.respond(needle, CommandOutput::new(output, ExitStatus::Exited(exit_code)))
    }

    /// Every command line run so far, program first.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn calls_containing(&self, needle: &str) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.contains(needle))
            .cloned()
            .collect()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, program: &str, args: &[String]) -> CommandOutput {
        let line = std::iter::once(program)
            .chain(args.iter().map(String::as_str))
            .join(" ");
        self.calls.borrow_mut().push(line.clone());
        self.rules
            .iter()
            .find(|(needle, _)| line.contains(needle.as_str()))
            .map(|(_, output)| output.clone())
            .unwrap_or_else(|| CommandOutput::new("", ExitStatus::Exited(0)))
    }
}
