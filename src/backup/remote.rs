//! Commands executed on the snapshot host through `ssh`.

use crate::backup::backup_config::RemoteConfig;
use crate::backup::process::{CommandOutput, CommandRunner};
use crate::backup::result_error::result::{check_status, Result};
use itertools::Itertools;

pub static SSH_PROGRAM: &str = "ssh";

/// Runs single commands in the login shell of `user@host`.
///
/// Password authentication is switched off, so a key (or agent) must already
/// grant access; a prompt would otherwise block the run forever.
pub struct RemoteExecutor<'a, R: CommandRunner> {
    login: String,
    runner: &'a R,
}

impl<'a, R: CommandRunner> RemoteExecutor<'a, R> {
    pub fn new(remote: &RemoteConfig, runner: &'a R) -> Self {
        Self {
            login: remote.login(),
            runner,
        }
    }

    /// The runner used for local commands that talk to the same host.
    pub fn runner(&self) -> &'a R {
        self.runner
    }

    /// `user@host:path`, the destination form understood by `rsync`.
    pub fn target(&self, path: &str) -> String {
        format!("{}:{}", self.login, path)
    }

    pub fn execute(&self, command: &str, args: &[&str]) -> CommandOutput {
        let ssh_args = ["-o", "PasswordAuthentication=no", self.login.as_str(), command]
            .into_iter()
            .chain(args.iter().copied())
            .map(String::from)
            .collect_vec();
        self.runner.run(SSH_PROGRAM, &ssh_args)
    }

    /// Like [`execute`](Self::execute), but any non-zero status becomes an
    /// error carrying the normalised output.
    pub fn execute_or_fail(&self, command: &str, args: &[&str]) -> Result<String> {
        let CommandOutput { output, status } = self.execute(command, args);
        check_status(
            std::iter::once(command).chain(args.iter().copied()).join(" "),
            status.code(),
            &output,
        )?;
        Ok(output)
    }

    pub fn directory_exists(&self, path: &str) -> bool {
        self.execute("test", &["-d", path]).status.success()
    }
}

/// Appends `name` to a remote directory path.
pub fn join_remote(dir: &str, name: &str) -> String {
    if dir.ends_with('/') {
        format!("{dir}{name}")
    } else {
        format!("{dir}/{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::process::ExitStatus;
    use crate::backup::result_error::error::Error;
    use crate::backup::testing::FakeRunner;

    fn remote() -> RemoteConfig {
        RemoteConfig::builder()
            .user("backup")
            .server("nas")
            .path("/srv/snap")
            .build()
    }

    #[test]
    fn test_execute_invocation_shape() {
        let runner = FakeRunner::new();
        let executor = RemoteExecutor::new(&remote(), &runner);

        executor.execute("mkdir", &["-p", "/srv/snap/temp"]);

        assert_eq!(
            runner.calls(),
            vec!["ssh -o PasswordAuthentication=no backup@nas mkdir -p /srv/snap/temp"]
        );
    }

    #[test]
    fn test_execute_returns_output_unchanged() {
        let runner = FakeRunner::new().respond(
            "test -d",
            CommandOutput::new("  weird\noutput\n", ExitStatus::Exited(2)),
        );
        let executor = RemoteExecutor::new(&remote(), &runner);

        let out = executor.execute("test", &["-d", "/x"]);
        assert_eq!(out.output, "  weird\noutput\n");
        assert_eq!(out.status, ExitStatus::Exited(2));
    }

    #[test]
    fn test_execute_or_fail_success_returns_output() {
        let runner = FakeRunner::new().respond(
            "find",
            CommandOutput::new("/srv/snap/a\n", ExitStatus::Exited(0)),
        );
        let executor = RemoteExecutor::new(&remote(), &runner);

        assert_eq!(
            executor.execute_or_fail("find", &["/srv/snap"]).unwrap(),
            "/srv/snap/a\n"
        );
    }

    #[test]
    fn test_execute_or_fail_normalizes_output() {
        let runner = FakeRunner::new().respond(
            "mv",
            CommandOutput::new(
                "mv: cannot stat '/srv/snap/temp':\nNo such file or directory\n",
                ExitStatus::Exited(1),
            ),
        );
        let executor = RemoteExecutor::new(&remote(), &runner);

        match executor.execute_or_fail("mv", &["/srv/snap/temp", "/srv/snap/x"]) {
            Err(Error::RemoteCommand {
                command,
                exit_code,
                output,
            }) => {
                assert_eq!(command, "mv /srv/snap/temp /srv/snap/x");
                assert_eq!(exit_code, 1);
                assert_eq!(
                    output,
                    "mv: cannot stat '/srv/snap/temp': No such file or directory"
                );
            }
            other => panic!("Expected RemoteCommand error, got {other:?}"),
        }
    }

    #[test]
    fn test_execute_or_fail_unknown_status_is_failure() {
        let runner = FakeRunner::new().respond(
            "mkdir",
            CommandOutput::new("No such file or directory (os error 2)", ExitStatus::Unknown),
        );
        let executor = RemoteExecutor::new(&remote(), &runner);

        assert!(executor.execute_or_fail("mkdir", &["-p", "/x"]).is_err());
    }

    #[test]
    fn test_directory_exists() {
        let runner = FakeRunner::new().respond(
            "test -d /srv/snap/missing",
            CommandOutput::new("", ExitStatus::Exited(1)),
        );
        let executor = RemoteExecutor::new(&remote(), &runner);

        assert!(executor.directory_exists("/srv/snap/present"));
        assert!(!executor.directory_exists("/srv/snap/missing"));
    }

    #[test]
    fn test_target_and_join() {
        let runner = FakeRunner::new();
        let executor = RemoteExecutor::new(&remote(), &runner);

        assert_eq!(executor.target("/srv/snap/temp/a"), "backup@nas:/srv/snap/temp/a");
        assert_eq!(join_remote("/srv/snap", "temp"), "/srv/snap/temp");
        assert_eq!(join_remote("/", "temp"), "/temp");
    }
}
