//! Log file and console output for a backup run.
//!
//! The log file receives every record regardless of verbosity; it is the
//! only record of how far a failed run got. Verbose runs mirror the records
//! to stdout, very verbose runs add debug records (each executed command and
//! every session phase change).

use crate::backup::result_error::error::Error;
use crate::backup::result_error::result::Result;
use crate::backup::result_error::WithMsg;
use derive_more::Display;
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;

#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    #[default]
    Quiet,
    Verbose,
    VeryVerbose,
}

impl From<u8> for Verbosity {
    fn from(count: u8) -> Self {
        match count {
            0 => Verbosity::Quiet,
            1 => Verbosity::Verbose,
            _ => Verbosity::VeryVerbose,
        }
    }
}

impl Verbosity {
    pub fn level(&self) -> LevelFilter {
        match self {
            Verbosity::VeryVerbose => LevelFilter::DEBUG,
            _ => LevelFilter::INFO,
        }
    }
}

pub fn open_log_file<P: AsRef<Path>>(path: P) -> Result<File> {
    let path = path.as_ref();
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(Error::from)
        .with_msg(format!("Cannot open log file {:?}", path))
}

pub fn build_subscriber(log_file: File, verbosity: Verbosity) -> impl Subscriber + Send + Sync {
    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(Mutex::new(log_file));
    let stdout_layer = (verbosity > Verbosity::Quiet)
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stdout));

    tracing_subscriber::registry()
        .with(verbosity.level())
        .with(file_layer)
        .with(stdout_layer)
}

/// Installs the process-wide subscriber writing to `log_path`.
pub fn init_logging<P: AsRef<Path>>(log_path: P, verbosity: Verbosity) -> Result<()> {
    let log_file = open_log_file(log_path)?;
    tracing::subscriber::set_global_default(build_subscriber(log_file, verbosity))
        .map_err(|e| Error::from(std::io::Error::other(e)))
        .with_msg("Logging setup failed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_from_count() {
        assert_eq!(Verbosity::from(0), Verbosity::Quiet);
        assert_eq!(Verbosity::from(1), Verbosity::Verbose);
        assert_eq!(Verbosity::from(2), Verbosity::VeryVerbose);
        assert_eq!(Verbosity::from(7), Verbosity::VeryVerbose);
    }

    #[test]
    fn test_verbosity_level() {
        assert_eq!(Verbosity::Quiet.level(), LevelFilter::INFO);
        assert_eq!(Verbosity::Verbose.level(), LevelFilter::INFO);
        assert_eq!(Verbosity::VeryVerbose.level(), LevelFilter::DEBUG);
    }

    #[test]
    fn test_open_log_file_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.log");
        std::fs::write(&path, "earlier run\n").unwrap();

        let file = open_log_file(&path).unwrap();
        let subscriber = build_subscriber(file, Verbosity::Quiet);
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("Backup started");
            tracing::debug!("not at this verbosity");
        });

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("earlier run\n"));
        assert!(text.contains("Backup started"));
        assert!(!text.contains("not at this verbosity"));
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn test_very_verbose_writes_debug() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.log");

        let subscriber = build_subscriber(open_log_file(&path).unwrap(), Verbosity::VeryVerbose);
        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("Running: ssh");
        });

        assert!(std::fs::read_to_string(&path)
            .unwrap()
            .contains("Running: ssh"));
    }

    #[test]
    fn test_open_log_file_in_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_log_file(dir.path().join("missing/backup.log")).unwrap_err();
        assert!(err.to_string().starts_with("Cannot open log file"));
    }
}
