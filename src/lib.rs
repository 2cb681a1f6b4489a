//! # hardlink-snapshot
//!
//! Incremental backups to a remote host as hard-linked snapshot directories.
//!
//! ## How a run works
//!
//! - **Snapshots**: every published snapshot is a directory named after the
//!   start time of its run (`YYYY-MM-DD_HHMMSS`) below a remote root
//! - **Cloning**: a new run copies the newest snapshot with `cp -al`, so
//!   unchanged files share their data with the previous snapshot
//! - **Syncing**: each configured folder is mirrored into the clone with
//!   `rsync -az --delete`, transferring only what changed
//! - **Publishing**: the finished clone is renamed from `temp` to its final
//!   name in one `mv`
//! - **Resuming**: a `temp` directory left by an interrupted run is reused
//!   and re-synced on the next run
//!
//! All remote work goes through `ssh` with key based authentication.
//!
//! ## Quick Start
//!
//! ```no_run
//! use hardlink_snapshot::backup::backup_config::BackupConfig;
//! use hardlink_snapshot::backup::process::SystemCommandRunner;
//! use hardlink_snapshot::backup::session::BackupSession;
//!
//! let config = BackupConfig::from_yaml_file("hardlink-snapshot.yml")?;
//! let published = BackupSession::new(&config, &SystemCommandRunner).run()?;
//! println!("Backup written to {published}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod backup;
