//! One backup run, from finding the newest snapshot to publishing a new one.
//!
//! The remote directory tree is the only durable state. A run builds its
//! snapshot in `root/temp` and renames it to `root/<start time>` when every
//! folder is synced. A run that dies earlier leaves `temp` behind, and the
//! next run picks it up instead of cloning again.
//!
//! Nothing guards against two sessions working on the same root at once;
//! callers must make sure only one runs.

use crate::backup::backup_config::BackupConfig;
use crate::backup::folder_sync::FolderSyncer;
use crate::backup::process::CommandRunner;
use crate::backup::remote::{join_remote, RemoteExecutor};
use crate::backup::result_error::result::Result;
use crate::backup::result_error::WithMsg;
use crate::backup::snapshot::{
    find_latest_snapshot, snapshot_name, temp_snapshot_path, LatestSnapshot,
};
use chrono::{DateTime, Local};
use derive_more::Display;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum SessionPhase {
    #[display("starting")]
    Start,
    #[display("resolving base snapshot")]
    ResolvingBase,
    #[display("preparing working snapshot")]
    Preparing,
    #[display("syncing folders")]
    Syncing,
    #[display("publishing snapshot")]
    Publishing,
    #[display("done")]
    Done,
}

/// Everything one run decides along the way. Owned by the running session
/// and dropped with it.
#[derive(Clone, Debug)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub base: LatestSnapshot,
    pub working_path: String,
    pub target_path: String,
    pub folders: Vec<PathBuf>,
}

impl SessionState {
    pub fn new(config: &BackupConfig, started_at: DateTime<Local>) -> Self {
        let root = config.remote().root();
        Self {
            phase: SessionPhase::Start,
            base: LatestSnapshot::None,
            working_path: temp_snapshot_path(root),
            target_path: join_remote(root, &snapshot_name(&started_at)),
            folders: config.local().paths().clone(),
        }
    }

    fn enter(&mut self, phase: SessionPhase) {
        tracing::debug!("Session: {} -> {}", self.phase, phase);
        self.phase = phase;
    }
}

pub struct BackupSession<'a, R: CommandRunner> {
    config: &'a BackupConfig,
    remote: RemoteExecutor<'a, R>,
}

impl<'a, R: CommandRunner> BackupSession<'a, R> {
    pub fn new(config: &'a BackupConfig, runner: &'a R) -> Self {
        Self {
            config,
            remote: RemoteExecutor::new(config.remote(), runner),
        }
    }

    /// Runs a session stamped with the current local time.
    pub fn run(&self) -> Result<String> {
        self.run_at(Local::now())
    }

    /// Runs a session whose snapshot is named after `started_at` and returns
    /// the path of the published snapshot.
    ///
    /// Two runs started within the same second get the same name; the
    /// second publish then fails or nests inside the first, depending on the
    /// remote `mv`.
    pub fn run_at(&self, started_at: DateTime<Local>) -> Result<String> {
        let mut state = SessionState::new(self.config, started_at);
        self.advance(&mut state)
            .with_msg(format!("Backup session failed while {}", state.phase))?;
        tracing::info!("Backup written to {}", state.target_path);
        Ok(state.target_path)
    }

    fn advance(&self, state: &mut SessionState) -> Result<()> {
        state.enter(SessionPhase::ResolvingBase);
        self.resolve_base(state)?;
        state.enter(SessionPhase::Preparing);
        self.prepare(state)?;
        state.enter(SessionPhase::Syncing);
        self.sync_all(state)?;
        state.enter(SessionPhase::Publishing);
        self.publish(state)?;
        state.enter(SessionPhase::Done);
        Ok(())
    }

    fn resolve_base(&self, state: &mut SessionState) -> Result<()> {
        state.base = find_latest_snapshot(&self.remote, self.config.remote().root())?;
        Ok(())
    }

    fn prepare(&self, state: &SessionState) -> Result<()> {
        match &state.base {
            LatestSnapshot::None => {
                tracing::info!("First backup");
                self.remote
                    .execute_or_fail("mkdir", &["-p", &state.working_path])?;
            }
            LatestSnapshot::InProgress(path) => {
                tracing::info!("Continue previous failed backup in {path}");
            }
            LatestSnapshot::Published(path) => {
                tracing::info!("Cloning {path} into {}", state.working_path);
                self.remote
                    .execute_or_fail("cp", &["-al", path, &state.working_path])?;
            }
        }
        Ok(())
    }

    fn sync_all(&self, state: &SessionState) -> Result<()> {
        let syncer = FolderSyncer::new(&self.remote, self.config.local().base_path());
        for folder in &state.folders {
            syncer.sync(folder, &state.working_path)?;
        }
        Ok(())
    }

    fn publish(&self, state: &SessionState) -> Result<()> {
        self.remote
            .execute_or_fail("mv", &[&state.working_path, &state.target_path])?;
        Ok(())
    }
}
