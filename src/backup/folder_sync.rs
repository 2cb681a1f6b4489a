//! Mirrors one local source folder into the working snapshot with `rsync`.

use crate::backup::function_path;
use crate::backup::process::{CommandOutput, CommandRunner};
use crate::backup::remote::{join_remote, RemoteExecutor};
use crate::backup::result_error::error::Error;
use crate::backup::result_error::normalize_output;
use crate::backup::result_error::result::Result;
use crate::backup::result_error::WithDebugObjectAndFnName;
use function_name::named;
use std::path::Path;

/// Transfers run through `nice` so neither host is starved by a backup.
pub static NICE_PROGRAM: &str = "nice";
pub static RSYNC_PROGRAM: &str = "rsync";
/// Archive mode, compressed transfer, and removal of remote entries that no
/// longer exist locally.
pub static RSYNC_FLAGS: [&str; 2] = ["-az", "--delete"];

pub struct FolderSyncer<'a, R: CommandRunner> {
    remote: &'a RemoteExecutor<'a, R>,
    base_path: &'a Path,
}

impl<'a, R: CommandRunner> FolderSyncer<'a, R> {
    pub fn new(remote: &'a RemoteExecutor<'a, R>, base_path: &'a Path) -> Self {
        Self { remote, base_path }
    }

    /// Syncs `base_path/folder/` into `working_snapshot/folder`.
    ///
    /// Running it again over an already synced destination only transfers
    /// what changed since, which is what makes resuming an interrupted
    /// snapshot safe.
    #[named]
    pub fn sync(&self, folder: &Path, working_snapshot: &str) -> Result<()> {
        let source = self.base_path.join(folder);
        if !source.is_dir() {
            return Err(Error::NotADirectory(source)
                .with_debug_object_and_fn_name(folder.to_path_buf(), function_path!()));
        }

        let destination = join_remote(working_snapshot, &folder.to_string_lossy());
        if !self.remote.directory_exists(&destination) {
            tracing::debug!("Creating remote directory {destination}");
            self.remote
                .execute_or_fail("mkdir", &["-p", &destination])
                .with_debug_object_and_fn_name(folder.to_path_buf(), function_path!())?;
        }

        // The trailing slash makes rsync copy the contents, not the folder itself.
        let source_arg = format!("{}/", source.to_string_lossy().trim_end_matches('/'));
        let args: Vec<String> = std::iter::once(RSYNC_PROGRAM)
            .chain(RSYNC_FLAGS)
            .map(String::from)
            .chain([source_arg, self.remote.target(&destination)])
            .collect();

        let CommandOutput { output, status } = self.remote.runner().run(NICE_PROGRAM, &args);
        if status.success() {
            tracing::info!("Backed up {:?}", source);
            Ok(())
        } else {
            Err(Error::Transfer {
                folder: source,
                exit_code: status.code(),
                output: normalize_output(output),
            })
        }
    }
}
