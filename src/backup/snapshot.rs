//! Snapshot naming and discovery of the newest snapshot on the remote host.
//!
//! Published snapshots are named after the local time their run started,
//! formatted with [`SNAPSHOT_TIME_FORMAT`]. Every field of that format is
//! fixed width and zero padded, which makes byte-wise ordering of the names
//! identical to chronological ordering. [`find_latest_snapshot`] relies on
//! this and never parses a name; any change to the format must keep that
//! property. `temp` sorts after every digit-led name, so an unpublished
//! snapshot always wins.

use crate::backup::process::CommandRunner;
use crate::backup::remote::{join_remote, RemoteExecutor};
use crate::backup::result_error::result::Result;
use crate::backup::result_error::WithMsg;
use chrono::{DateTime, TimeZone};
use std::fmt::Display;

/// `YYYY-MM-DD_HHMMSS`
pub static SNAPSHOT_TIME_FORMAT: &str = "%Y-%m-%d_%H%M%S";

/// Name of the snapshot being built and not yet published.
pub static TEMP_SNAPSHOT_NAME: &str = "temp";

pub fn snapshot_name<T: TimeZone>(started_at: &DateTime<T>) -> String
where
    T::Offset: Display,
{
    started_at.format(SNAPSHOT_TIME_FORMAT).to_string()
}

pub fn temp_snapshot_path(root: &str) -> String {
    join_remote(root, TEMP_SNAPSHOT_NAME)
}

/// The newest entry below the snapshot root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LatestSnapshot {
    /// The root holds no snapshot yet.
    None,
    /// An earlier run stopped before publishing.
    InProgress(String),
    Published(String),
}

impl LatestSnapshot {
    fn from_path(path: Option<String>) -> Self {
        match path {
            None => LatestSnapshot::None,
            Some(path) if is_temp_snapshot(&path) => LatestSnapshot::InProgress(path),
            Some(path) => LatestSnapshot::Published(path),
        }
    }
}

fn is_temp_snapshot(path: &str) -> bool {
    path.rsplit('/').next() == Some(TEMP_SNAPSHOT_NAME)
}

/// Picks the lexically greatest path out of `find` output.
pub fn latest_of_listing(listing: &str) -> Option<String> {
    listing
        .lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty())
        .max()
        .map(String::from)
}

/// Lists the directories directly below `root` and returns the newest one.
pub fn find_latest_snapshot<R: CommandRunner>(
    remote: &RemoteExecutor<'_, R>,
    root: &str,
) -> Result<LatestSnapshot> {
    let listing = remote
        .execute_or_fail(
            "find",
            &[root, "-mindepth", "1", "-maxdepth", "1", "-type", "d"],
        )
        .with_msg(format!("Listing snapshots in {root} failed"))?;

    let latest = LatestSnapshot::from_path(latest_of_listing(&listing));
    tracing::debug!("Latest snapshot in {root}: {latest:?}");
    Ok(latest)
}
