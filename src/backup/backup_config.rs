use crate::backup::result_error::error::Error;
use crate::backup::result_error::result::Result;
use crate::backup::result_error::WithMsg;
use crate::backup::validate::{
    validate_log_path, validate_login_part, validate_remote_root, validate_source_folders,
};
use bon::Builder;
use getset::Getters;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, OneOrMany};
use std::fs::File;
use std::path::{Path, PathBuf};
use validator::Validate;

/// File names looked up when no config path is given on the command line.
pub static CONFIG_FILE_NAMES: [&str; 2] = ["hardlink-snapshot.yml", "hardlink-snapshot.yaml"];

/// Everything a backup run needs to know, loaded once before any remote
/// command is issued.
#[derive(Clone, Debug, Serialize, Deserialize, Validate, Builder, Getters)]
#[serde(deny_unknown_fields)]
#[getset(get = "pub")]
pub struct BackupConfig {
    #[validate(nested)]
    remote: RemoteConfig,
    #[validate(nested)]
    local: LocalConfig,
}

/// The host holding the snapshots and how to log in to it.
#[derive(Clone, Debug, Serialize, Deserialize, Validate, Builder, Getters, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
#[getset(get = "pub")]
pub struct RemoteConfig {
    #[validate(custom(function = validate_login_part))]
    #[builder(into)]
    user: String,
    #[validate(custom(function = validate_login_part))]
    #[builder(into)]
    server: String,
    /// Directory whose immediate children are the snapshots.
    #[validate(custom(function = validate_remote_root))]
    #[builder(into)]
    path: String,
}

#[serde_as]
#[derive(Clone, Debug, Serialize, Deserialize, Validate, Builder, Getters, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
#[getset(get = "pub")]
pub struct LocalConfig {
    /// Checked when each folder is synced, so a missing base directory
    /// fails inside the logged session.
    #[serde(alias = "basepath")]
    #[builder(into)]
    base_path: PathBuf,
    /// Folders below `base_path`, synced in this order.
    #[serde_as(as = "OneOrMany<_>")]
    #[validate(custom(function = validate_source_folders))]
    #[builder(into)]
    paths: Vec<PathBuf>,
    #[serde(alias = "logpath")]
    #[validate(custom(function = validate_log_path))]
    #[builder(into)]
    log_path: PathBuf,
}

impl RemoteConfig {
    /// The snapshot root without trailing slashes, `/` itself excepted.
    pub fn root(&self) -> &str {
        let trimmed = self.path.trim_end_matches('/');
        if trimmed.is_empty() && self.path.starts_with('/') {
            "/"
        } else {
            trimmed
        }
    }

    pub fn login(&self) -> String {
        format!("{}@{}", self.user, self.server)
    }
}

impl BackupConfig {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config: BackupConfig = File::open(path)
            .map_err(Error::from)
            .and_then(|f| serde_yml::from_reader(f).map_err(Error::from))
            .with_msg(format!("Parse YAML config failed: {:?}", path))?;
        config
            .validate()
            .map_err(Error::from)
            .with_msg(format!("Config validation failed: {:?}", path))?;
        Ok(config)
    }

    /// Loads `explicit` when given, otherwise the first existing default
    /// config file.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_yaml_file(path),
            None => {
                let candidates = default_config_candidates();
                match candidates.iter().find(|p| p.is_file()) {
                    Some(path) => {
                        tracing::debug!("Using config file {:?}", path);
                        Self::from_yaml_file(path)
                    }
                    None => Err(Error::ConfigNotFound {
                        searched: candidates,
                    }),
                }
            }
        }
    }
}

/// `/etc`, `$HOME/.local` and the working directory, in that order.
pub fn default_config_candidates() -> Vec<PathBuf> {
    let dirs = [
        Some(PathBuf::from("/etc")),
        dirs::home_dir().map(|home| home.join(".local")),
        Some(PathBuf::from(".")),
    ];

    dirs.into_iter()
        .flatten()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .collect()
}
