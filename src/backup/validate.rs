//! Validation functions for configuration values.
//!
//! Provides custom validation functions for remote login names, local
//! directories, source folders and the log file location.

use validator::ValidationError;

use std::path::{Component, Path};

pub fn validate_dir_exist<P: AsRef<Path>>(dir: P) -> Result<(), ValidationError> {
    let dir = dir.as_ref();
    if dir.exists() {
        if !dir.is_dir() {
            return Err(ValidationError::new("InvalidDirectory")
                .with_message(format!("{:?} is not a directory", dir).into()));
        }
    } else {
        return Err(ValidationError::new("InvalidDirectory")
            .with_message(format!("{:?} not found", dir).into()));
    }

    Ok(())
}

/// User and host names end up in `user@host:path`, so they must not contain
/// the separators of that form or whitespace.
pub fn validate_login_part<S: AsRef<str>>(value: S) -> Result<(), ValidationError> {
    let value = value.as_ref();
    if value.is_empty() {
        return Err(ValidationError::new("InvalidLogin").with_message("must not be empty".into()));
    }
    if value
        .chars()
        .any(|c| c.is_whitespace() || c == '@' || c == ':')
    {
        return Err(ValidationError::new("InvalidLogin").with_message(
            format!("{value:?} must not contain whitespace, '@' or ':'").into(),
        ));
    }

    Ok(())
}

pub fn validate_remote_root<S: AsRef<str>>(root: S) -> Result<(), ValidationError> {
    if root.as_ref().trim().is_empty() {
        return Err(ValidationError::new("InvalidRemotePath")
            .with_message("remote path must not be empty".into()));
    }

    Ok(())
}

/// Source folders are joined onto both the local base path and the snapshot
/// directory, so they have to stay below both.
pub fn validate_source_folder<P: AsRef<Path>>(folder: P) -> Result<(), ValidationError> {
    let folder = folder.as_ref();
    let mut components = folder.components().peekable();
    if components.peek().is_none() {
        return Err(ValidationError::new("InvalidSourceFolder")
            .with_message("source folder must not be empty".into()));
    }

    for component in components {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            _ => {
                return Err(ValidationError::new("InvalidSourceFolder").with_message(
                    format!("{folder:?} must be a relative path without '..'").into(),
                ))
            }
        }
    }

    Ok(())
}

pub fn validate_source_folders<P: AsRef<Path>>(folders: &[P]) -> Result<(), ValidationError> {
    folders.iter().try_for_each(validate_source_folder)
}

pub fn validate_log_path<P: AsRef<Path>>(path: P) -> Result<(), ValidationError> {
    let path = path.as_ref();
    if path.is_dir() {
        return Err(ValidationError::new("InvalidLogPath")
            .with_message(format!("{path:?} is a directory").into()));
    }

    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => validate_dir_exist(parent),
        _ => Ok(()),
    }
}
