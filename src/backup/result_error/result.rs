use crate::backup::result_error::error::Error;
use crate::backup::result_error::{WithDebugObjectAndFnName, WithMsg};
use std::fmt::Debug;

pub type Result<T> = std::result::Result<T, Error>;

impl<S: Into<String>, O: Debug + Send + 'static, R> WithDebugObjectAndFnName<S, O> for Result<R> {
    fn with_debug_object_and_fn_name(self, obj: O, fn_name: S) -> Self {
        self.map_err(|e| e.with_debug_object_and_fn_name(obj, fn_name))
    }
}

impl<R, S: Into<String>> WithMsg<S> for Result<R> {
    fn with_msg(self, msg: S) -> Self {
        self.map_err(|e| e.with_msg(msg))
    }
}

/// Turns a captured command result into `Ok` when the status is zero, or a
/// [`Error::RemoteCommand`] carrying the normalised output otherwise.
pub fn check_status<S: Into<String>>(command: S, exit_code: i32, output: &str) -> Result<()> {
    if exit_code == 0 {
        Ok(())
    } else {
        Err(Error::RemoteCommand {
            command: command.into(),
            exit_code,
            output: super::normalize_output(output),
        })
    }
}
