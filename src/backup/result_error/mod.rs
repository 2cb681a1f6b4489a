//! Crate-wide error type and the context-attaching extension traits.

use itertools::Itertools;
use std::fmt::Debug;

pub mod error;
pub mod result;

/// Wraps an error with the `Debug` form of the object that was being worked on
/// and the function that failed.
pub trait WithDebugObjectAndFnName<S: Into<String>, O: Debug + 'static> {
    fn with_debug_object_and_fn_name(self, obj: O, fn_name: S) -> Self;
}

/// Wraps an error with a human readable message.
pub trait WithMsg<S: Into<String>> {
    fn with_msg(self, msg: S) -> Self;
}

/// Collapses captured tool output onto a single line.
///
/// Surrounding whitespace is trimmed and every line break (`\n` or `\r\n`)
/// becomes one space, so the text fits in one log record.
pub fn normalize_output<S: AsRef<str>>(output: S) -> String {
    output.as_ref().trim().lines().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_output_joins_lines() {
        assert_eq!(
            normalize_output("  rsync: change_dir failed\r\nrsync error: some files\n"),
            "rsync: change_dir failed rsync error: some files"
        );
    }

    #[test]
    fn test_normalize_output_keeps_blank_lines_as_spaces() {
        assert_eq!(normalize_output("a\n\nb"), "a  b");
    }

    #[test]
    fn test_normalize_output_empty() {
        assert_eq!(normalize_output("\n \n"), "");
    }
}
