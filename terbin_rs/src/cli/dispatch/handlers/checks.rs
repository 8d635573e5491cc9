//! Shared precondition messages and usage printing.

use crate::cli::command::help;
use crate::log::Logger;

pub const CONFIG_NOT_LOADED: &str = "Config not loaded.";
pub const NO_MANIFEST: &str = "No manifest loaded. Create one with 'terbin manifest' first.";
pub const NO_FARLANDS_PATH: &str =
    "Farlands path is not configured. Set it with 'terbin config fpath <path>'.";

/// Print the usage lines of `command` at warn level.
pub fn print_usage(log: &mut Logger, command: &str) {
    log.warn("Usage:");
    for line in help::usage(command) {
        log.info(format!("  {line}"));
    }
}

/// Reject the turn (400) and show how `command` is meant to be called.
pub fn reject_usage(log: &mut Logger, command: &str, message: impl Into<String>) {
    log.reject(message);
    print_usage(log, command);
}

/// `true` when `value` is usable as a name, GUID or version.
pub fn is_token(value: &str) -> bool {
    !value.trim().is_empty() && !value.contains(char::is_whitespace)
}
