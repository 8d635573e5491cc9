//! Invocation mode selection and token helpers.

pub mod helpers;

/// Default local channel name for `--pipe`.
pub const DEFAULT_PIPE_NAME: &str = "terbin";

/// How the process was asked to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// `terbin <token> [args...]`
    Single(Vec<String>),
    /// `terbin --interactive`
    Interactive,
    /// `terbin --pipe [name]`
    Pipe(String),
}

/// Pick the mode from the process arguments (program name excluded).
/// Only the first argument selects a loop mode; anything else is a command.
pub fn parse_mode(args: &[String]) -> Mode {
    match args.first().map(|a| a.to_ascii_lowercase()) {
        Some(flag) if flag == "--interactive" => Mode::Interactive,
        Some(flag) if flag == "--pipe" => Mode::Pipe(
            args.get(1)
                .filter(|name| !name.trim().is_empty())
                .cloned()
                .unwrap_or_else(|| DEFAULT_PIPE_NAME.to_string()),
        ),
        _ => Mode::Single(args.to_vec()),
    }
}
