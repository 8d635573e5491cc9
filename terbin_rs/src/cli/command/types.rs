//! Command descriptor.

use std::fmt;

use crate::context::Context;

/// Entry point of a command: context plus the arguments after the command token.
///
/// `Ok(())` covers every handled outcome, failures included (they are logged
/// and answered with a response). `Err` is reserved for the unexpected.
pub type RunFn = fn(&mut Context, &[String]) -> anyhow::Result<()>;

/// One named command. Immutable once registered.
#[derive(Clone, Copy)]
pub struct CommandSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub run: RunFn,
}

impl CommandSpec {
    pub const fn new(name: &'static str, description: &'static str, run: RunFn) -> Self {
        Self {
            name,
            description,
            run,
        }
    }

    /// `  <name> - <description>`
    pub fn listing_line(&self) -> String {
        format!("  {} - {}", self.name, self.description)
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}
