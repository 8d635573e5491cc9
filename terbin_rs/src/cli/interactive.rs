//! `terbin --interactive`: read a line, dispatch it, repeat until `exit`.

use std::io::{self, Write};

use console::style;

use crate::cli::dispatch::Dispatcher;
use crate::cli::parser::helpers::tokenize;
use crate::context::Context;
use crate::log::Logger;
use crate::paths::Paths;

const PROMPT: &str = "terbin> ";

/// Line that ends the loop.
pub const EXIT_COMMAND: &str = "exit";

/// Read one line from stdin. `None` at end of input.
fn read_stdin_line() -> io::Result<Option<String>> {
    print!("{}", style(PROMPT).bold());
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

/// Interactive loop over stdin with console output.
pub fn run(dispatcher: &Dispatcher, paths: &Paths) -> anyhow::Result<()> {
    println!(
        "{}",
        style("Terbin interactive mode. Type 'help' for commands, 'exit' to quit.").dim()
    );
    let turns = run_with(dispatcher, paths, read_stdin_line, Logger::console)?;
    tracing::debug!(turns, "interactive session ended");
    Ok(())
}

/// Drive the loop from `next_line`, building each turn's logger with
/// `logger`. Returns the number of dispatched turns.
///
/// A command error is reported on the turn's logger and the loop goes on.
pub fn run_with<R, L>(
    dispatcher: &Dispatcher,
    paths: &Paths,
    mut next_line: R,
    mut logger: L,
) -> anyhow::Result<usize>
where
    R: FnMut() -> io::Result<Option<String>>,
    L: FnMut() -> Logger,
{
    let mut turns = 0;
    while let Some(line) = next_line()? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case(EXIT_COMMAND) {
            break;
        }

        let tokens = tokenize(line);
        let mut ctx = Context::load(paths.clone(), logger());
        if let Err(e) = dispatcher.dispatch(&mut ctx, &tokens) {
            tracing::debug!(error = %e, "command failed");
            ctx.log.error(format!("Command failed: {e:#}"));
        }
        turns += 1;
    }
    Ok(turns)
}
