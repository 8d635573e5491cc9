//! Shared `main` body: pick the mode and hand the arguments to the dispatcher.

use crate::cli::dispatch::Dispatcher;
use crate::cli::parser::{Mode, parse_mode};
use crate::cli::{interactive, pipe};
use crate::context::Context;
use crate::log::Logger;
use crate::paths::Paths;

/// Run terbin with `args` (program name excluded).
///
/// Errors are those a command did not handle itself; the binary turns them
/// into a non-zero exit status.
pub fn run(args: Vec<String>) -> anyhow::Result<()> {
    let paths = Paths::discover();
    let dispatcher = Dispatcher::builtin();
    tracing::debug!(
        work_dir = %paths.work_dir.display(),
        home = %paths.home_dir.display(),
        "starting"
    );

    match parse_mode(&args) {
        Mode::Single(args) => {
            let mut ctx = Context::load(paths, Logger::console());
            dispatcher.dispatch(&mut ctx, &args)?;
            Ok(())
        }
        Mode::Interactive => interactive::run(&dispatcher, &paths),
        Mode::Pipe(name) => pipe::serve(&dispatcher, &paths, &name),
    }
}
