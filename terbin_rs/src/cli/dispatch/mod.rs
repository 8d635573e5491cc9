//! Dispatcher: maps an argument vector onto a registered command.
//!
//! ```text
//! ["--I", "list"] ── strip "--" ──► "I" ── alias ──► "instances" ── lookup ──► run(ctx, ["list"])
//! ```

pub mod handlers;

use crate::cli::command::Registry;
use crate::cli::parser::helpers::strip_command_prefix;
use crate::context::Context;
use crate::response::Response;

/// What happened to one argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Ran { name: &'static str },
    /// No command matched; the listing was printed.
    Unknown { token: String },
}

pub struct Dispatcher {
    registry: Registry,
}

impl Dispatcher {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    /// Dispatcher over the built-in command table.
    pub fn builtin() -> Self {
        Self::new(Registry::discover())
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Run the command named by `args[0]` with the remaining arguments.
    ///
    /// An empty vector runs `help`. Errors from the command are returned
    /// untouched.
    pub fn dispatch(&self, ctx: &mut Context, args: &[String]) -> anyhow::Result<DispatchOutcome> {
        let (token, rest) = match args.split_first() {
            Some((raw, rest)) => (strip_command_prefix(raw), rest),
            None => ("help", &[][..]),
        };

        let Ok(spec) = self.registry.lookup(token) else {
            self.report_unknown(ctx, token);
            return Ok(DispatchOutcome::Unknown {
                token: token.to_string(),
            });
        };

        tracing::debug!(command = spec.name, args = ?rest, "dispatching");
        ctx.catalog = self.registry.catalog();
        (spec.run)(ctx, rest)?;
        Ok(DispatchOutcome::Ran { name: spec.name })
    }

    fn report_unknown(&self, ctx: &mut Context, token: &str) {
        ctx.log.error(format!("Unknown command: {token}"));
        if let Some(suggestion) = self.registry.suggest(token) {
            ctx.log.info(format!("Did you mean '{suggestion}'?"));
        }
        ctx.log
            .info("Available commands (use 'terbin help <command>' for details):");
        for spec in self.registry.all() {
            ctx.log.info(spec.listing_line());
        }
        ctx.log
            .respond(Response::bad_request(format!("Unknown command: {token}")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::command::CommandSpec;
    use crate::log::{Level, Logger, MemorySink, NoPrompt, Record};
    use crate::paths::Paths;
    use std::cell::RefCell;
    use tempfile::TempDir;

    thread_local! {
        static CALLS: RefCell<Vec<(String, Vec<String>)>> = const { RefCell::new(Vec::new()) };
    }

    fn record(name: &str, args: &[String]) {
        CALLS.with(|c| c.borrow_mut().push((name.to_string(), args.to_vec())));
    }

    fn take_calls() -> Vec<(String, Vec<String>)> {
        CALLS.with(|c| c.borrow_mut().drain(..).collect())
    }

    fn help_stub(_: &mut Context, args: &[String]) -> anyhow::Result<()> {
        record("help", args);
        Ok(())
    }

    fn build_stub(_: &mut Context, args: &[String]) -> anyhow::Result<()> {
        record("build", args);
        Ok(())
    }

    fn instances_stub(_: &mut Context, args: &[String]) -> anyhow::Result<()> {
        record("instances", args);
        Ok(())
    }

    fn failing_stub(_: &mut Context, _: &[String]) -> anyhow::Result<()> {
        anyhow::bail!("disk on fire")
    }

    struct Fixture {
        _work: TempDir,
        _home: TempDir,
        sink: MemorySink,
        ctx: Context,
    }

    fn fixture() -> Fixture {
        let work = TempDir::new().expect("temp dir");
        let home = TempDir::new().expect("temp dir");
        let sink = MemorySink::structured();
        let ctx = Context::load(
            Paths::new(work.path(), home.path()),
            Logger::new(Box::new(sink.clone()), Box::new(NoPrompt)),
        );
        take_calls();
        Fixture {
            _work: work,
            _home: home,
            sink,
            ctx,
        }
    }

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn dispatcher(table: &[CommandSpec], aliases: &[(&str, &str)]) -> Dispatcher {
        Dispatcher::new(Registry::from_table(table, aliases))
    }

    fn full() -> Dispatcher {
        dispatcher(
            &[
                CommandSpec::new("help", "Shows help", help_stub),
                CommandSpec::new("Build", "Builds the mod", build_stub),
                CommandSpec::new("instances", "Manage instances", instances_stub),
            ],
            &[("h", "help"), ("i", "instances"), ("ghost", "nowhere")],
        )
    }

    fn info_lines(sink: &MemorySink) -> Vec<String> {
        sink.records()
            .into_iter()
            .filter_map(|r| match r {
                Record::Log(Level::Info, msg) => Some(msg),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_name_match_is_case_insensitive() {
        let mut fx = fixture();
        let d = full();
        for token in ["build", "BUILD", "Build", "--bUILD"] {
            let outcome = d.dispatch(&mut fx.ctx, &args(&[token, "x"])).expect("dispatch");
            assert_eq!(outcome, DispatchOutcome::Ran { name: "Build" });
        }
        assert_eq!(take_calls().len(), 4);
    }

    #[test]
    fn test_alias_dispatches_with_args() {
        let mut fx = fixture();
        let outcome = full()
            .dispatch(&mut fx.ctx, &args(&["-I", "list"]))
            .expect("dispatch");
        assert_eq!(outcome, DispatchOutcome::Ran { name: "instances" });
        assert_eq!(take_calls(), vec![("instances".into(), args(&["list"]))]);
    }

    #[test]
    fn test_dangling_alias_is_unknown() {
        let mut fx = fixture();
        let outcome = full()
            .dispatch(&mut fx.ctx, &args(&["ghost"]))
            .expect("dispatch");
        assert_eq!(
            outcome,
            DispatchOutcome::Unknown {
                token: "ghost".into()
            }
        );
        assert!(fx.sink.contains("[ERR ] Unknown command: ghost"));
        assert!(take_calls().is_empty());
    }

    #[test]
    fn test_help_spellings_are_equivalent() {
        let mut fx = fixture();
        let d = full();
        for token in ["--help", "-help", "help", "-h", "HELP"] {
            d.dispatch(&mut fx.ctx, &args(&[token])).expect("dispatch");
        }
        let calls = take_calls();
        assert_eq!(calls.len(), 5);
        assert!(calls.iter().all(|(name, a)| name == "help" && a.is_empty()));
    }

    #[test]
    fn test_empty_args_run_help() {
        let mut fx = fixture();
        let d = full();
        let empty = d.dispatch(&mut fx.ctx, &[]).expect("dispatch");
        let explicit = d.dispatch(&mut fx.ctx, &args(&["help"])).expect("dispatch");
        assert_eq!(empty, explicit);
        assert_eq!(
            take_calls(),
            vec![("help".into(), vec![]), ("help".into(), vec![])]
        );
    }

    #[test]
    fn test_unknown_never_errors_and_lists_sorted() {
        let mut fx = fixture();
        let outcome = full()
            .dispatch(&mut fx.ctx, &args(&["--deploy", "now"]))
            .expect("unknown is not an error");
        assert_eq!(
            outcome,
            DispatchOutcome::Unknown {
                token: "deploy".into()
            }
        );

        let info = info_lines(&fx.sink);
        let listing: Vec<_> = info
            .iter()
            .skip_while(|l| !l.starts_with("Available commands"))
            .skip(1)
            .cloned()
            .collect();
        assert_eq!(
            listing,
            vec![
                "  Build - Builds the mod",
                "  help - Shows help",
                "  instances - Manage instances",
            ]
        );

        let responses = fx.sink.responses();
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].status.code, 400);
    }

    #[test]
    fn test_short_help_alias_scenario() {
        let mut fx = fixture();
        let d = dispatcher(
            &[CommandSpec::new("help", "Shows help", help_stub)],
            &[("h", "help")],
        );
        d.dispatch(&mut fx.ctx, &args(&["-h"])).expect("dispatch");
        assert_eq!(take_calls(), vec![("help".into(), vec![])]);
    }

    #[test]
    fn test_miss_with_only_help_registered() {
        let mut fx = fixture();
        let d = dispatcher(&[CommandSpec::new("help", "Shows help", help_stub)], &[]);
        d.dispatch(&mut fx.ctx, &args(&["build"])).expect("dispatch");

        let records = fx.sink.records();
        assert_eq!(
            records[0],
            Record::Log(Level::Error, "Unknown command: build".into())
        );
        let info = info_lines(&fx.sink);
        assert_eq!(
            info,
            vec![
                "Available commands (use 'terbin help <command>' for details):",
                "  help - Shows help",
            ]
        );
        assert!(take_calls().is_empty());
    }

    #[test]
    fn test_command_errors_propagate() {
        let mut fx = fixture();
        let d = dispatcher(&[CommandSpec::new("boom", "Fails", failing_stub)], &[]);
        let err = d
            .dispatch(&mut fx.ctx, &args(&["boom"]))
            .expect_err("error propagates");
        assert_eq!(err.to_string(), "disk on fire");
        assert!(fx.sink.responses().is_empty(), "dispatcher does not answer");
    }

    #[test]
    fn test_catalog_is_installed_before_run() {
        let mut fx = fixture();
        full().dispatch(&mut fx.ctx, &args(&["help"])).expect("dispatch");
        let names: Vec<_> = fx.ctx.catalog.iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["Build", "help", "instances"]);
    }
}
