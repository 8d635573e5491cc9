//! Command handlers, one module per command, plus the built-in table.

pub mod bman;
pub mod build;
mod checks;
pub mod completion;
pub mod config;
pub mod generate;
pub mod help;
pub mod inf;
pub mod info;
pub mod instances;
pub mod manifest;
pub mod mods;
pub mod run;
pub mod setup;
pub mod version;

use crate::cli::command::CommandSpec;

/// Every command shipped with terbin.
pub const BUILTIN_COMMANDS: &[CommandSpec] = &[
    CommandSpec::new(
        "help",
        "Shows general help or details for a specific command (help <command>).",
        help::run,
    ),
    CommandSpec::new("info", "Shows terbin's version and workspace status.", info::run),
    CommandSpec::new(
        "config",
        "Configure local terbin options: fpath | show | index-url.",
        config::run,
    ),
    CommandSpec::new(
        "manifest",
        "Creates the project manifest (manifest.json) if there is none.",
        manifest::run,
    ),
    CommandSpec::new(
        "gen",
        "Generates the .csproj for the project and restores it.",
        generate::run,
    ),
    CommandSpec::new(
        "inf",
        "Copies the Farlands game libraries into ./libs.",
        inf::run,
    ),
    CommandSpec::new(
        "bman",
        "Creates the plugin file based on the manifest.",
        bman::run,
    ),
    CommandSpec::new(
        "build",
        "Generates plugin.cs from the manifest and runs 'dotnet build'.",
        build::run,
    ),
    CommandSpec::new(
        "setup",
        "Runs all main steps to prepare the mod.",
        setup::run,
    ),
    CommandSpec::new(
        "version",
        "Shows, lists, or sets the mod version (uses the latest entry in Versions).",
        version::run,
    ),
    CommandSpec::new(
        "instances",
        "Manage game instances: create, list, run, open, delete, add.",
        instances::run,
    ),
    CommandSpec::new(
        "mods",
        "Manage the mods index: list | update | info.",
        mods::run,
    ),
    CommandSpec::new(
        "run",
        "Builds the mod and launches it in a debug instance.",
        run::run,
    ),
    CommandSpec::new(
        "completion",
        "Outputs or installs tab-completion for terbin commands.",
        completion::run,
    ),
];

/// Short aliases installed by `Registry::discover`.
pub const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("i", "instances"),
    ("h", "help"),
    ("v", "version"),
    ("index", "mods"),
];
