//! Command registry: descriptors keyed by case-insensitive name, plus aliases.

use std::collections::BTreeMap;

use thiserror::Error;

use super::aliases::AliasTable;
use super::types::CommandSpec;
use crate::cli::dispatch::handlers::{BUILTIN_COMMANDS, DEFAULT_ALIASES};
use crate::cli::parser::helpers::suggest_similar;
use crate::context::CatalogEntry;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("command name is empty")]
    EmptyName,
    #[error("command name '{0}' contains whitespace")]
    WhitespaceInName(String),
    #[error("unknown command: {0}")]
    NotFound(String),
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    commands: BTreeMap<String, CommandSpec>,
    aliases: AliasTable,
}

impl Registry {
    /// Empty registry, no aliases.
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in commands and the default aliases.
    pub fn discover() -> Self {
        Self::from_table(BUILTIN_COMMANDS, DEFAULT_ALIASES)
    }

    /// Build from a declared table; malformed entries are skipped.
    pub fn from_table(table: &[CommandSpec], aliases: &[(&str, &str)]) -> Self {
        let mut registry = Self::new();
        for spec in table {
            if let Err(e) = registry.register(*spec) {
                tracing::debug!(error = %e, "skipping command candidate");
            }
        }
        for (alias, canonical) in aliases {
            registry.add_alias(alias, canonical);
        }
        registry
    }

    /// Add a command; a same-named (case-insensitive) entry is replaced.
    pub fn register(&mut self, spec: CommandSpec) -> Result<(), RegistryError> {
        if spec.name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if spec.name.chars().any(char::is_whitespace) {
            return Err(RegistryError::WhitespaceInName(spec.name.to_string()));
        }
        if let Some(previous) = self.commands.insert(spec.name.to_lowercase(), spec) {
            tracing::debug!(name = previous.name, "command replaced");
        }
        Ok(())
    }

    pub fn add_alias(&mut self, alias: &str, canonical: &str) {
        self.aliases.add(alias, canonical);
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Resolve an alias, then match the name case-insensitively.
    pub fn lookup(&self, token: &str) -> Result<&CommandSpec, RegistryError> {
        let canonical = self.aliases.resolve(token);
        self.commands
            .get(&canonical.to_lowercase())
            .ok_or_else(|| RegistryError::NotFound(token.to_string()))
    }

    /// All commands, sorted case-insensitively by name.
    pub fn all(&self) -> Vec<&CommandSpec> {
        self.commands.values().collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Closest command name or alias within edit distance 2.
    pub fn suggest(&self, token: &str) -> Option<String> {
        let mut candidates: Vec<String> = self
            .commands
            .values()
            .map(|c| c.name.to_string())
            .collect();
        for spec in self.commands.values() {
            candidates.extend(self.aliases.aliases_of(spec.name));
        }
        suggest_similar(token, &candidates).map(|s| self.aliases.resolve(s).to_string())
    }

    /// Snapshot for `help` and `completion`.
    pub fn catalog(&self) -> Vec<CatalogEntry> {
        self.commands
            .values()
            .map(|spec| CatalogEntry {
                name: spec.name,
                description: spec.description,
                aliases: self.aliases.aliases_of(spec.name),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;

    fn noop(_: &mut Context, _: &[String]) -> anyhow::Result<()> {
        Ok(())
    }

    fn spec(name: &'static str) -> CommandSpec {
        CommandSpec::new(name, "test command", noop)
    }

    #[test]
    fn test_lookup_case_insensitive() {
        let mut registry = Registry::new();
        registry.register(spec("Build")).expect("register");
        for token in ["build", "BUILD", "bUiLd"] {
            assert_eq!(registry.lookup(token).expect("found").name, "Build");
        }
    }

    #[test]
    fn test_alias_then_name() {
        let mut registry = Registry::new();
        registry.register(spec("instances")).expect("register");
        registry.add_alias("i", "instances");
        registry.add_alias("ghost", "missing");
        assert_eq!(registry.lookup("I").expect("alias").name, "instances");
        assert_eq!(
            registry.lookup("ghost").expect_err("dangling alias"),
            RegistryError::NotFound("ghost".into())
        );
    }

    #[test]
    fn test_register_rejects_malformed_names() {
        let mut registry = Registry::new();
        assert_eq!(registry.register(spec("")), Err(RegistryError::EmptyName));
        assert_eq!(
            registry.register(spec("two words")),
            Err(RegistryError::WhitespaceInName("two words".into()))
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = Registry::new();
        registry.register(spec("help")).expect("register");
        registry
            .register(CommandSpec::new("HELP", "second", noop))
            .expect("register");
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("help").expect("found").description, "second");
    }

    #[test]
    fn test_from_table_skips_bad_entries() {
        let table = [spec("ok"), spec("not ok"), spec("")];
        let registry = Registry::from_table(&table, &[("o", "ok")]);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("o").expect("alias").name, "ok");
    }

    #[test]
    fn test_all_sorted_case_insensitively() {
        let table = [spec("mods"), spec("Build"), spec("help"), spec("bman")];
        let registry = Registry::from_table(&table, &[]);
        let names: Vec<_> = registry.all().iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["bman", "Build", "help", "mods"]);
    }

    #[test]
    fn test_discover_builtins() {
        let registry = Registry::discover();
        for name in [
            "help", "info", "config", "manifest", "gen", "inf", "bman", "build", "setup",
            "version", "instances", "mods", "run", "completion",
        ] {
            assert!(registry.lookup(name).is_ok(), "missing {name}");
        }
        assert_eq!(registry.lookup("i").expect("alias").name, "instances");
        assert_eq!(registry.lookup("h").expect("alias").name, "help");
        assert_eq!(registry.lookup("v").expect("alias").name, "version");
        assert_eq!(registry.lookup("index").expect("alias").name, "mods");
    }

    #[test]
    fn test_suggest() {
        let registry = Registry::discover();
        assert_eq!(registry.suggest("biuld").as_deref(), Some("build"));
        assert_eq!(registry.suggest("instnces").as_deref(), Some("instances"));
        assert!(registry.suggest("zzzzzzzz").is_none());
    }

    #[test]
    fn test_catalog_carries_aliases() {
        let registry = Registry::discover();
        let catalog = registry.catalog();
        let help = catalog.iter().find(|e| e.name == "help").expect("help");
        assert_eq!(help.aliases, vec!["h"]);
    }
}
