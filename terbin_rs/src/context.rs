//! Per-turn execution context handed to every command.

use crate::config::Config;
use crate::log::Logger;
use crate::manifest::ProjectManifest;
use crate::net::{Fetcher, HttpFetcher};
use crate::paths::Paths;

/// Registered command as seen by `help` and `completion`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub aliases: Vec<String>,
}

pub struct Context {
    pub paths: Paths,
    /// Global config; `None` when the file exists but could not be read.
    pub config: Option<Config>,
    pub manifest: Option<ProjectManifest>,
    pub manifest_exists: bool,
    pub log: Logger,
    pub fetcher: Box<dyn Fetcher>,
    /// Filled in by the dispatcher before a command runs.
    pub catalog: Vec<CatalogEntry>,
}

impl Context {
    /// Build a context from the files on disk, reporting unreadable ones.
    pub fn load(paths: Paths, log: Logger) -> Self {
        Self::with_fetcher(paths, log, Box::new(HttpFetcher::new()))
    }

    pub fn with_fetcher(paths: Paths, log: Logger, fetcher: Box<dyn Fetcher>) -> Self {
        let mut ctx = Self {
            paths,
            config: None,
            manifest: None,
            manifest_exists: false,
            log,
            fetcher,
            catalog: Vec::new(),
        };
        ctx.reload_manifest();
        ctx.reload_config();
        ctx
    }

    /// Re-read `./manifest.json` (after `manifest` or `version` wrote it).
    pub fn reload_manifest(&mut self) {
        let path = self.paths.manifest_path();
        self.manifest_exists = path.is_file();
        self.manifest = None;
        if !self.manifest_exists {
            return;
        }
        match ProjectManifest::load(&path) {
            Ok(manifest) => self.manifest = Some(manifest),
            Err(e) => self.log.warn(format!("Could not read manifest: {e}")),
        }
    }

    pub fn reload_config(&mut self) {
        let path = self.paths.config_path();
        match Config::load_from_path(&path) {
            Ok(config) => self.config = Some(config),
            Err(e) => {
                self.config = None;
                self.log.warn(format!("Could not read config: {e}"));
            }
        }
    }

    /// Mod index location: config override, else the public index.
    pub fn index_url(&self) -> String {
        self.config
            .as_ref()
            .and_then(|c| c.index_url.clone())
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| crate::index::DEFAULT_INDEX_URL.to_string())
    }
}
