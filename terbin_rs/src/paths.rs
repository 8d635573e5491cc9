//! Well-known file locations.
//!
//! The project manifest lives in the working directory; the global config
//! lives under the terbin home (`$TERBIN_HOME`, else `~/.terbin`).

use std::path::{Path, PathBuf};

/// Environment variable overriding the terbin home directory.
pub const HOME_ENV: &str = "TERBIN_HOME";

pub const MANIFEST_FILE: &str = "manifest.json";
pub const CONFIG_FILE: &str = "config.json";

/// Resolved locations for one turn.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Directory the command operates on (normally the process cwd).
    pub work_dir: PathBuf,
    /// Directory holding the global config.
    pub home_dir: PathBuf,
}

impl Paths {
    pub fn new(work_dir: impl Into<PathBuf>, home_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            home_dir: home_dir.into(),
        }
    }

    /// Resolve from the process environment.
    pub fn discover() -> Self {
        let work_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::new(work_dir, terbin_home())
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.work_dir.join(MANIFEST_FILE)
    }

    pub fn config_path(&self) -> PathBuf {
        self.home_dir.join(CONFIG_FILE)
    }

    /// Resolve `path` against the working directory unless it is absolute.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.work_dir.join(path)
        }
    }
}

/// `$TERBIN_HOME` when set and non-empty, else `~/.terbin`.
pub fn terbin_home() -> PathBuf {
    if let Some(dir) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".terbin")
}
