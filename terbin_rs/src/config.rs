//! Global configuration (`<terbin home>/config.json`).
//!
//! Holds the Farlands install path, the registered instances and the cached
//! mod index. Every mutator persists the file immediately.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TerbinError};
use crate::fs_utils;
use crate::index::ModIndex;

/// Root configuration structure
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip)]
    path: PathBuf,
    /// Game install used as the clone source for instances and for `inf`.
    #[serde(rename = "FarlandsPath", skip_serializing_if = "Option::is_none")]
    pub farlands_path: Option<String>,
    /// Instance name -> instance root.
    #[serde(rename = "Instances")]
    instances: BTreeMap<String, String>,
    /// Override for the mod index location.
    #[serde(rename = "IndexUrl", skip_serializing_if = "Option::is_none")]
    pub index_url: Option<String>,
    /// Cached mod index, refreshed by `mods update`.
    #[serde(rename = "Index", skip_serializing_if = "Option::is_none")]
    pub index: Option<ModIndex>,
}

impl Config {
    /// Empty config bound to `path`; nothing is written until a mutator runs.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Load config from a specific path.
    /// Returns an empty config if the file doesn't exist.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::empty(path));
        }
        let content = fs::read_to_string(path).map_err(|e| TerbinError::io(path, e))?;
        if content.trim().is_empty() {
            return Ok(Self::empty(path));
        }
        let mut config: Config =
            serde_json::from_str(&content).map_err(|e| TerbinError::json(path, e))?;
        config.path = path.to_path_buf();
        Ok(config)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the config as indented JSON, creating the parent directory.
    pub fn save(&self) -> Result<()> {
        fs_utils::write_json(&self.path, self)
    }

    pub fn set_farlands_path(&mut self, value: impl Into<String>) -> Result<()> {
        self.farlands_path = Some(value.into());
        self.save()
    }

    /// Configured Farlands path, ignoring blank values.
    pub fn farlands_path(&self) -> Option<&str> {
        self.farlands_path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
    }

    pub fn set_index_url(&mut self, value: Option<String>) -> Result<()> {
        self.index_url = value;
        self.save()
    }

    pub fn set_index(&mut self, index: ModIndex) -> Result<()> {
        self.index = Some(index);
        self.save()
    }

    pub fn instances(&self) -> &BTreeMap<String, String> {
        &self.instances
    }

    pub fn instance(&self, name: &str) -> Option<&str> {
        self.instances.get(name).map(String::as_str)
    }

    pub fn has_instance(&self, name: &str) -> bool {
        self.instances.contains_key(name)
    }

    /// True if any registered instance resolves to `path`.
    pub fn has_instance_at(&self, path: &Path) -> bool {
        let wanted = fs_utils::normalize(path);
        self.instances
            .values()
            .any(|p| fs_utils::same_path(&fs_utils::normalize(Path::new(p)), &wanted))
    }

    /// Register (or re-point) an instance and persist.
    pub fn add_instance(&mut self, name: impl Into<String>, path: impl Into<String>) -> Result<()> {
        self.instances.insert(name.into(), path.into());
        self.save()
    }

    /// Unregister an instance and persist. Files are left untouched.
    pub fn remove_instance(&mut self, name: &str) -> Result<Option<String>> {
        let removed = self.instances.remove(name);
        if removed.is_some() {
            self.save()?;
        }
        Ok(removed)
    }
}
