//! Project and instance manifests.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::fs_utils;

/// Dependency every new project starts with (the Farlands modding core).
pub const DEFAULT_DEPENDENCY: &str = "fm.fcm";

/// Version written into a fresh instance manifest.
pub const INSTANCE_MANIFEST_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ManifestType {
    #[default]
    #[serde(rename = "NORMAL")]
    Normal,
    /// Project without the default dependency (`setup empty`, `manifest -x`).
    #[serde(rename = "EMPTY")]
    Empty,
}

impl fmt::Display for ManifestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestType::Normal => f.write_str("NORMAL"),
            ManifestType::Empty => f.write_str("EMPTY"),
        }
    }
}

/// `./manifest.json` describing the mod being developed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectManifest {
    #[serde(skip)]
    path: PathBuf,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Type")]
    pub kind: ManifestType,
    #[serde(rename = "GUID")]
    pub guid: String,
    /// Release history, oldest first; the last entry is the current version.
    #[serde(rename = "Versions")]
    pub versions: Vec<String>,
    /// Repository URL; release archives are fetched relative to it.
    #[serde(rename = "url")]
    pub url: String,
    #[serde(rename = "Dependencies")]
    pub dependencies: Vec<String>,
}

impl ProjectManifest {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let mut manifest: ProjectManifest = fs_utils::read_json(path)?;
        manifest.path = path.to_path_buf();
        Ok(manifest)
    }

    /// Parse a manifest fetched from a remote repository.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self) -> Result<()> {
        fs_utils::write_json(&self.path, self)
    }

    pub fn current_version(&self) -> Option<&str> {
        self.versions.last().map(String::as_str)
    }

    pub fn push_version(&mut self, version: impl Into<String>) -> Result<()> {
        self.versions.push(version.into());
        self.save()
    }

    pub fn pop_version(&mut self) -> Result<Option<String>> {
        let removed = self.versions.pop();
        if removed.is_some() {
            self.save()?;
        }
        Ok(removed)
    }

    pub fn csproj_name(&self) -> String {
        format!("{}.csproj", self.name)
    }
}

/// `<instance>/manifest.json`: what an instance is and which mods it carries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceManifest {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Version")]
    pub version: String,
    /// Installed mod GUIDs.
    #[serde(rename = "Mods")]
    pub mods: Vec<String>,
}

impl InstanceManifest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: INSTANCE_MANIFEST_VERSION.to_string(),
            mods: Vec::new(),
        }
    }

    pub fn path_in(instance_root: &Path) -> PathBuf {
        instance_root.join(crate::paths::MANIFEST_FILE)
    }

    /// Load the instance manifest, or a fresh one named after the folder.
    pub fn load_or_new(instance_root: &Path, name: &str) -> Result<Self> {
        let path = Self::path_in(instance_root);
        if path.exists() {
            fs_utils::read_json(&path)
        } else {
            Ok(Self::new(name))
        }
    }

    pub fn save_in(&self, instance_root: &Path) -> Result<()> {
        fs_utils::write_json(&Self::path_in(instance_root), self)
    }

    pub fn has_mod(&self, guid: &str) -> bool {
        self.mods.iter().any(|m| m.eq_ignore_ascii_case(guid))
    }
}
