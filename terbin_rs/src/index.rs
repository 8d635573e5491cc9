//! Community mod index.
//!
//! The remote document is a JSON array of references; the cached copy lives
//! in the global config as `{"references": [...]}`.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TerbinError};
use crate::manifest::ProjectManifest;
use crate::net::Fetcher;

pub const DEFAULT_INDEX_URL: &str =
    "https://raw.githubusercontent.com/FarlandsModdingTeam/mods/refs/heads/main/mods.json";

/// One index entry. `url` points at the mod's `manifest.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModReference {
    #[serde(rename = "name", default)]
    pub name: Option<String>,
    #[serde(rename = "guid", default)]
    pub guid: Option<String>,
    #[serde(rename = "url", default)]
    pub url: Option<String>,
}

impl ModReference {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("(unknown)")
    }

    /// True when `key` equals the GUID or the name.
    pub fn matches(&self, key: &str) -> bool {
        self.guid.as_deref() == Some(key) || self.name.as_deref() == Some(key)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModIndex {
    #[serde(default)]
    pub references: Vec<ModReference>,
}

impl ModIndex {
    /// Parse the remote index document.
    pub fn parse(raw: &str) -> serde_json::Result<Self> {
        let references: Vec<ModReference> = serde_json::from_str(raw)?;
        Ok(Self { references })
    }

    pub fn fetch(fetcher: &dyn Fetcher, url: &str) -> Result<Self> {
        let raw = fetcher.fetch_text(url)?;
        Self::parse(&raw).map_err(|e| TerbinError::Http {
            url: url.to_string(),
            reason: format!("invalid mods index: {e}"),
        })
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    /// Exact GUID match first, then exact name match.
    pub fn find(&self, key: &str) -> Option<&ModReference> {
        self.references
            .iter()
            .find(|r| r.guid.as_deref() == Some(key))
            .or_else(|| self.references.iter().find(|r| r.matches(key)))
    }

    /// References sorted case-insensitively by name.
    pub fn sorted(&self) -> Vec<&ModReference> {
        let mut refs: Vec<_> = self.references.iter().collect();
        refs.sort_by_key(|r| r.name.clone().unwrap_or_default().to_lowercase());
        refs
    }
}

/// `<url>/releases/download/v<current>/<Name>.zip` for a published manifest.
pub fn release_archive_url(manifest: &ProjectManifest) -> Option<String> {
    let version = manifest.current_version()?;
    let base = manifest.url.trim().trim_end_matches('/');
    if base.is_empty() || manifest.name.trim().is_empty() {
        return None;
    }
    Some(format!(
        "{base}/releases/download/v{version}/{}.zip",
        manifest.name
    ))
}
