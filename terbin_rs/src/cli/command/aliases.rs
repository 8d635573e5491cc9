//! Short names for commands (`i` -> `instances`).

use std::collections::BTreeMap;

/// Case-insensitive alias -> canonical command name.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    map: BTreeMap<String, String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `alias` to `canonical`. Blank input on either side is ignored;
    /// an existing alias is overwritten.
    pub fn add(&mut self, alias: &str, canonical: &str) {
        if alias.trim().is_empty() || canonical.trim().is_empty() {
            return;
        }
        self.map.insert(alias.to_lowercase(), canonical.to_string());
    }

    /// Canonical name for `token`, or `token` itself.
    pub fn resolve<'a>(&'a self, token: &'a str) -> &'a str {
        self.map
            .get(&token.to_lowercase())
            .map(String::as_str)
            .unwrap_or(token)
    }

    /// Aliases pointing at `canonical`, sorted.
    pub fn aliases_of(&self, canonical: &str) -> Vec<String> {
        self.map
            .iter()
            .filter(|(_, target)| target.eq_ignore_ascii_case(canonical))
            .map(|(alias, _)| alias.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
