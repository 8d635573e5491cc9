//! ZIP extraction for BepInEx and mod release archives.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use zip::ZipArchive;

use crate::error::{Result, TerbinError};

/// Extract `archive` into `dest`, overwriting existing files.
/// Entries whose names escape `dest` are skipped. Returns the file count.
pub fn extract_zip(archive: &Path, dest: &Path) -> Result<usize> {
    let file = File::open(archive).map_err(|e| TerbinError::io(archive, e))?;
    let mut zip = ZipArchive::new(file)
        .map_err(|e| TerbinError::Archive(format!("{}: {e}", archive.display())))?;
    fs::create_dir_all(dest).map_err(|e| TerbinError::io(dest, e))?;

    let mut extracted = 0;
    for i in 0..zip.len() {
        let mut entry = zip
            .by_index(i)
            .map_err(|e| TerbinError::Archive(e.to_string()))?;
        let Some(relative) = entry.enclosed_name() else {
            tracing::warn!(name = entry.name(), "skipping unsafe archive entry");
            continue;
        };
        let target = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target).map_err(|e| TerbinError::io(&target, e))?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| TerbinError::io(parent, e))?;
        }
        let mut out = File::create(&target).map_err(|e| TerbinError::io(&target, e))?;
        io::copy(&mut entry, &mut out).map_err(|e| TerbinError::io(&target, e))?;
        extracted += 1;
    }
    Ok(extracted)
}

/// Scratch file for a download, removed on drop.
pub struct TempDownload {
    path: std::path::PathBuf,
}

impl TempDownload {
    /// `<tmp>/<stem>_<uuid>.zip`. Characters outside `[A-Za-z0-9_-]` become
    /// `_`; a stem with nothing usable left becomes `mod`.
    pub fn new(stem: &str) -> Self {
        let name = format!("{}_{}.zip", file_stem(stem), uuid::Uuid::new_v4().simple());
        Self {
            path: std::env::temp_dir().join(name),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn file_stem(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.trim_matches('_').is_empty() {
        "mod".to_string()
    } else {
        cleaned
    }
}

impl Drop for TempDownload {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}
