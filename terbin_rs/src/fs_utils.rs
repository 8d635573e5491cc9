//! Filesystem helpers shared by commands: JSON files, path comparison and
//! directory copies with progress.

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use walkdir::WalkDir;

use crate::error::{Result, TerbinError};
use crate::progress;

/// Read and deserialize a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| TerbinError::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| TerbinError::json(path, e))
}

/// Serialize as indented JSON, creating the parent directory first.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| TerbinError::io(parent, e))?;
    }
    let json = serde_json::to_string_pretty(value).map_err(|e| TerbinError::json(path, e))?;
    fs::write(path, json).map_err(|e| TerbinError::io(path, e))
}

/// Absolute, lexically cleaned path. The path does not need to exist.
pub fn normalize(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Path equality, ignoring ASCII case on Windows.
pub fn same_path(a: &Path, b: &Path) -> bool {
    if cfg!(windows) {
        a.to_string_lossy()
            .eq_ignore_ascii_case(&b.to_string_lossy())
    } else {
        a == b
    }
}

/// True when `child` is `parent` itself or lies below it.
pub fn is_within(child: &Path, parent: &Path) -> bool {
    let child = normalize(child);
    let parent = normalize(parent);
    let mut ancestor = Some(child.as_path());
    while let Some(dir) = ancestor {
        if same_path(dir, &parent) {
            return true;
        }
        ancestor = dir.parent();
    }
    false
}

/// True if `dir` exists and holds at least one entry.
pub fn has_entries(dir: &Path) -> bool {
    fs::read_dir(dir)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}

/// Recursively copy `src` into `dst`, overwriting files, with a progress bar.
/// Returns the number of files copied.
pub fn copy_dir_with_progress(src: &Path, dst: &Path) -> Result<usize> {
    let files: Vec<_> = WalkDir::new(src)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .collect();

    fs::create_dir_all(dst).map_err(|e| TerbinError::io(dst, e))?;
    let bar = progress::count_bar(files.len() as u64, "Cloning");

    for entry in WalkDir::new(src).into_iter().filter_map(|e| e.ok()) {
        if entry.file_type().is_dir() {
            let rel = entry.path().strip_prefix(src).unwrap_or(entry.path());
            let target = dst.join(rel);
            fs::create_dir_all(&target).map_err(|e| TerbinError::io(&target, e))?;
        }
    }

    for entry in &files {
        let rel = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dst.join(rel);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| TerbinError::io(parent, e))?;
        }
        fs::copy(entry.path(), &target).map_err(|e| TerbinError::io(entry.path(), e))?;
        bar.set_message(rel.display().to_string());
        bar.inc(1);
    }
    bar.finish_and_clear();
    Ok(files.len())
}

/// Framework assemblies (`System.*`, `mscorlib.*`).
fn is_framework_assembly(file_name: &str) -> bool {
    let lower = file_name.to_ascii_lowercase();
    lower.starts_with("system.") || lower.starts_with("mscorlib.")
}

/// Copy the game's managed DLLs (top level of `managed`) into `libs`.
/// Returns the copied file names, sorted.
pub fn copy_managed_libs(managed: &Path, libs: &Path) -> Result<Vec<String>> {
    fs::create_dir_all(libs).map_err(|e| TerbinError::io(libs, e))?;
    let mut copied = Vec::new();
    for entry in WalkDir::new(managed)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let name = entry.file_name().to_string_lossy().to_string();
        let is_dll = entry.file_type().is_file()
            && Path::new(&name)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("dll"));
        if !is_dll || is_framework_assembly(&name) {
            continue;
        }
        let target = libs.join(&name);
        fs::copy(entry.path(), &target).map_err(|e| TerbinError::io(entry.path(), e))?;
        copied.push(name);
    }
    copied.sort();
    Ok(copied)
}

/// Move every `*.dll` at the top level of `from` into `to` (replacing).
/// Returns the number of files moved.
pub fn move_dlls(from: &Path, to: &Path) -> Result<usize> {
    fs::create_dir_all(to).map_err(|e| TerbinError::io(to, e))?;
    let mut moved = 0;
    let entries = fs::read_dir(from).map_err(|e| TerbinError::io(from, e))?;
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if !path.is_file()
            || !path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("dll"))
        {
            continue;
        }
        let target = to.join(entry.file_name());
        if target.exists() {
            fs::remove_file(&target).map_err(|e| TerbinError::io(&target, e))?;
        }
        if fs::rename(&path, &target).is_err() {
            // Cross-device: fall back to copy + delete.
            fs::copy(&path, &target).map_err(|e| TerbinError::io(&path, e))?;
            fs::remove_file(&path).map_err(|e| TerbinError::io(&path, e))?;
        }
        moved += 1;
    }
    Ok(moved)
}
