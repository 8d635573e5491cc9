//! Platform helpers for revealing paths and launching game executables.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{Result, TerbinError};

/// What to hand to the platform opener for `target`.
///
/// Files are revealed with their folder where the platform supports it;
/// elsewhere the parent folder is opened.
fn opener_command(target: &Path) -> (String, Vec<String>) {
    let is_file = target.is_file();
    let text = target.to_string_lossy().to_string();

    #[cfg(target_os = "windows")]
    let cmd = if is_file {
        ("explorer.exe".to_string(), vec![format!("/select,{text}")])
    } else {
        ("explorer.exe".to_string(), vec![text])
    };
    #[cfg(target_os = "macos")]
    let cmd = if is_file {
        ("open".to_string(), vec!["-R".to_string(), text])
    } else {
        ("open".to_string(), vec![text])
    };
    #[cfg(all(not(target_os = "macos"), not(target_os = "windows")))]
    let cmd = {
        let folder = if is_file {
            target
                .parent()
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or(text)
        } else {
            text
        };
        ("xdg-open".to_string(), vec![folder])
    };
    cmd
}

/// Reveal `target` in the platform file manager.
pub fn reveal(target: &Path) -> Result<()> {
    let shown = target.to_string_lossy();
    if shown.bytes().any(|b| b < 0x20) {
        return Err(TerbinError::NotFound(format!(
            "refusing to open suspicious path: {}",
            target.display()
        )));
    }
    let (program, args) = opener_command(target);
    tracing::debug!(program = %program, ?args, "revealing path");
    Command::new(&program)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|source| TerbinError::Spawn { program, source })
}

/// Start `exe` detached, with `cwd` as the working directory.
pub fn launch(exe: &Path, cwd: &Path) -> Result<u32> {
    let child = Command::new(exe)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| TerbinError::Spawn {
            program: exe.display().to_string(),
            source,
        })?;
    Ok(child.id())
}

/// `relative` resolved inside `base` unless it is absolute.
pub fn resolve_in(base: &Path, relative: &str) -> PathBuf {
    let candidate = Path::new(relative);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        base.join(candidate)
    }
}
