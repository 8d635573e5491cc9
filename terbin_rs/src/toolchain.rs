//! `dotnet` invocations (`restore`, `build`).

use std::path::Path;
use std::process::Command;

use crate::error::{Result, TerbinError};

/// Overrides the `dotnet` executable.
pub const DOTNET_ENV: &str = "TERBIN_DOTNET";

#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Exit code for messages; `signal` when the process was killed.
    pub fn code_label(&self) -> String {
        self.code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "signal".to_string())
    }
}

pub fn dotnet_program() -> String {
    std::env::var(DOTNET_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| "dotnet".to_string())
}

/// Run `dotnet <args>` in `cwd`, capturing both streams.
pub fn run_dotnet(args: &[&str], cwd: &Path) -> Result<ToolOutput> {
    let program = dotnet_program();
    tracing::debug!(program = %program, ?args, cwd = %cwd.display(), "spawning");
    let output = Command::new(&program)
        .args(args)
        .current_dir(cwd)
        .output()
        .map_err(|source| TerbinError::Spawn {
            program: program.clone(),
            source,
        })?;

    Ok(ToolOutput {
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_label() {
        let ok = ToolOutput {
            code: Some(0),
            stdout: String::new(),
            stderr: String::new(),
        };
        assert!(ok.success());
        assert_eq!(ok.code_label(), "0");

        let killed = ToolOutput { code: None, ..ok };
        assert!(!killed.success());
        assert_eq!(killed.code_label(), "signal");
    }
}
