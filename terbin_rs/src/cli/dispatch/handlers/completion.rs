//! `completion [powershell|bash] [--install]`: tab completion of command names.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;

use super::checks;
use crate::cli::parser::helpers::has_flag;
use crate::context::{CatalogEntry, Context};
use crate::error::{Result, TerbinError};
use crate::response::Response;

pub const BANNER: &str = "# --- Terbin completion (auto-generated) ---";
pub const BANNER_END: &str = "# --- End Terbin completion ---";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    PowerShell,
    Bash,
}

impl Shell {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "powershell" | "pwsh" | "ps" => Some(Shell::PowerShell),
            "bash" => Some(Shell::Bash),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Shell::PowerShell => "powershell",
            Shell::Bash => "bash",
        }
    }

    /// Profile the script is appended to on `--install`.
    pub fn profile_path(self) -> Option<PathBuf> {
        match self {
            Shell::PowerShell => dirs::document_dir().map(|docs| {
                docs.join("WindowsPowerShell")
                    .join("Microsoft.PowerShell_profile.ps1")
            }),
            Shell::Bash => dirs::home_dir().map(|home| home.join(".bashrc")),
        }
    }
}

/// Command names and aliases, sorted, without duplicates.
pub fn completion_words(catalog: &[CatalogEntry]) -> Vec<String> {
    let mut words: Vec<String> = catalog
        .iter()
        .flat_map(|entry| {
            std::iter::once(entry.name.to_string()).chain(entry.aliases.iter().cloned())
        })
        .collect();
    words.sort_by_key(|w| w.to_lowercase());
    words.dedup_by(|a, b| a.eq_ignore_ascii_case(b));
    words
}

pub fn script(shell: Shell, words: &[String]) -> String {
    match shell {
        Shell::PowerShell => {
            let list = words
                .iter()
                .map(|w| format!("'{w}'"))
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "# Terbin PowerShell completion\n\
                 $scriptBlock = {{\n\
                 \x20   param($wordToComplete, $commandAst, $cursorPosition)\n\
                 \x20   $cmds = @({list})\n\
                 \x20   if ($commandAst.CommandElements.Count -gt 2) {{ return }}\n\
                 \x20   $cmds | Where-Object {{ $_ -like \"$wordToComplete*\" }} | ForEach-Object {{\n\
                 \x20       [System.Management.Automation.CompletionResult]::new($_, $_, 'ParameterValue', $_)\n\
                 \x20   }}\n\
                 }}\n\
                 Register-ArgumentCompleter -Native -CommandName terbin -ScriptBlock $scriptBlock\n\
                 Register-ArgumentCompleter -Native -CommandName terbin.exe -ScriptBlock $scriptBlock\n"
            )
        }
        Shell::Bash => format!(
            "# Terbin bash completion\n\
             _terbin_complete() {{\n\
             \x20   [ \"$COMP_CWORD\" -eq 1 ] || return 0\n\
             \x20   COMPREPLY=( $(compgen -W \"{}\" -- \"${{COMP_WORDS[1]}}\") )\n\
             }}\n\
             complete -F _terbin_complete terbin\n",
            words.join(" ")
        ),
    }
}

/// Append `script` to `profile` between the banners.
/// `Ok(false)` when the banner is already there.
pub fn install_into(profile: &Path, script: &str) -> Result<bool> {
    let existing = if profile.exists() {
        fs::read_to_string(profile).map_err(|e| TerbinError::io(profile, e))?
    } else {
        String::new()
    };
    if existing.contains(BANNER) {
        return Ok(false);
    }
    if let Some(parent) = profile.parent() {
        fs::create_dir_all(parent).map_err(|e| TerbinError::io(parent, e))?;
    }

    let mut content = existing;
    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    content.push_str(BANNER);
    content.push('\n');
    content.push_str(script);
    content.push_str(BANNER_END);
    content.push('\n');
    fs::write(profile, content).map_err(|e| TerbinError::io(profile, e))?;
    Ok(true)
}

pub fn run(ctx: &mut Context, args: &[String]) -> anyhow::Result<()> {
    let install = has_flag(args, &["--install", "-i"]);
    let shell = match args.iter().find(|a| !a.starts_with('-')) {
        Some(name) => match Shell::parse(name) {
            Some(shell) => shell,
            None => {
                checks::reject_usage(
                    &mut ctx.log,
                    "completion",
                    format!("Unsupported shell: {name}"),
                );
                return Ok(());
            }
        },
        None => Shell::PowerShell,
    };

    ctx.log.info("Completion setup");
    let text = script(shell, &completion_words(&ctx.catalog));

    if !install {
        ctx.log.info(format!(
            "Add the following to your {} session to enable completion:",
            shell.label()
        ));
        ctx.log.boxed("Script", text.lines());
        ctx.log.info(format!(
            "Or run: terbin completion {} --install to add it to your profile.",
            shell.label()
        ));
        ctx.log.respond(Response::ok_with(
            json!({ "Shell": shell.label(), "Script": text }),
        ));
        return Ok(());
    }

    let Some(profile) = shell.profile_path() else {
        ctx.log
            .reject("Could not locate your profile folder. Copy the script manually.");
        return Ok(());
    };
    match install_into(&profile, &text) {
        Ok(true) => {
            ctx.log.success(format!(
                "Completion installed to: {}",
                profile.display()
            ));
            ctx.log
                .info("Restart your shell (or reload your profile) to activate.");
        }
        Ok(false) => {
            ctx.log.info("Completion already present in your profile.");
            ctx.log.info(format!("Profile: {}", profile.display()));
        }
        Err(e) => {
            ctx.log.fail(format!("Failed to install completion: {e}"));
            return Ok(());
        }
    }
    ctx.log.respond(Response::ok_with(json!({
        "Shell": shell.label(),
        "Profile": profile.to_string_lossy(),
    })));
    Ok(())
}
