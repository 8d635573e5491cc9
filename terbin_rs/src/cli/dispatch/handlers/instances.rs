//! `instances create | list | run | open | delete | add`
//!
//! An instance is a copy of the game folder with BepInEx installed, tracked
//! by name in the global config and described by its own `manifest.json`.

use std::path::{Path, PathBuf};

use serde_json::json;

use super::{checks, mods};
use crate::archive::{self, TempDownload};
use crate::cli::parser::helpers::has_flag;
use crate::context::Context;
use crate::fs_utils;
use crate::index;
use crate::manifest::{InstanceManifest, ProjectManifest};
use crate::opener;
use crate::response::Response;

pub const BEPINEX_URL: &str = "https://github.com/BepInEx/BepInEx/releases/download/v5.4.23.3/BepInEx_win_x64_5.4.23.3.zip";

pub const DEFAULT_EXE: &str = "Farlands.exe";

const YES_FLAGS: &[&str] = &["-y", "--yes"];

/// Any of the files BepInEx drops into the game root.
pub fn bepinex_installed(root: &Path) -> bool {
    root.join("BepInEx").is_dir()
        || root.join("doorstop_config.ini").is_file()
        || root.join("winhttp.dll").is_file()
}

pub fn run(ctx: &mut Context, args: &[String]) -> anyhow::Result<()> {
    let Some(sub) = args.first().map(|s| s.trim().to_lowercase()) else {
        checks::reject_usage(&mut ctx.log, "instances", "No instances operation given.");
        return Ok(());
    };
    let rest = &args[1..];

    match sub.as_str() {
        "create" => match (rest.first(), rest.get(1)) {
            (Some(name), Some(path)) => {
                create(ctx, name, path);
            }
            _ => checks::reject_usage(
                &mut ctx.log,
                "instances",
                "'create' needs an instance name and a path.",
            ),
        },
        "list" => list(ctx),
        "run" => match rest.first() {
            Some(name) => {
                launch(ctx, name, rest.get(1).map(String::as_str));
            }
            None => checks::reject_usage(&mut ctx.log, "instances", "Missing instance name."),
        },
        "open" => match rest.first() {
            Some(name) => open(ctx, name, rest.get(1).map(String::as_str)),
            None => checks::reject_usage(&mut ctx.log, "instances", "Missing instance name."),
        },
        "delete" => {
            let yes = has_flag(rest, YES_FLAGS);
            match rest.iter().find(|a| !a.starts_with('-')) {
                Some(name) => delete(ctx, name, yes),
                None => {
                    checks::reject_usage(&mut ctx.log, "instances", "Missing instance name.")
                }
            }
        }
        "add" => match (rest.first(), rest.get(1)) {
            (Some(instance), Some(key)) => add_mod(ctx, instance, key),
            _ => checks::reject_usage(
                &mut ctx.log,
                "instances",
                "'add' needs an instance name and a mod GUID or name.",
            ),
        },
        other => checks::reject_usage(
            &mut ctx.log,
            "instances",
            format!("Unknown instances operation: {other}"),
        ),
    }
    Ok(())
}

/// Registered folder of `name`, rejecting the turn when unknown.
fn instance_root(ctx: &mut Context, name: &str) -> Option<PathBuf> {
    let Some(config) = ctx.config.as_ref() else {
        ctx.log.reject(checks::CONFIG_NOT_LOADED);
        return None;
    };
    match config.instance(name) {
        Some(path) => Some(PathBuf::from(path)),
        None => {
            ctx.log.reject(format!("Instance not found: {name}"));
            None
        }
    }
}

/// Clone the game into `path`, install BepInEx and register it as `name`.
pub(super) fn create(ctx: &mut Context, name: &str, path: &str) -> bool {
    if !checks::is_token(name) {
        ctx.log
            .reject("Invalid instance name. It cannot be empty or contain spaces.");
        return false;
    }
    let Some(config) = ctx.config.as_ref() else {
        ctx.log.reject(checks::CONFIG_NOT_LOADED);
        return false;
    };
    let Some(farlands) = config.farlands_path() else {
        ctx.log.reject(checks::NO_FARLANDS_PATH);
        return false;
    };
    let source = fs_utils::normalize(Path::new(farlands));
    if !source.is_dir() {
        ctx.log.reject(format!(
            "Farlands folder does not exist: {}",
            source.display()
        ));
        return false;
    }

    let dest = fs_utils::normalize(&ctx.paths.resolve(path));
    if fs_utils::same_path(&dest, &source) || fs_utils::is_within(&dest, &source) {
        ctx.log.reject(
            "The instance folder must be different from the Farlands folder and not inside it.",
        );
        return false;
    }

    let taken_by = config
        .instances()
        .iter()
        .find(|(other, p)| {
            other.as_str() != name
                && fs_utils::same_path(&fs_utils::normalize(Path::new(p.as_str())), &dest)
        })
        .map(|(other, _)| other.clone());
    if let Some(other) = taken_by {
        ctx.log.reject(format!(
            "Instance '{other}' is already registered at: {}",
            dest.display()
        ));
        return false;
    }
    if config.has_instance(name) {
        ctx.log
            .warn(format!("Instance '{name}' already exists. Updating path."));
    }

    if dest.join(crate::paths::MANIFEST_FILE).exists() {
        ctx.log.reject(format!(
            "Destination already contains a manifest.json: {}",
            dest.display()
        ));
        return false;
    }
    if fs_utils::has_entries(&dest)
        && !ctx.log.confirm(
            &format!(
                "Destination '{}' is not empty. Merge the game files into it?",
                dest.display()
            ),
            true,
        )
    {
        ctx.log.reject("Instance creation cancelled.");
        return false;
    }

    ctx.log.section(&format!("Creating instance '{name}'"));
    ctx.log.info(format!(
        "Cloning {} -> {}",
        source.display(),
        dest.display()
    ));
    match fs_utils::copy_dir_with_progress(&source, &dest) {
        Ok(count) => ctx.log.info(format!("Copied {count} files.")),
        Err(e) => {
            ctx.log.fail(format!("Failed to clone the game folder: {e}"));
            return false;
        }
    }

    if let Err(e) = install_bepinex(ctx, &dest) {
        ctx.log.error(format!("Failed to install BepInEx: {e}"));
    }

    let dest_text = dest.to_string_lossy().to_string();
    if let Some(config) = ctx.config.as_mut()
        && let Err(e) = config.add_instance(name, dest_text.clone())
    {
        ctx.log.fail(format!("Failed to save config: {e}"));
        return false;
    }
    if let Err(e) = InstanceManifest::new(name).save_in(&dest) {
        ctx.log
            .warn(format!("Could not write the instance manifest: {e}"));
    }

    ctx.log
        .success(format!("Instance '{name}' created at: {dest_text}"));
    ctx.log
        .respond(Response::ok_with(json!({ "Name": name, "Path": dest_text })));
    true
}

fn install_bepinex(ctx: &mut Context, root: &Path) -> crate::error::Result<()> {
    if bepinex_installed(root)
        && !ctx
            .log
            .confirm("BepInEx seems to be installed already. Reinstall it?", true)
    {
        ctx.log.info("Keeping the existing BepInEx install.");
        return Ok(());
    }
    ctx.log.info("Installing BepInEx 5.4.23.3...");
    let download = TempDownload::new("BepInEx");
    ctx.fetcher.download(BEPINEX_URL, download.path())?;
    let files = archive::extract_zip(download.path(), root)?;
    ctx.log
        .success(format!("BepInEx installed ({files} files)."));
    Ok(())
}

fn list(ctx: &mut Context) {
    let Some(config) = ctx.config.as_ref() else {
        ctx.log.reject(checks::CONFIG_NOT_LOADED);
        return;
    };
    let instances = config.instances().clone();
    if instances.is_empty() {
        ctx.log.info(
            "No instances registered. Create one with 'terbin instances create <name> <path>'.",
        );
    } else {
        let mut rows: Vec<_> = instances.iter().collect();
        rows.sort_by_key(|(name, _)| name.to_lowercase());
        ctx.log.boxed(
            "Instances",
            rows.iter().map(|(name, path)| format!("- {name}: {path}")),
        );
    }
    ctx.log.respond(Response::ok_with(json!(instances)));
}

/// Start the game of instance `name`. `exe` defaults to `Farlands.exe`.
pub(super) fn launch(ctx: &mut Context, name: &str, exe: Option<&str>) -> bool {
    let Some(root) = instance_root(ctx, name) else {
        return false;
    };
    let exe_path = opener::resolve_in(&root, exe.unwrap_or(DEFAULT_EXE));
    if !exe_path.is_file() {
        ctx.log
            .reject(format!("Executable not found: {}", exe_path.display()));
        return false;
    }
    match opener::launch(&exe_path, &root) {
        Ok(pid) => {
            ctx.log.success(format!(
                "Launched {} (pid {pid}).",
                exe_path.display()
            ));
            ctx.log
                .respond(Response::ok_with(json!({ "Name": name, "Pid": pid })));
            true
        }
        Err(e) => {
            ctx.log.fail(format!("Failed to launch the game: {e}"));
            false
        }
    }
}

fn open(ctx: &mut Context, name: &str, subpath: Option<&str>) {
    let Some(root) = instance_root(ctx, name) else {
        return;
    };
    let target = match subpath {
        Some(sub) => opener::resolve_in(&root, sub),
        None => root,
    };
    if !target.exists() {
        ctx.log
            .reject(format!("Path not found: {}", target.display()));
        return;
    }
    match opener::reveal(&target) {
        Ok(()) => {
            ctx.log.success(format!("Opened: {}", target.display()));
            ctx.log.respond(Response::ok());
        }
        Err(e) => ctx.log.fail(format!("Failed to open the folder: {e}")),
    }
}

fn delete(ctx: &mut Context, name: &str, yes: bool) {
    let Some(root) = instance_root(ctx, name) else {
        return;
    };
    if !yes
        && !ctx.log.confirm(
            &format!("Remove instance '{name}' from the config? Files are kept."),
            false,
        )
    {
        ctx.log.reject("Deletion cancelled.");
        return;
    }
    let Some(config) = ctx.config.as_mut() else {
        return;
    };
    match config.remove_instance(name) {
        Ok(_) => {
            ctx.log.success(format!(
                "Instance '{name}' removed. Files were kept at: {}",
                root.display()
            ));
            ctx.log
                .respond(Response::ok_with(json!({ "Deleted": name })));
        }
        Err(e) => ctx.log.fail(format!("Failed to save config: {e}")),
    }
}

fn add_mod(ctx: &mut Context, instance: &str, key: &str) {
    let Some(root) = instance_root(ctx, instance) else {
        return;
    };
    if !root.is_dir() {
        ctx.log.reject(format!(
            "Instance folder does not exist: {}",
            root.display()
        ));
        return;
    }
    let Some(mod_index) = mods::load_index(ctx, false) else {
        return;
    };
    let Some(reference) = mod_index.find(key).cloned() else {
        ctx.log.reject(format!("Mod not found in index: {key}"));
        return;
    };

    let mut installed = match InstanceManifest::load_or_new(&root, instance) {
        Ok(manifest) => manifest,
        Err(e) => {
            ctx.log
                .fail(format!("Could not read the instance manifest: {e}"));
            return;
        }
    };
    let guid = reference
        .guid
        .clone()
        .unwrap_or_else(|| reference.display_name().to_string());
    if installed.has_mod(&guid) {
        ctx.log.reject(format!(
            "Mod '{guid}' is already installed in instance '{instance}'."
        ));
        return;
    }
    let Some(manifest_url) = reference.url.as_deref() else {
        ctx.log
            .reject(format!("Mod '{guid}' has no manifest URL in the index."));
        return;
    };

    ctx.log.info(format!("Fetching mod manifest: {manifest_url}"));
    let published = match ctx
        .fetcher
        .fetch_text(manifest_url)
        .map_err(|e| e.to_string())
        .and_then(|raw| ProjectManifest::from_json(&raw).map_err(|e| e.to_string()))
    {
        Ok(manifest) => manifest,
        Err(e) => {
            ctx.log.fail(format!("Failed to read the mod manifest: {e}"));
            return;
        }
    };
    let Some(archive_url) = index::release_archive_url(&published) else {
        ctx.log.reject(format!(
            "Mod manifest of '{guid}' has no version or repository url."
        ));
        return;
    };

    ctx.log.info(format!("Downloading: {archive_url}"));
    let download = TempDownload::new(&published.name);
    let plugins_root = root.join("BepInEx");
    let extracted = ctx
        .fetcher
        .download(&archive_url, download.path())
        .and_then(|_| archive::extract_zip(download.path(), &plugins_root));
    let files = match extracted {
        Ok(files) => files,
        Err(e) => {
            ctx.log.fail(format!("Failed to install mod '{guid}': {e}"));
            return;
        }
    };

    installed.mods.push(guid.clone());
    if let Err(e) = installed.save_in(&root) {
        ctx.log
            .fail(format!("Failed to update the instance manifest: {e}"));
        return;
    }
    ctx.log.success(format!(
        "Installed {} {} into instance '{instance}' ({files} files).",
        published.name,
        published.current_version().unwrap_or("?")
    ));
    ctx.log.respond(Response::ok_with(json!({
        "Instance": instance,
        "Mod": guid,
        "Version": published.current_version(),
    })));
}
