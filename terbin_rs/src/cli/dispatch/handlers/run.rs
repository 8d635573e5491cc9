//! `run`: build the mod and launch it in the project's debug instance.

use std::path::{Path, PathBuf};

use super::{build, checks, instances};
use crate::context::Context;
use crate::fs_utils;

/// Folder of the debug instance, inside the project.
pub const DEBUG_INSTANCE_DIR: &str = ".Instance";

/// Name the debug instance is registered under.
pub fn debug_instance_name(guid: &str) -> String {
    format!("debug_{guid}")
}

/// `bin/Debug/net45` of the project.
pub fn build_output_dir(work_dir: &Path) -> PathBuf {
    work_dir.join("bin").join("Debug").join("net45")
}

pub fn run(ctx: &mut Context, _args: &[String]) -> anyhow::Result<()> {
    let Some(manifest) = ctx.manifest.as_ref() else {
        ctx.log.reject(checks::NO_MANIFEST);
        return Ok(());
    };
    let Some(config) = ctx.config.as_ref() else {
        ctx.log.reject(checks::CONFIG_NOT_LOADED);
        return Ok(());
    };

    let instance = debug_instance_name(&manifest.guid);
    let mod_name = manifest.name.clone();
    let instance_dir = ctx.paths.work_dir.join(DEBUG_INSTANCE_DIR);
    let registered = config.has_instance(&instance);

    if !registered {
        ctx.log
            .info(format!("Creating debug instance '{instance}'..."));
        let path = instance_dir.to_string_lossy().to_string();
        ctx.log.hold();
        let created = instances::create(ctx, &instance, &path);
        let held = ctx.log.release();
        if !created {
            if let Some(failure) = held.into_iter().next() {
                ctx.log.respond(failure);
            }
            return Ok(());
        }
    }

    if !build::build_project(ctx) {
        return Ok(());
    }

    let plugin_dir = instance_dir.join("BepInEx").join("plugins").join(&mod_name);
    let output = build_output_dir(&ctx.paths.work_dir);
    match fs_utils::move_dlls(&output, &plugin_dir) {
        Ok(moved) => ctx.log.info(format!(
            "Moved {moved} DLLs into {}",
            plugin_dir.display()
        )),
        Err(e) => {
            ctx.log.fail(format!("Failed to deploy the build output: {e}"));
            return Ok(());
        }
    }

    instances::launch(ctx, &instance, None);
    Ok(())
}
