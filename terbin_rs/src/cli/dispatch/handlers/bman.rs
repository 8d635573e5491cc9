//! `bman`: render `plugin.cs` from the manifest.

use std::fs;

use crate::context::Context;
use crate::response::Response;
use crate::templates;

/// Write `plugin.cs`; `false` when nothing was written (already reported).
pub(super) fn generate(ctx: &mut Context) -> bool {
    ctx.log.section("Plugin file generation");

    let manifest = match (&ctx.manifest, ctx.manifest_exists) {
        (Some(manifest), true) => manifest,
        _ => {
            ctx.log.reject(
                "Manifest file does not exist or couldn't be read. Aborting generation.",
            );
            return false;
        }
    };

    let output = ctx.paths.work_dir.join("plugin.cs");
    if let Err(e) = fs::write(&output, templates::plugin_cs(manifest)) {
        ctx.log
            .fail(format!("Failed to write {}: {e}", output.display()));
        return false;
    }
    ctx.log.success(format!(
        "Plugin generated successfully at: {}",
        output.display()
    ));
    true
}

pub fn run(ctx: &mut Context, _args: &[String]) -> anyhow::Result<()> {
    if generate(ctx) {
        ctx.log.respond(Response::ok());
    }
    Ok(())
}
