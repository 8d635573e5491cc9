//! `gen`: write `<Name>.csproj` and run `dotnet restore`.

use std::fs;

use crate::context::Context;
use crate::progress::Spinner;
use crate::response::Response;
use crate::templates;
use crate::toolchain;

use super::checks;

pub fn run(ctx: &mut Context, _args: &[String]) -> anyhow::Result<()> {
    let Some(manifest) = ctx.manifest.as_ref() else {
        ctx.log.reject(checks::NO_MANIFEST);
        return Ok(());
    };
    let csproj_name = manifest.csproj_name();
    let project_path = ctx.paths.work_dir.join(&csproj_name);
    if project_path.exists() {
        ctx.log.reject(format!(
            "Project file already exists: {}",
            project_path.display()
        ));
        return Ok(());
    }

    ctx.log.info("Generating project...");
    if let Err(e) = fs::write(&project_path, templates::csproj(manifest)) {
        ctx.log.fail(format!(
            "Failed to write {}: {e}",
            project_path.display()
        ));
        return Ok(());
    }

    let spinner = Spinner::new("dotnet restore");
    let restored = toolchain::run_dotnet(&["restore", &csproj_name], &ctx.paths.work_dir);
    spinner.finish();
    match restored {
        Ok(output) => {
            if !output.stdout.is_empty() {
                ctx.log.info(output.stdout.clone());
            }
            if !output.stderr.is_empty() {
                ctx.log.warn(output.stderr.clone());
            }
            if !output.success() {
                ctx.log.warn(format!(
                    "dotnet restore exited with code {}; run it again once the issue is fixed.",
                    output.code_label()
                ));
            }
        }
        Err(e) => ctx
            .log
            .warn(format!("Skipped dotnet restore: {e}")),
    }

    ctx.log
        .success(format!("Project generated: {}", project_path.display()));
    ctx.log.respond(Response::ok());
    Ok(())
}
