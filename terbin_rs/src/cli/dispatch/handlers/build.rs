//! `build`: regenerate `plugin.cs`, then `dotnet build <Name>.csproj`.

use super::{bman, checks};
use crate::context::Context;
use crate::progress::Spinner;
use crate::response::Response;
use crate::toolchain;

/// Run the whole build. `true` only when dotnet reported success.
pub(super) fn build_project(ctx: &mut Context) -> bool {
    ctx.log.info("Build started...");
    let Some(manifest) = ctx.manifest.as_ref() else {
        ctx.log.reject(checks::NO_MANIFEST);
        return false;
    };
    let csproj = ctx.paths.work_dir.join(manifest.csproj_name());
    if !csproj.is_file() {
        ctx.log.reject(format!(
            "Project file not found: {}. Run 'terbin gen' first.",
            csproj.display()
        ));
        return false;
    }

    if !bman::generate(ctx) {
        return false;
    }

    let spinner = Spinner::new("dotnet build");
    let target = csproj.to_string_lossy().to_string();
    let result = toolchain::run_dotnet(&["build", &target], &ctx.paths.work_dir);
    spinner.finish();

    let output = match result {
        Ok(output) => output,
        Err(e) => {
            ctx.log.fail(format!("Failed to run dotnet: {e}"));
            return false;
        }
    };
    if !output.stdout.is_empty() {
        ctx.log.info(output.stdout.clone());
    }
    if !output.stderr.is_empty() {
        ctx.log.warn(output.stderr.clone());
    }
    if output.success() {
        ctx.log.success("Build completed successfully.");
        true
    } else {
        ctx.log.fail(format!(
            "Build failed with exit code {}.",
            output.code_label()
        ));
        false
    }
}

pub fn run(ctx: &mut Context, _args: &[String]) -> anyhow::Result<()> {
    if build_project(ctx) {
        ctx.log.respond(Response::ok());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::{Logger, MemorySink, NoPrompt};
    use crate::manifest::ProjectManifest;
    use crate::paths::Paths;
    use tempfile::TempDir;

    #[test]
    fn test_requires_project_file() {
        let work = TempDir::new().expect("temp dir");
        let home = TempDir::new().expect("temp dir");
        let mut manifest = ProjectManifest::new(work.path().join("manifest.json"));
        manifest.name = "CoolMod".into();
        manifest.save().expect("save");

        let sink = MemorySink::structured();
        let mut ctx = Context::load(
            Paths::new(work.path(), home.path()),
            Logger::new(Box::new(sink.clone()), Box::new(NoPrompt)),
        );
        run(&mut ctx, &[]).expect("run");
        assert!(sink.contains("Run 'terbin gen' first."));
        assert_eq!(sink.responses()[0].status.code, 400);
        assert!(!work.path().join("plugin.cs").exists());
    }
}
