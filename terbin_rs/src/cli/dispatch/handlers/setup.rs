//! `setup [empty]`: config fpath (when missing), manifest, gen, inf, bman.

use super::{bman, config, generate, inf, manifest};
use crate::cli::command::RunFn;
use crate::context::Context;
use crate::response::{Response, StatusCode};

/// Run one step with its responses held back. A failed step's response
/// becomes the turn's response and stops the setup.
fn step(ctx: &mut Context, label: &str, run: RunFn, args: &[&str]) -> anyhow::Result<bool> {
    ctx.log.info(format!("Step: {label}"));
    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
    ctx.log.hold();
    let outcome = run(ctx, &args);
    let responses = ctx.log.release();
    outcome?;

    match responses
        .into_iter()
        .find(|r| r.status.code != StatusCode::Ok.code())
    {
        Some(failure) => {
            ctx.log.warn(format!("Setup stopped at step '{label}'."));
            ctx.log.respond(failure);
            Ok(false)
        }
        None => Ok(true),
    }
}

pub fn run(ctx: &mut Context, args: &[String]) -> anyhow::Result<()> {
    let empty = args.iter().any(|a| a.eq_ignore_ascii_case("empty"));
    ctx.log.section("Setup: full mod preparation");

    let configured = ctx
        .config
        .as_ref()
        .and_then(|c| c.farlands_path().map(str::to_string));
    match configured {
        Some(path) => ctx
            .log
            .info(format!("Farlands path already configured: {path}")),
        None => {
            if !step(ctx, "config fpath", config::run, &["fpath"])? {
                return Ok(());
            }
            ctx.reload_config();
        }
    }

    if ctx.manifest_exists {
        ctx.log.info(format!(
            "Manifest already present: {}",
            ctx.paths.manifest_path().display()
        ));
    } else {
        let flags: &[&str] = if empty { &["-y", "-x"] } else { &["-y"] };
        if !step(ctx, "manifest", manifest::run, flags)? {
            return Ok(());
        }
        ctx.reload_manifest();
    }

    let project_exists = ctx
        .manifest
        .as_ref()
        .is_some_and(|m| ctx.paths.work_dir.join(m.csproj_name()).is_file());
    if project_exists {
        ctx.log.info("Project file already present; skipping gen.");
    } else if !step(ctx, "gen", generate::run, &[])? {
        return Ok(());
    }

    if !step(ctx, "inf", inf::run, &[])? {
        return Ok(());
    }
    if !step(ctx, "bman", bman::run, &[])? {
        return Ok(());
    }

    ctx.log.success("Setup complete. Mod ready!");
    ctx.log.respond(Response::ok());
    Ok(())
}
