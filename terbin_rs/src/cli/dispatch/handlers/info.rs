//! `info`

use serde_json::json;

use crate::context::Context;
use crate::response::Response;

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

pub fn run(ctx: &mut Context, _args: &[String]) -> anyhow::Result<()> {
    let manifest_path = ctx.paths.manifest_path();
    let config_path = ctx.paths.config_path();
    let farlands = ctx
        .config
        .as_ref()
        .and_then(|c| c.farlands_path())
        .map(str::to_string);
    let instances = ctx.config.as_ref().map(|c| c.instances().len()).unwrap_or(0);

    let log = &mut ctx.log;
    log.section("Terbin information");
    log.info(format!("Version: {}", env!("CARGO_PKG_VERSION")));
    log.info(format!("Manifest path: {}", manifest_path.display()));
    log.info(format!("Manifest exists?: {}", yes_no(ctx.manifest_exists)));
    if let Some(manifest) = &ctx.manifest {
        log.info(format!(
            "Project: {} [{}] {}",
            manifest.name,
            manifest.guid,
            manifest.current_version().unwrap_or("<none>")
        ));
    }
    log.info(format!("Config path: {}", config_path.display()));
    log.info(format!("Config loaded?: {}", yes_no(ctx.config.is_some())));
    log.info(format!(
        "Farlands path: {}",
        farlands.as_deref().unwrap_or("<not set>")
    ));
    log.info(format!("Instances: {instances}"));
    log.success("Command executed successfully.");

    log.respond(Response::ok_with(json!({
        "Version": env!("CARGO_PKG_VERSION"),
        "ManifestPath": manifest_path,
        "ManifestExists": ctx.manifest_exists,
        "ConfigPath": config_path,
        "ConfigLoaded": ctx.config.is_some(),
        "FarlandsPath": farlands,
        "Instances": instances,
    })));
    Ok(())
}
