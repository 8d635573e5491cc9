//! `mods list | update | info <mod>`

use serde_json::json;

use super::checks;
use crate::context::Context;
use crate::index::{ModIndex, ModReference};
use crate::progress::Spinner;
use crate::response::Response;

/// The mod index: the cached copy unless `refresh`, otherwise downloaded and
/// cached. `None` when it could not be obtained (already reported).
pub(super) fn load_index(ctx: &mut Context, refresh: bool) -> Option<ModIndex> {
    let Some(config) = ctx.config.as_ref() else {
        ctx.log.reject(checks::CONFIG_NOT_LOADED);
        return None;
    };
    if !refresh && let Some(cached) = config.index.clone() {
        ctx.log
            .info("Using cached mods index. Run 'terbin mods update' to refresh.");
        return Some(cached);
    }

    let url = ctx.index_url();
    ctx.log.info(format!("Downloading mods index from: {url}"));
    let spinner = Spinner::new("Fetching mods index");
    let fetched = ModIndex::fetch(ctx.fetcher.as_ref(), &url);
    spinner.finish();

    let index = match fetched {
        Ok(index) => index,
        Err(e) => {
            ctx.log.fail(format!("Failed to download mods index: {e}"));
            return None;
        }
    };
    if let Some(config) = ctx.config.as_mut()
        && let Err(e) = config.set_index(index.clone())
    {
        ctx.log.warn(format!("Could not cache mods index: {e}"));
    }
    Some(index)
}

fn describe(reference: &ModReference) -> String {
    format!(
        "- {} [{}] -> {}",
        reference.display_name(),
        reference.guid.as_deref().unwrap_or("?"),
        reference.url.as_deref().unwrap_or("-")
    )
}

pub fn run(ctx: &mut Context, args: &[String]) -> anyhow::Result<()> {
    let sub = args
        .first()
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_else(|| "list".to_string());

    match sub.as_str() {
        "list" => list(ctx),
        "update" => {
            if let Some(index) = load_index(ctx, true) {
                ctx.log
                    .success(format!("Mods index updated. Items: {}.", index.len()));
                ctx.log
                    .respond(Response::ok_with(json!({ "Count": index.len() })));
            }
        }
        "info" => match args.get(1) {
            Some(key) => info(ctx, key),
            None => checks::reject_usage(&mut ctx.log, "mods", "Missing mod GUID or name."),
        },
        other => checks::reject_usage(
            &mut ctx.log,
            "mods",
            format!("Unknown mods operation: {other}"),
        ),
    }
    Ok(())
}

fn list(ctx: &mut Context) {
    let Some(index) = load_index(ctx, false) else {
        return;
    };
    if index.is_empty() {
        ctx.log.info("No mods found in index.");
        ctx.log.respond(Response::ok_with(json!([])));
        return;
    }
    let sorted = index.sorted();
    ctx.log.boxed("Mods index", sorted.iter().map(|r| describe(r)));
    ctx.log.respond(Response::ok_with(json!(sorted)));
}

fn info(ctx: &mut Context, key: &str) {
    let Some(index) = load_index(ctx, false) else {
        return;
    };
    let Some(reference) = index.find(key) else {
        ctx.log.reject(format!("Mod not found in index: {key}"));
        return;
    };
    ctx.log.boxed(
        &format!("Mod: {}", reference.display_name()),
        [
            format!("Name:     {}", reference.display_name()),
            format!("GUID:     {}", reference.guid.as_deref().unwrap_or("?")),
            format!("Manifest: {}", reference.url.as_deref().unwrap_or("-")),
        ],
    );
    ctx.log.respond(Response::ok_with(json!(reference)));
}
