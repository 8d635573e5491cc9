//! `help [command]`

use serde_json::json;

use super::checks;
use crate::cli::command::help::{notes, usage};
use crate::cli::parser::helpers::strip_command_prefix;
use crate::context::{CatalogEntry, Context};
use crate::response::Response;

pub fn run(ctx: &mut Context, args: &[String]) -> anyhow::Result<()> {
    match args.first() {
        None => general(ctx),
        Some(name) => detail(ctx, strip_command_prefix(name)),
    }
    Ok(())
}

fn general(ctx: &mut Context) {
    let log = &mut ctx.log;
    log.section("Help");
    log.info("Usage:");
    log.info("  terbin <command> [args]");
    log.info("  terbin help [command]");
    log.info("  terbin --interactive");
    log.info("  terbin --pipe [name]");
    log.info("");
    log.info("Available commands:");
    for entry in &ctx.catalog {
        log.info(format!("  {} - {}", entry.name, entry.description));
    }

    let aliases: Vec<String> = ctx
        .catalog
        .iter()
        .flat_map(|e| e.aliases.iter().map(move |a| format!("{a} -> {}", e.name)))
        .collect();
    if !aliases.is_empty() {
        log.info("");
        log.info(format!("Short aliases: {}", aliases.join(", ")));
        log.info("Commands also accept a '-' or '--' prefix, e.g. 'terbin -i list'.");
    }

    let content: Vec<_> = ctx
        .catalog
        .iter()
        .map(|e| json!({"name": e.name, "description": e.description, "aliases": e.aliases}))
        .collect();
    log.respond(Response::ok_with(json!(content)));
}

fn find<'a>(catalog: &'a [CatalogEntry], name: &str) -> Option<&'a CatalogEntry> {
    catalog.iter().find(|e| {
        e.name.eq_ignore_ascii_case(name) || e.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    })
}

fn detail(ctx: &mut Context, name: &str) {
    let Some(entry) = find(&ctx.catalog, name).cloned() else {
        ctx.log.reject(format!("Unknown command: {name}"));
        ctx.log.info("Run 'terbin help' to see available commands.");
        return;
    };

    let log = &mut ctx.log;
    log.section(&format!("Help: {}", entry.name));
    log.info(entry.description);
    checks::print_usage(log, entry.name);
    if !entry.aliases.is_empty() {
        log.info(format!("Aliases: {}", entry.aliases.join(", ")));
    }
    let extra = notes(entry.name);
    if !extra.is_empty() {
        log.info("Notes:");
        for note in extra {
            log.info(format!("  - {note}"));
        }
    }
    log.respond(Response::ok_with(json!({
        "name": entry.name,
        "description": entry.description,
        "aliases": entry.aliases,
        "usage": usage(entry.name),
    })));
}
