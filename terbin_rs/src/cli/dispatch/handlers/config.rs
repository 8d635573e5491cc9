//! `config fpath [path] | show | index-url [url]`

use std::path::Path;

use serde_json::json;

use super::checks;
use crate::context::Context;
use crate::response::Response;

pub fn run(ctx: &mut Context, args: &[String]) -> anyhow::Result<()> {
    let Some(module) = args.first() else {
        checks::reject_usage(&mut ctx.log, "config", "No config module given.");
        return Ok(());
    };
    if ctx.config.is_none() {
        ctx.log.reject(checks::CONFIG_NOT_LOADED);
        return Ok(());
    }

    match module.to_lowercase().as_str() {
        "fpath" => set_farlands_path(ctx, args.get(1).map(String::as_str)),
        "show" => show(ctx),
        "index-url" => set_index_url(ctx, args.get(1).map(String::as_str)),
        other => {
            checks::reject_usage(&mut ctx.log, "config", format!("Unknown config module: {other}"));
        }
    }
    Ok(())
}

fn set_farlands_path(ctx: &mut Context, value: Option<&str>) {
    let value = match value {
        Some(v) => v.trim().to_string(),
        None => ctx
            .log
            .ask("Enter Farlands path: ")
            .unwrap_or_default()
            .trim()
            .to_string(),
    };
    if value.is_empty() {
        ctx.log.warn("No path provided. Aborting.");
        ctx.log.respond(Response::bad_request("No path provided."));
        return;
    }

    let Some(config) = ctx.config.as_mut() else {
        return;
    };
    if let Err(e) = config.set_farlands_path(value.clone()) {
        ctx.log.fail(format!("Failed to save config: {e}"));
        return;
    }
    if !Path::new(&value).is_dir() {
        ctx.log
            .warn(format!("'{value}' does not exist or is not a folder."));
    }
    ctx.log.success(format!("Farlands path set to: {value}"));
    ctx.log
        .respond(Response::ok_with(json!({ "FarlandsPath": value })));
}

fn show(ctx: &mut Context) {
    let Some(config) = ctx.config.as_ref() else {
        return;
    };
    let lines = vec![
        format!("File         : {}", config.path().display()),
        format!(
            "FarlandsPath : {}",
            config.farlands_path().unwrap_or("<not set>")
        ),
        format!(
            "IndexUrl     : {}",
            config.index_url.as_deref().unwrap_or("<default>")
        ),
        format!("Instances    : {}", config.instances().len()),
        format!(
            "Cached mods  : {}",
            config.index.as_ref().map(|i| i.len()).unwrap_or(0)
        ),
    ];
    let content = serde_json::to_value(config).unwrap_or_default();
    ctx.log.boxed("Config", lines);
    ctx.log.respond(Response::ok_with(content));
}

fn set_index_url(ctx: &mut Context, value: Option<&str>) {
    let value = value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string);
    let Some(config) = ctx.config.as_mut() else {
        return;
    };
    if let Err(e) = config.set_index_url(value.clone()) {
        ctx.log.fail(format!("Failed to save config: {e}"));
        return;
    }
    match &value {
        Some(url) => ctx.log.success(format!("Mods index URL set to: {url}")),
        None => ctx.log.success("Mods index URL reset to the default."),
    }
    let effective = ctx.index_url();
    ctx.log
        .respond(Response::ok_with(json!({ "IndexUrl": effective })));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::{Logger, MemorySink, ScriptedPrompt};
    use crate::paths::Paths;
    use tempfile::TempDir;

    struct Fx {
        _work: TempDir,
        home: TempDir,
        sink: MemorySink,
        ctx: Context,
    }

    fn fx(answers: &[&str]) -> Fx {
        let work = TempDir::new().expect("temp dir");
        let home = TempDir::new().expect("temp dir");
        let sink = MemorySink::structured();
        let ctx = Context::load(
            Paths::new(work.path(), home.path()),
            Logger::new(
                Box::new(sink.clone()),
                Box::new(ScriptedPrompt::new(answers.iter().copied())),
            ),
        );
        Fx {
            _work: work,
            home,
            sink,
            ctx,
        }
    }

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_fpath_from_argument() {
        let mut f = fx(&[]);
        let game = f.home.path().join("game");
        std::fs::create_dir_all(&game).expect("mkdir");
        run(&mut f.ctx, &args(&["fpath", &game.to_string_lossy()])).expect("run");

        let saved = std::fs::read_to_string(f.home.path().join("config.json")).expect("read");
        assert!(saved.contains("FarlandsPath"));
        assert!(f.sink.contains("[OK]   Farlands path set to:"));
        assert!(!f.sink.contains("[WARN]"));
    }

    #[test]
    fn test_fpath_asks_when_missing() {
        let mut f = fx(&["/nowhere/farlands"]);
        run(&mut f.ctx, &args(&["fpath"])).expect("run");
        assert_eq!(
            f.ctx.config.as_ref().and_then(|c| c.farlands_path()),
            Some("/nowhere/farlands")
        );
        assert!(f.sink.contains("does not exist"));
    }

    #[test]
    fn test_fpath_blank_answer_aborts() {
        let mut f = fx(&["   "]);
        run(&mut f.ctx, &args(&["fpath"])).expect("run");
        assert!(f.sink.contains("No path provided. Aborting."));
        assert_eq!(f.sink.responses()[0].status.code, 400);
        assert!(!f.home.path().join("config.json").exists());
    }

    #[test]
    fn test_missing_module_and_unknown_module() {
        let mut f = fx(&[]);
        run(&mut f.ctx, &[]).expect("run");
        assert_eq!(f.sink.responses()[0].status.code, 400);

        let mut g = fx(&[]);
        run(&mut g.ctx, &args(&["colour"])).expect("run");
        assert!(g.sink.contains("Unknown config module: colour"));
    }

    #[test]
    fn test_index_url_set_and_reset() {
        let mut f = fx(&[]);
        run(&mut f.ctx, &args(&["index-url", "/mirror/mods.json"])).expect("run");
        assert_eq!(f.ctx.index_url(), "/mirror/mods.json");

        run(&mut f.ctx, &args(&["index-url"])).expect("run");
        assert_eq!(f.ctx.index_url(), crate::index::DEFAULT_INDEX_URL);
    }
}
