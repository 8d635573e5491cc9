//! `version show | list | upgrade [major|minor|patch|<v>] | downgrade`

use serde_json::json;

use super::checks;
use crate::context::Context;
use crate::response::Response;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bump {
    Major,
    Minor,
    Patch,
}

impl Bump {
    pub fn parse(level: &str) -> Option<Self> {
        match level.to_lowercase().as_str() {
            "major" => Some(Bump::Major),
            "minor" => Some(Bump::Minor),
            "patch" => Some(Bump::Patch),
            _ => None,
        }
    }
}

/// Leading digits of `part`, 0 when there are none.
fn leading_number(part: &str) -> u64 {
    let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

/// `major.minor.patch` of `version`, ignoring any `-prerelease` / `+build`.
pub fn parse_version(version: &str) -> (u64, u64, u64) {
    let core = version.split(['-', '+']).next().unwrap_or("");
    let mut parts = core.split('.').map(leading_number);
    (
        parts.next().unwrap_or(0),
        parts.next().unwrap_or(0),
        parts.next().unwrap_or(0),
    )
}

pub fn bump(version: &str, level: Bump) -> String {
    let (major, minor, patch) = parse_version(version);
    match level {
        Bump::Major => format!("{}.0.0", major.saturating_add(1)),
        Bump::Minor => format!("{major}.{}.0", minor.saturating_add(1)),
        Bump::Patch => format!("{major}.{minor}.{}", patch.saturating_add(1)),
    }
}

fn has_unusual_chars(version: &str) -> bool {
    !version
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '.' | '-' | '_'))
}

fn current_label(versions: &[String]) -> String {
    versions
        .last()
        .cloned()
        .unwrap_or_else(|| "<none>".to_string())
}

fn show_usage(ctx: &mut Context) {
    checks::print_usage(&mut ctx.log, "version");
    let current = ctx
        .manifest
        .as_ref()
        .map(|m| current_label(&m.versions))
        .unwrap_or_default();
    ctx.log.info(format!("Current: {current}"));
}

pub fn run(ctx: &mut Context, args: &[String]) -> anyhow::Result<()> {
    if ctx.manifest.is_none() || !ctx.manifest_exists {
        ctx.log.reject(checks::NO_MANIFEST);
        return Ok(());
    }
    let Some(sub) = args.first().map(|s| s.trim().to_lowercase()) else {
        show_usage(ctx);
        ctx.log.respond(Response::bad_request("No version operation given."));
        return Ok(());
    };

    match sub.as_str() {
        "show" => {
            let current = ctx
                .manifest
                .as_ref()
                .and_then(|m| m.current_version().map(str::to_string));
            ctx.log.info(format!(
                "Current: {}",
                current.as_deref().unwrap_or("<none>")
            ));
            ctx.log
                .respond(Response::ok_with(json!({ "Current": current })));
        }
        "list" => list(ctx),
        "downgrade" => downgrade(ctx, &args[1..]),
        "upgrade" => upgrade(ctx, args.get(1).map(String::as_str)),
        other => {
            ctx.log.error(format!("Unknown version operation: {other}"));
            show_usage(ctx);
            ctx.log
                .respond(Response::bad_request(format!("Unknown version operation: {other}")));
        }
    }
    Ok(())
}

fn list(ctx: &mut Context) {
    let versions = ctx
        .manifest
        .as_ref()
        .map(|m| m.versions.clone())
        .unwrap_or_default();
    if versions.is_empty() {
        ctx.log.info("No versions found.");
    } else {
        ctx.log.boxed(
            "Versions",
            versions
                .iter()
                .enumerate()
                .map(|(i, v)| format!("{}. {v}", i + 1)),
        );
    }
    ctx.log
        .respond(Response::ok_with(json!({ "Versions": versions })));
}

fn downgrade(ctx: &mut Context, extra: &[String]) {
    if !extra.is_empty() {
        ctx.log
            .reject("Downgrade does not take arguments. It removes the last version entry.");
        ctx.log.warn("Usage: terbin version downgrade");
        return;
    }
    let Some(manifest) = ctx.manifest.as_mut() else {
        return;
    };
    match manifest.pop_version() {
        Ok(None) => ctx.log.info("No versions to remove."),
        Ok(Some(removed)) => {
            ctx.log.success(format!("Removed version: {removed}"));
            match manifest.current_version() {
                Some(current) => ctx.log.info(format!("Current: {current}")),
                None => ctx.log.info("No versions left."),
            }
        }
        Err(e) => {
            ctx.log.fail(format!("Failed to update manifest: {e}"));
            return;
        }
    }
    let current = manifest.current_version().map(str::to_string);
    ctx.log
        .respond(Response::ok_with(json!({ "Current": current })));
}

fn upgrade(ctx: &mut Context, target: Option<&str>) {
    let Some(manifest) = ctx.manifest.as_mut() else {
        return;
    };

    let next = match target.map(|t| (t, Bump::parse(t))) {
        Some((explicit, None)) => {
            let explicit = explicit.trim();
            if !checks::is_token(explicit) {
                ctx.log
                    .reject("Invalid version. It cannot be empty or contain spaces.");
                return;
            }
            if has_unusual_chars(explicit) {
                ctx.log.warn(
                    "Version contains unusual characters. Allowed: letters, digits, '.', '-', '_'.",
                );
            }
            explicit.to_string()
        }
        Some((_, Some(level))) => bump(manifest.current_version().unwrap_or("0.0.0"), level),
        None => bump(manifest.current_version().unwrap_or("0.0.0"), Bump::Patch),
    };

    if manifest.current_version() == Some(next.as_str()) {
        ctx.log.info(format!("Version already current: {next}"));
        ctx.log
            .respond(Response::ok_with(json!({ "Current": next })));
        return;
    }
    if let Err(e) = manifest.push_version(next.clone()) {
        ctx.log.fail(format!("Failed to update manifest: {e}"));
        return;
    }
    ctx.log.success(format!("Version set to: {next}"));
    ctx.log
        .respond(Response::ok_with(json!({ "Current": next })));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::{Logger, MemorySink, NoPrompt};
    use crate::manifest::ProjectManifest;
    use crate::paths::Paths;
    use tempfile::TempDir;

    #[test]
    fn test_parse_version() {
        assert_eq!(parse_version("1.2.3"), (1, 2, 3));
        assert_eq!(parse_version("1.2.3-beta.4+sha"), (1, 2, 3));
        assert_eq!(parse_version("v1.x.7"), (0, 0, 7));
        assert_eq!(parse_version("2"), (2, 0, 0));
        assert_eq!(parse_version("3rc.4b"), (3, 4, 0));
        assert_eq!(parse_version(""), (0, 0, 0));
    }

    #[test]
    fn test_bump_levels() {
        assert_eq!(bump("1.2.3", Bump::Major), "2.0.0");
        assert_eq!(bump("1.2.3", Bump::Minor), "1.3.0");
        assert_eq!(bump("1.2.3", Bump::Patch), "1.2.4");
        assert_eq!(bump("0.0.0", Bump::Patch), "0.0.1");
        assert_eq!(bump("1.0.0-rc1", Bump::Patch), "1.0.1");
    }

    #[test]
    fn test_bump_saturates_at_max() {
        let max = u64::MAX;
        assert_eq!(bump(&format!("{max}.0.0"), Bump::Major), format!("{max}.0.0"));
        assert_eq!(bump(&format!("1.{max}.0"), Bump::Minor), format!("1.{max}.0"));
        assert_eq!(bump(&format!("1.2.{max}"), Bump::Patch), format!("1.2.{max}"));
    }

    struct Fx {
        work: TempDir,
        _home: TempDir,
        sink: MemorySink,
        ctx: Context,
    }

    fn fx(versions: &[&str]) -> Fx {
        let work = TempDir::new().expect("temp dir");
        let home = TempDir::new().expect("temp dir");
        let mut manifest = ProjectManifest::new(work.path().join("manifest.json"));
        manifest.name = "CoolMod".into();
        manifest.versions = versions.iter().map(|v| v.to_string()).collect();
        manifest.save().expect("save");
        let sink = MemorySink::structured();
        let ctx = Context::load(
            Paths::new(work.path(), home.path()),
            Logger::new(Box::new(sink.clone()), Box::new(NoPrompt)),
        );
        Fx {
            work,
            _home: home,
            sink,
            ctx,
        }
    }

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn saved_versions(work: &TempDir) -> Vec<String> {
        ProjectManifest::load(&work.path().join("manifest.json"))
            .expect("load")
            .versions
    }

    #[test]
    fn test_upgrade_default_patch_from_empty() {
        let mut f = fx(&[]);
        run(&mut f.ctx, &args(&["upgrade"])).expect("run");
        assert_eq!(saved_versions(&f.work), vec!["0.0.1"]);
    }

    #[test]
    fn test_upgrade_minor_and_explicit() {
        let mut f = fx(&["1.2.3"]);
        run(&mut f.ctx, &args(&["upgrade", "MINOR"])).expect("run");
        run(&mut f.ctx, &args(&["upgrade", "2.0.0-beta_1"])).expect("run");
        assert_eq!(saved_versions(&f.work), vec!["1.2.3", "1.3.0", "2.0.0-beta_1"]);
        assert!(!f.sink.contains("unusual characters"));
    }

    #[test]
    fn test_upgrade_explicit_warns_on_unusual_chars() {
        let mut f = fx(&["1.0.0"]);
        run(&mut f.ctx, &args(&["upgrade", "1.1.0@rc"])).expect("run");
        assert!(f.sink.contains("unusual characters"));
        assert_eq!(saved_versions(&f.work), vec!["1.0.0", "1.1.0@rc"]);
    }

    #[test]
    fn test_upgrade_to_current_is_noop() {
        let mut f = fx(&["1.0.0"]);
        run(&mut f.ctx, &args(&["upgrade", "1.0.0"])).expect("run");
        assert!(f.sink.contains("Version already current: 1.0.0"));
        assert_eq!(saved_versions(&f.work), vec!["1.0.0"]);
    }

    #[test]
    fn test_downgrade() {
        let mut f = fx(&["1.0.0", "1.1.0"]);
        run(&mut f.ctx, &args(&["downgrade", "1.0.0"])).expect("run");
        assert_eq!(f.sink.responses()[0].status.code, 400);
        assert_eq!(saved_versions(&f.work).len(), 2);

        let mut g = fx(&["1.0.0", "1.1.0"]);
        run(&mut g.ctx, &args(&["downgrade"])).expect("run");
        assert!(g.sink.contains("Removed version: 1.1.0"));
        assert!(g.sink.contains("Current: 1.0.0"));
        assert_eq!(saved_versions(&g.work), vec!["1.0.0"]);
    }

    #[test]
    fn test_show_and_list() {
        let mut f = fx(&["0.1.0", "0.2.0"]);
        run(&mut f.ctx, &args(&["show"])).expect("run");
        assert!(f.sink.contains("[INFO] Current: 0.2.0"));

        let mut g = fx(&["0.1.0", "0.2.0"]);
        run(&mut g.ctx, &args(&["list"])).expect("run");
        assert!(g.sink.contains("1. 0.1.0"));
        assert!(g.sink.contains("2. 0.2.0"));
    }

    #[test]
    fn test_requires_manifest() {
        let work = TempDir::new().expect("temp dir");
        let home = TempDir::new().expect("temp dir");
        let sink = MemorySink::structured();
        let mut ctx = Context::load(
            Paths::new(work.path(), home.path()),
            Logger::new(Box::new(sink.clone()), Box::new(NoPrompt)),
        );
        run(&mut ctx, &args(&["show"])).expect("run");
        assert_eq!(sink.responses()[0].status.code, 400);
    }
}
