//! `manifest [-y] [-x] [--name N --guid G --version V --url U]`
//!
//! Creates `./manifest.json`. Values missing from the flags are asked for;
//! without a way to ask (pipe mode, end of input) the turn is rejected.

use serde_json::json;

use super::checks;
use crate::cli::parser::helpers::{flag_value, has_flag};
use crate::context::Context;
use crate::log::Logger;
use crate::manifest::{DEFAULT_DEPENDENCY, ManifestType, ProjectManifest};
use crate::net::is_http;
use crate::response::Response;

const YES_FLAGS: &[&str] = &["-y", "--yes"];
const EMPTY_FLAGS: &[&str] = &["-x", "--empty"];

/// One value collected for the new manifest.
struct Field {
    label: &'static str,
    flag: &'static str,
    question: &'static str,
    validate: fn(&str) -> Result<(), String>,
}

fn validate_token(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err("cannot be empty".into())
    } else if !checks::is_token(value) {
        Err("cannot contain spaces".into())
    } else {
        Ok(())
    }
}

/// Absolute http(s) URL with a host.
pub fn validate_url(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err("cannot be empty".into());
    }
    let host = value
        .split_once("://")
        .map(|(_, rest)| rest.split('/').next().unwrap_or(""))
        .unwrap_or("");
    if !is_http(value) || host.is_empty() || value.contains(char::is_whitespace) {
        return Err("is invalid. Use http or https".into());
    }
    Ok(())
}

const FIELDS: [Field; 4] = [
    Field {
        label: "Name",
        flag: "--name",
        question: "Project name: ",
        validate: validate_token,
    },
    Field {
        label: "GUID",
        flag: "--guid",
        question: "Unique identifier (GUID): ",
        validate: validate_token,
    },
    Field {
        label: "Version",
        flag: "--version",
        question: "Initial version: ",
        validate: validate_token,
    },
    Field {
        label: "URL",
        flag: "--url",
        question: "Project URL (e.g., https://github.com/user/repo): ",
        validate: validate_url,
    },
];

/// Flag value if given (rejecting invalid ones), else ask until valid.
fn collect(log: &mut Logger, field: &Field, args: &[String]) -> Option<String> {
    if let Some(value) = flag_value(args, field.flag) {
        let value = value.trim().to_string();
        return match (field.validate)(&value) {
            Ok(()) => Some(value),
            Err(why) => {
                log.reject(format!("{} {why}.", field.label));
                None
            }
        };
    }
    loop {
        let Some(answer) = log.ask(field.question) else {
            log.reject(format!("No value provided for {}.", field.label));
            return None;
        };
        let answer = answer.trim().to_string();
        match (field.validate)(&answer) {
            Ok(()) => return Some(answer),
            Err(why) => log.warn(format!("{} {why}. Please try again.", field.label)),
        }
    }
}

pub fn run(ctx: &mut Context, args: &[String]) -> anyhow::Result<()> {
    let path = ctx.paths.manifest_path();
    if path.exists() {
        ctx.log
            .reject(format!("Manifest already exists: {}", path.display()));
        return Ok(());
    }

    let auto_yes = has_flag(args, YES_FLAGS);
    let kind = if has_flag(args, EMPTY_FLAGS) {
        ManifestType::Empty
    } else {
        ManifestType::Normal
    };

    if !auto_yes && !ctx.log.confirm("No manifest found. Do you want to generate a new one?", true) {
        ctx.log.info("Operation cancelled. No manifest was generated.");
        return Ok(());
    }

    ctx.log.section("Project creation");
    let mut values = Vec::with_capacity(FIELDS.len());
    for field in &FIELDS {
        match collect(&mut ctx.log, field, args) {
            Some(value) => values.push(value),
            None => return Ok(()),
        }
    }
    let [name, guid, version, url]: [String; 4] = match values.try_into() {
        Ok(v) => v,
        Err(_) => anyhow::bail!("manifest fields out of sync"),
    };

    ctx.log.boxed(
        "Project summary",
        [
            format!("Name    : {name}"),
            format!("GUID    : {guid}"),
            format!("Version : {version}"),
            format!("URL     : {url}"),
            format!("Type    : {kind}"),
        ],
    );

    if !auto_yes && !ctx.log.confirm("Do you want to create the project?", true) {
        ctx.log.info("Operation cancelled. No project was created.");
        return Ok(());
    }

    let mut manifest = ProjectManifest::new(&path);
    manifest.name = name;
    manifest.guid = guid;
    manifest.versions = vec![version];
    manifest.url = url;
    manifest.kind = kind;
    manifest.dependencies = match kind {
        ManifestType::Normal => vec![DEFAULT_DEPENDENCY.to_string()],
        ManifestType::Empty => Vec::new(),
    };

    if let Err(e) = manifest.save() {
        ctx.log.fail(format!("Failed to write manifest: {e}"));
        return Ok(());
    }
    ctx.log.success("Project created successfully.");
    let content = json!({
        "Name": manifest.name,
        "GUID": manifest.guid,
        "Versions": manifest.versions,
        "Type": manifest.kind,
    });
    ctx.reload_manifest();
    ctx.log.respond(Response::ok_with(content));
    Ok(())
}
