//! Usage text per command, shown by `help <command>` and on bad arguments.

/// Usage lines for a canonical command name.
pub fn usage(name: &str) -> &'static [&'static str] {
    match name.to_lowercase().as_str() {
        "help" => &["terbin help", "terbin help <command>"],
        "info" => &["terbin info"],
        "config" => &[
            "terbin config fpath [path]",
            "terbin config show",
            "terbin config index-url [url]",
        ],
        "manifest" => &[
            "terbin manifest [-y] [-x]",
            "terbin manifest --name <name> --guid <guid> --version <version> --url <url> [-y] [-x]",
        ],
        "gen" => &["terbin gen"],
        "inf" => &["terbin inf"],
        "bman" => &["terbin bman"],
        "build" => &["terbin build"],
        "setup" => &["terbin setup [empty]"],
        "version" => &[
            "terbin version show",
            "terbin version list",
            "terbin version upgrade [major|minor|patch|<newVersion>]",
            "terbin version downgrade",
        ],
        "instances" => &[
            "terbin instances create <name> <path>",
            "terbin instances list",
            "terbin instances run <name> [exe]",
            "terbin instances open <name> [subpath]",
            "terbin instances delete <name> [-y]",
            "terbin instances add <name> <guid|name>",
        ],
        "mods" => &[
            "terbin mods list",
            "terbin mods update",
            "terbin mods info <guid|name>",
        ],
        "run" => &["terbin run"],
        "completion" => &["terbin completion [powershell|bash] [--install]"],
        _ => &[],
    }
}

/// Extra notes for commands whose arguments need explaining.
pub fn notes(name: &str) -> &'static [&'static str] {
    match name.to_lowercase().as_str() {
        "instances" => &[
            "<path> is the folder for the instance.",
            "[exe] defaults to 'Farlands.exe' inside the instance folder.",
            "[subpath] is resolved inside the instance unless absolute.",
            "'delete' only unregisters the instance; files are kept.",
        ],
        "manifest" => &[
            "-y skips the final confirmation; -x creates an EMPTY project without default dependencies.",
            "Missing values are asked for interactively.",
        ],
        "setup" => &["Runs: config fpath (if unset), manifest, gen, inf, bman."],
        "run" => &[
            "Creates the debug instance '.Instance' on first use, builds, copies the DLLs into BepInEx/plugins/<Name> and launches the game.",
        ],
        _ => &[],
    }
}
