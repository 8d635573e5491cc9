//! Helper functions for turning input into command tokens.
//!
//! - Command prefix stripping (`--help`, `-i`)
//! - Line tokenizing for the interactive and pipe modes
//! - Flag lookups inside command arguments
//! - Command suggestion via Levenshtein distance

use strsim::levenshtein;

/// Strip one leading `--`, else one leading `-`.
pub fn strip_command_prefix(raw: &str) -> &str {
    raw.strip_prefix("--")
        .or_else(|| raw.strip_prefix('-'))
        .unwrap_or(raw)
}

/// Split a line on whitespace. Double quotes group words and are removed;
/// backslashes are literal so Windows paths survive unquoted.
/// An unbalanced quote falls back to plain whitespace splitting.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_token = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if quoted {
        tracing::debug!(line, "unbalanced quote, falling back to whitespace split");
        return line.split_whitespace().map(str::to_string).collect();
    }
    if in_token {
        tokens.push(current);
    }
    tokens
}

/// True if any of `names` appears among `args` (case-insensitive).
pub fn has_flag(args: &[String], names: &[&str]) -> bool {
    args.iter()
        .any(|a| names.iter().any(|n| a.eq_ignore_ascii_case(n)))
}

/// Value of `--name value` or `--name=value`. A following `--flag` is not a value.
pub fn flag_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    let mut iter = args.iter().peekable();
    while let Some(arg) = iter.next() {
        if arg.eq_ignore_ascii_case(name) {
            return iter
                .next_if(|next| !next.starts_with("--"))
                .map(String::as_str);
        }
        if let Some((key, value)) = arg.split_once('=')
            && key.eq_ignore_ascii_case(name)
        {
            return Some(value);
        }
    }
    None
}

/// Suggest a similar command using Levenshtein distance.
/// Returns Some(suggestion) if a close match is found (distance <= 2).
pub fn suggest_similar<'a>(input: &str, candidates: &'a [String]) -> Option<&'a str> {
    let input_lower = input.to_lowercase();
    let mut best_match: Option<(&str, usize)> = None;

    for cmd in candidates {
        let distance = levenshtein(&input_lower, &cmd.to_lowercase());
        if distance == 0 || distance > 2 {
            continue;
        }
        match best_match {
            Some((_, best)) if distance >= best => {}
            _ => best_match = Some((cmd.as_str(), distance)),
        }
    }

    best_match.map(|(cmd, _)| cmd)
}

// ============================================================================
// Tests
// ============================================================================
