//! Progress UI utilities (spinners, bars)
//!
//! Bars draw to stderr and stay hidden when it is not a terminal, so pipe
//! clients and captured output only ever see logger lines.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner for long-running external processes (`dotnet build`).
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.cyan} {msg}")
        {
            bar.set_style(style);
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }

    /// Clear the spinner; the caller logs the outcome.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

/// Bar counting discrete items (files cloned, DLLs copied).
pub fn count_bar(total: u64, prefix: &str) -> ProgressBar {
    let bar = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{prefix:.bold} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}")
    {
        bar.set_style(style.progress_chars("=> "));
    }
    bar.set_prefix(prefix.to_string());
    bar
}

/// Bar for a download; falls back to a byte spinner when the size is unknown.
pub fn byte_bar(total: Option<u64>, prefix: &str) -> ProgressBar {
    let bar = match total {
        Some(len) => {
            let bar = ProgressBar::new(len);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{prefix:.bold} [{bar:30.green/white}] {bytes}/{total_bytes} ({eta})")
            {
                bar.set_style(style.progress_chars("=> "));
            }
            bar
        }
        None => {
            let bar = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{prefix:.bold} {spinner} {bytes}") {
                bar.set_style(style);
            }
            bar
        }
    };
    bar.set_prefix(prefix.to_string());
    bar
}

/// Format a byte count in human-readable form
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

/// Format a count with proper singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024 + 512 * 1024), "5.5 MB");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(1, "mod", "mods"), "1 mod");
        assert_eq!(format_count(0, "mod", "mods"), "0 mods");
        assert_eq!(format_count(3, "file", "files"), "3 files");
    }
}
