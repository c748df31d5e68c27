/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Grey placeholder for a missing value ("Never", "--").
pub fn colorize_missing(value: &str) -> String {
    format!("{GREY}{value}{RESET}")
}

/// Direction coloring: IN green, OUT red, unknown grey.
pub fn colorize_direction(value: Option<&str>) -> String {
    match value {
        Some("IN") => format!("{GREEN}IN{RESET}"),
        Some("OUT") => format!("{RED}OUT{RESET}"),
        Some(other) => other.to_string(),
        None => colorize_missing("--"),
    }
}
