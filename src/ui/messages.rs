//! Console output helpers. Every user-facing line goes through here so
//! the icons and colors stay consistent across commands.

use ansi_term::{Colour, Style};
use std::fmt;

const ICON_INFO: &str = "ℹ️";
const ICON_OK: &str = "✅";
const ICON_WARN: &str = "⚠️";
const ICON_ERR: &str = "❌";

fn tag(colour: Colour, icon: &str) -> String {
    Style::new().bold().fg(colour).paint(icon).to_string()
}

pub fn info<T: fmt::Display>(msg: T) {
    println!("{} {}", tag(Colour::Blue, ICON_INFO), msg);
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{} {}", tag(Colour::Green, ICON_OK), msg);
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{} {}", tag(Colour::Yellow, ICON_WARN), msg);
}

pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{} {}", tag(Colour::Red, ICON_ERR), msg);
}

/// Section header, e.g. one per device during a sync cycle.
pub fn header<T: fmt::Display>(msg: T) {
    println!(
        "{}",
        Style::new()
            .bold()
            .fg(Colour::Blue)
            .paint(format!("==================== {msg}"))
    );
}
