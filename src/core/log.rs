use crate::db::models::LogEntry;
use ansi_term::Colour;

use crate::utils::table::strip_ansi;

const OP_TARGET_MAX: usize = 60;

/// ANSI color for an operation name.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "sync" => Colour::Green,
        "migration_applied" => Colour::Purple,
        "init" => Colour::RGB(255, 153, 51),
        other if other.ends_with("_error") => Colour::Red,
        other if other.starts_with("device_") || other.starts_with("shift_") => Colour::Yellow,
        _ => Colour::White,
    }
}

/// Format log rows as aligned lines: `id: date | op (target) => message`.
pub fn format_log(entries: &[LogEntry]) -> Vec<String> {
    let rows: Vec<(i64, String, &str, String, &str)> = entries
        .iter()
        .map(|e| {
            let date = chrono::DateTime::parse_from_rfc3339(&e.date)
                .map(|dt| dt.format("%FT%T%:z").to_string())
                .unwrap_or_else(|_| e.date.clone());
            let op_target = if e.target.is_empty() {
                e.operation.clone()
            } else {
                format!("{} ({})", e.operation, e.target)
            };
            (e.id, date, e.operation.as_str(), op_target, e.message.as_str())
        })
        .collect();

    let op_w = rows
        .iter()
        .map(|(_, _, _, op_target, _)| op_target.chars().count())
        .max()
        .unwrap_or(10)
        .min(OP_TARGET_MAX);
    let id_w = rows
        .iter()
        .map(|(id, _, _, _, _)| id.to_string().len())
        .max()
        .unwrap_or(1);
    let date_w = rows
        .iter()
        .map(|(_, date, _, _, _)| date.len())
        .max()
        .unwrap_or(0);

    let mut out = Vec::with_capacity(rows.len());
    for (id, date, operation, op_target, message) in rows {
        let color = color_for_operation(operation);

        let visible = if op_target.chars().count() > OP_TARGET_MAX {
            let mut s: String = op_target.chars().take(OP_TARGET_MAX - 3).collect();
            s.push_str("...");
            s
        } else {
            op_target
        };

        // only the operation word is colored
        let colored = match visible.split_once(' ') {
            Some((op_word, rest)) => format!("{} {}", color.paint(op_word), rest),
            None => color.paint(visible.as_str()).to_string(),
        };
        let padding = " ".repeat(op_w.saturating_sub(strip_ansi(&colored).chars().count()));

        out.push(format!(
            "{:>id_w$}: {:<date_w$} | {}{} => {}",
            id,
            date,
            colored,
            padding,
            message,
            id_w = id_w,
            date_w = date_w
        ));
    }
    out
}
