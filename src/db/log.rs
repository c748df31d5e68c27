use crate::db::models::LogEntry;
use crate::errors::AppResult;
use crate::models::status::LastError;
use crate::ui::messages::{error, warning};
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, params};

/// Operation names of error rows. Every error operation ends in `_error`.
pub const OP_DEVICE_ERROR: &str = "device_error";
pub const OP_SYNC_ERROR: &str = "sync_error";
pub const OP_CHECKIN_ERROR: &str = "checkin_error";
pub const OP_SYNC: &str = "sync";

/// Write an internal log line into the `log` table.
pub fn ttlog(conn: &Connection, operation: &str, target: &str, message: &str) -> AppResult<()> {
    // Timestamp locale, formattato in ISO 8601
    let now = Local::now().to_rfc3339();

    let mut stmt = conn.prepare_cached(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, ?2, ?3, ?4)",
    )?;

    stmt.execute(params![now, operation, target, message])?;

    Ok(())
}

/// Record an error on the console and in the durable log.
/// A failing log write is reported but never propagated.
pub fn record_error(conn: &Connection, operation: &str, target: &str, message: &str) {
    error(message);
    if let Err(e) = ttlog(conn, operation, target, message) {
        warning(format!("Failed to write internal log: {}", e));
    }
}

/// Same as [`record_error`] for informational rows (no console output).
pub fn record(conn: &Connection, operation: &str, target: &str, message: &str) {
    if let Err(e) = ttlog(conn, operation, target, message) {
        warning(format!("Failed to write internal log: {}", e));
    }
}

/// Most recent error row whose target contains `needle`.
pub fn last_error_for(conn: &Connection, needle: &str) -> AppResult<Option<LastError>> {
    let mut stmt = conn.prepare_cached(
        "SELECT date, message FROM log
         WHERE substr(operation, -6) = '_error' AND instr(target, ?1) > 0
         ORDER BY id DESC
         LIMIT 1",
    )?;

    let row = stmt
        .query_row([needle], |r| {
            Ok(LastError {
                creation: r.get(0)?,
                error: r.get(1)?,
            })
        })
        .optional()?;

    Ok(row)
}

/// Load log rows in insertion order, optionally only errors and/or only
/// rows whose target contains `target`.
pub fn load_entries(
    conn: &Connection,
    errors_only: bool,
    target: Option<&str>,
) -> AppResult<Vec<LogEntry>> {
    let mut sql = String::from("SELECT id, date, operation, target, message FROM log");
    let mut conditions: Vec<&str> = Vec::new();
    if errors_only {
        conditions.push("substr(operation, -6) = '_error'");
    }
    if target.is_some() {
        conditions.push("instr(target, ?1) > 0");
    }
    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }
    sql.push_str(" ORDER BY id ASC");

    let mut stmt = conn.prepare(&sql)?;
    let map = |r: &rusqlite::Row| {
        Ok(LogEntry {
            id: r.get(0)?,
            date: r.get(1)?,
            operation: r.get(2)?,
            target: r.get::<_, Option<String>>(3)?.unwrap_or_default(),
            message: r.get(4)?,
        })
    };

    let rows = match target {
        Some(t) => stmt.query_map([t], map)?,
        None => stmt.query_map([], map)?,
    };

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
