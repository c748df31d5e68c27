use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, params};

/// A schema step, applied at most once and recorded in the `log` table.
struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250301_0001_devices_and_shifts",
        description: "Created devices, device_shifts and shift_types tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS shift_types (
            name                  TEXT PRIMARY KEY,
            last_sync_of_checkin  TEXT
        );

        CREATE TABLE IF NOT EXISTS devices (
            id                          INTEGER PRIMARY KEY AUTOINCREMENT,
            device_id                   TEXT NOT NULL UNIQUE,
            ip_address                  TEXT NOT NULL,
            port                        INTEGER NOT NULL DEFAULT 4370,
            punch_direction             TEXT NOT NULL DEFAULT 'AUTO'
                                        CHECK (punch_direction IN ('IN','OUT','AUTO')),
            clear_from_device_on_fetch  INTEGER NOT NULL DEFAULT 0,
            created_at                  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS device_shifts (
            device      INTEGER NOT NULL REFERENCES devices(id) ON DELETE CASCADE,
            shift_type  TEXT NOT NULL REFERENCES shift_types(name),
            PRIMARY KEY (device, shift_type)
        );
        "#,
    },
    Migration {
        version: "20250301_0002_checkin_ledger",
        description: "Created employees and employee_checkins tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS employees (
            id                    INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_code         TEXT NOT NULL UNIQUE,
            employee_name         TEXT NOT NULL,
            attendance_device_id  TEXT UNIQUE,
            status                TEXT NOT NULL DEFAULT 'Active'
                                  CHECK (status IN ('Active','Inactive'))
        );

        CREATE TABLE IF NOT EXISTS employee_checkins (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            employee    INTEGER NOT NULL REFERENCES employees(id),
            time        TEXT NOT NULL,
            device_id   TEXT,
            log_type    TEXT CHECK (log_type IN ('IN','OUT')),
            created_at  TEXT NOT NULL,
            UNIQUE (employee, time)
        );

        CREATE INDEX IF NOT EXISTS idx_checkins_device ON employee_checkins(device_id);
        "#,
    },
    Migration {
        version: "20250412_0003_log_operation_index",
        description: "Indexed log.operation for error lookups",
        sql: r#"
        CREATE INDEX IF NOT EXISTS idx_log_operation ON log(operation);
        "#,
    },
];

/// Ensure that the `log` table exists. Migrations are tracked inside it.
fn ensure_log_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )
}

fn is_applied(conn: &Connection, version: &str) -> rusqlite::Result<bool> {
    let mut chk = conn.prepare_cached(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, m: &Migration) -> AppResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(m.sql)
        .map_err(|e| AppError::Migration(format!("{}: {}", m.version, e)))?;

    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (?1, 'migration_applied', ?2, ?3)",
        params![chrono::Local::now().to_rfc3339(), m.version, m.description],
    )?;

    tx.commit()?;
    Ok(())
}

/// Public entry point: run all pending migrations, in order.
/// Returns how many were applied.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }
        apply(conn, m)?;
        success(format!("Migration applied: {}", m.version));
        applied += 1;
    }

    Ok(applied)
}
