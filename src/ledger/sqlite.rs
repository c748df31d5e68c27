//! Checkin ledger stored in the same SQLite database.

use super::{CheckinLedger, ConflictKind, LedgerError};
use crate::db::models::Employee;
use crate::errors::{AppError, AppResult};
use crate::models::direction::Direction;
use crate::utils::date::format_ts;
use chrono::{Local, NaiveDateTime};
use rusqlite::{Connection, OptionalExtension, params};

pub struct SqliteLedger<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteLedger<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

fn map_employee(r: &rusqlite::Row) -> rusqlite::Result<Employee> {
    Ok(Employee {
        id: r.get(0)?,
        employee_code: r.get(1)?,
        employee_name: r.get(2)?,
        attendance_device_id: r.get(3)?,
        active: r.get::<_, String>(4)? == "Active",
    })
}

const EMPLOYEE_COLUMNS: &str = "id, employee_code, employee_name, attendance_device_id, status";

fn find_by_device_user(conn: &Connection, value: &str) -> rusqlite::Result<Option<Employee>> {
    let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE attendance_device_id = ?1");
    let mut stmt = conn.prepare_cached(&sql)?;
    stmt.query_row([value], map_employee).optional()
}

impl CheckinLedger for SqliteLedger<'_> {
    fn add_checkin(
        &mut self,
        employee_field_value: &str,
        timestamp: NaiveDateTime,
        device_id: &str,
        direction: Option<Direction>,
    ) -> Result<i64, LedgerError> {
        let employee = find_by_device_user(self.conn, employee_field_value)?.ok_or_else(|| {
            LedgerError::Conflict {
                kind: ConflictKind::EmployeeNotFound,
                message: format!(
                    "No Employee found for the given employee field value. 'attendance_device_id': {}",
                    employee_field_value
                ),
            }
        })?;

        if !employee.active {
            return Err(LedgerError::Conflict {
                kind: ConflictKind::InactiveEmployee,
                message: format!(
                    "Inactive Employee: {} ({}) cannot be checked in",
                    employee.employee_code, employee.employee_name
                ),
            });
        }

        let time = format_ts(&timestamp);
        let exists = {
            let mut stmt = self
                .conn
                .prepare_cached("SELECT 1 FROM employee_checkins WHERE employee = ?1 AND time = ?2")?;
            stmt.exists(params![employee.id, time])?
        };
        if exists {
            return Err(LedgerError::Conflict {
                kind: ConflictKind::DuplicateCheckin,
                message: format!(
                    "Duplicate Employee Checkin: {} already has a log at {}",
                    employee.employee_code, time
                ),
            });
        }

        self.conn.execute(
            "INSERT INTO employee_checkins (employee, time, device_id, log_type, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                employee.id,
                time,
                device_id,
                direction.map(|d| d.to_db_str()),
                Local::now().to_rfc3339(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }
}

/// Register an employee in the bundled ledger.
pub fn add_employee(
    conn: &Connection,
    code: &str,
    name: &str,
    attendance_device_id: Option<&str>,
    active: bool,
) -> AppResult<i64> {
    if code.trim().is_empty() {
        return Err(AppError::Config("employee code must not be empty".into()));
    }
    conn.execute(
        "INSERT INTO employees (employee_code, employee_name, attendance_device_id, status)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            code.trim(),
            name.trim(),
            attendance_device_id.map(str::trim),
            if active { "Active" } else { "Inactive" },
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_employees(conn: &Connection) -> AppResult<Vec<Employee>> {
    let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees ORDER BY employee_code");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], map_employee)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// A checkin row joined with its employee, for listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckinRow {
    pub employee_code: String,
    pub time: String,
    pub device_id: Option<String>,
    pub log_type: Option<String>,
}

pub fn list_checkins(conn: &Connection, device_id: Option<&str>) -> AppResult<Vec<CheckinRow>> {
    let mut sql = String::from(
        "SELECT e.employee_code, c.time, c.device_id, c.log_type
         FROM employee_checkins c
         INNER JOIN employees e ON e.id = c.employee",
    );
    if device_id.is_some() {
        sql.push_str(" WHERE c.device_id = ?1");
    }
    sql.push_str(" ORDER BY c.time ASC, c.id ASC");

    let mut stmt = conn.prepare(&sql)?;
    let map = |r: &rusqlite::Row| {
        Ok(CheckinRow {
            employee_code: r.get(0)?,
            time: r.get(1)?,
            device_id: r.get(2)?,
            log_type: r.get(3)?,
        })
    };
    let rows = match device_id {
        Some(d) => stmt.query_map([d], map)?,
        None => stmt.query_map([], map)?,
    };

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
