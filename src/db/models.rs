//! Database row models for log entries, shift types and ledger employees.
//! These are thin wrappers around SQLite rows.

use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub id: i64,
    pub date: String, // ISO 8601
    pub operation: String,
    pub target: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ShiftType {
    pub name: String,
    pub last_sync_of_checkin: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Employee {
    pub id: i64,
    pub employee_code: String,
    pub employee_name: String,
    pub attendance_device_id: Option<String>,
    pub active: bool, // ⇔ employees.status ('Active' | 'Inactive')
}
