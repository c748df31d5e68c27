//! Downstream employee checkin ledger.

pub mod sqlite;

use crate::models::direction::Direction;
use chrono::NaiveDateTime;
use thiserror::Error;

/// Known benign reconciliation conflicts. Each one can be silenced in the settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    EmployeeNotFound,
    InactiveEmployee,
    DuplicateCheckin,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("{message}")]
    Conflict { kind: ConflictKind, message: String },

    /// Any other rejection, possibly only described by its text.
    #[error("{0}")]
    Rejected(String),
}

impl LedgerError {
    /// Build an error from a ledger that only reports text.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        match classify_ledger_message(&message) {
            Some(kind) => LedgerError::Conflict { kind, message },
            None => LedgerError::Rejected(message),
        }
    }

    pub fn conflict_kind(&self) -> Option<ConflictKind> {
        match self {
            LedgerError::Conflict { kind, .. } => Some(*kind),
            LedgerError::Rejected(message) => classify_ledger_message(message),
        }
    }
}

impl From<rusqlite::Error> for LedgerError {
    fn from(e: rusqlite::Error) -> Self {
        LedgerError::Rejected(e.to_string())
    }
}

/// The single place where ledger error text is mapped to a conflict kind.
pub fn classify_ledger_message(message: &str) -> Option<ConflictKind> {
    if message.contains("No Employee found") {
        Some(ConflictKind::EmployeeNotFound)
    } else if message.contains("Inactive Employee") {
        Some(ConflictKind::InactiveEmployee)
    } else if message.contains("Duplicate Employee Checkin") {
        Some(ConflictKind::DuplicateCheckin)
    } else {
        None
    }
}

/// Accepts one attendance event at a time.
pub trait CheckinLedger {
    /// Record a checkin; returns the ledger row id.
    fn add_checkin(
        &mut self,
        employee_field_value: &str,
        timestamp: NaiveDateTime,
        device_id: &str,
        direction: Option<Direction>,
    ) -> Result<i64, LedgerError>;
}
