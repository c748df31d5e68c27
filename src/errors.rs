//! Unified application error type.
//! All modules (db, core, device, ledger, cli) return AppError so the
//! binary reports every failure through a single path.

use crate::device::DeviceError;
use crate::ledger::LedgerError;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid IP Address format: {0}")]
    InvalidAddress(String),

    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid punch direction: {0}")]
    InvalidDirection(String),

    // ---------------------------
    // Device / ledger
    // ---------------------------
    #[error(transparent)]
    Device(#[from] DeviceError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Biometric device not found: {0}")]
    DeviceNotFound(String),

    #[error("Biometric device already exists: {0}")]
    DeviceExists(String),

    #[error("Shift type not found: {0}")]
    ShiftNotFound(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
