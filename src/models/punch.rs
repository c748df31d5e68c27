use super::direction::Direction;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A punch as read from the device buffer. Never persisted as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawPunchRecord {
    pub user_id: String,
    pub timestamp: NaiveDateTime,
    #[serde(alias = "punch")]
    pub punch_code: i32,
    #[serde(default)]
    pub status: i32,
    #[serde(default)]
    pub uid: u32,
}

/// A punch ready for submission to the checkin ledger.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NormalizedEvent {
    pub employee_field_value: String,
    pub timestamp: NaiveDateTime,
    pub device_id: String,
    pub direction: Option<Direction>, // None → unmapped punch code, ledger decides
}
