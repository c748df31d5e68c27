use chrono::NaiveDateTime;
use serde::Serialize;

/// Most recent error-log entry referencing a device.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LastError {
    pub creation: String, // ⇔ log.date (ISO 8601)
    pub error: String,    // ⇔ log.message
}

/// Derived sync state of one device. Recomputed on every query.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DeviceSyncStatus {
    pub device_id: String,
    pub ip_address: String,
    pub last_sync: Option<NaiveDateTime>,
    pub last_error: Option<LastError>,
}
