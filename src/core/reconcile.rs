use crate::config::SyncSettings;
use crate::db::log::{OP_CHECKIN_ERROR, record_error};
use crate::ledger::{CheckinLedger, ConflictKind};
use crate::models::device::Device;
use crate::models::punch::NormalizedEvent;
use rusqlite::Connection;
use serde::Serialize;

/// Per-batch outcome. Failures are also written to the error log.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub submitted: usize,
    pub suppressed: usize,
    pub failed: usize,
}

impl ReconcileReport {
    pub fn is_clean(&self) -> bool {
        self.suppressed == 0 && self.failed == 0
    }
}

pub fn should_suppress(kind: ConflictKind, settings: &SyncSettings) -> bool {
    match kind {
        ConflictKind::EmployeeNotFound => settings.ignore_employee_not_found,
        ConflictKind::InactiveEmployee => settings.ignore_inactive_employee,
        ConflictKind::DuplicateCheckin => settings.ignore_duplicate_checkin,
    }
}

/// Submit every event independently; one rejection never stops the batch.
pub fn reconcile<L: CheckinLedger + ?Sized>(
    ledger: &mut L,
    conn: &Connection,
    device: &Device,
    events: &[NormalizedEvent],
    settings: &SyncSettings,
) -> ReconcileReport {
    let mut report = ReconcileReport::default();

    for ev in events {
        let res = ledger.add_checkin(
            &ev.employee_field_value,
            ev.timestamp,
            &ev.device_id,
            ev.direction,
        );

        let Err(e) = res else {
            report.submitted += 1;
            continue;
        };

        match e.conflict_kind() {
            Some(kind) if should_suppress(kind, settings) => report.suppressed += 1,
            _ => {
                report.failed += 1;
                record_error(
                    conn,
                    OP_CHECKIN_ERROR,
                    &device.device_id,
                    &format!(
                        "Error processing attendance log for device {}, user {}: {}",
                        device.device_id, ev.employee_field_value, e
                    ),
                );
            }
        }
    }

    report
}
