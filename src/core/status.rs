use crate::db::log::last_error_for;
use crate::db::queries::{list_devices, max_last_sync_for_device};
use crate::errors::AppResult;
use crate::models::status::DeviceSyncStatus;
use crate::utils::colors::{RED, RESET, colorize_missing};
use crate::utils::date::format_ts;
use crate::utils::table::Table;
use rusqlite::Connection;

/// Per-device sync state, one entry per configured device in configuration order.
///
/// Read-only: `last_sync` is the latest stamp of the device's shift types and
/// `last_error` the newest error row whose target mentions the device id.
pub fn get_status(conn: &Connection) -> AppResult<Vec<DeviceSyncStatus>> {
    let devices = list_devices(conn)?;
    let mut out = Vec::with_capacity(devices.len());

    for device in devices {
        let last_sync = max_last_sync_for_device(conn, &device.device_id)?;
        let last_error = last_error_for(conn, &device.device_id)?;
        out.push(DeviceSyncStatus {
            device_id: device.device_id,
            ip_address: device.ip_address,
            last_sync,
            last_error,
        });
    }

    Ok(out)
}

/// Human table of [`get_status`]; missing values render as "Never" / "--".
pub fn render_status(statuses: &[DeviceSyncStatus]) -> String {
    let mut table = Table::new(["DEVICE ID", "ADDRESS", "LAST SYNC", "LAST ERROR", "AT"]);
    for s in statuses {
        let last_sync = s
            .last_sync
            .as_ref()
            .map(format_ts)
            .unwrap_or_else(|| colorize_missing("Never"));
        let (error, at) = match &s.last_error {
            Some(e) => (format!("{RED}{}{RESET}", e.error), e.creation.clone()),
            None => (colorize_missing("--"), colorize_missing("--")),
        };
        table.add_row(vec![
            s.device_id.clone(),
            s.ip_address.clone(),
            last_sync,
            error,
            at,
        ]);
    }
    table.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::init_db;
    use crate::db::log::{OP_DEVICE_ERROR, OP_SYNC, ttlog};
    use crate::db::pool::DbPool;
    use crate::db::queries::{insert_device, insert_shift_type, update_shift_sync_timestamps};
    use crate::models::device::Device;
    use crate::models::direction::DirectionPolicy;
    use crate::utils::table::strip_ansi;
    use chrono::NaiveDate;

    fn setup() -> DbPool {
        let pool = DbPool::in_memory().unwrap();
        init_db(&pool.conn).unwrap();
        for shift in ["Morning", "Night"] {
            insert_shift_type(&pool.conn, shift).unwrap();
        }
        let a = Device::new(
            "GATE-A",
            "10.0.0.1",
            4370,
            DirectionPolicy::Auto,
            false,
            vec!["Morning".into(), "Night".into()],
        )
        .unwrap();
        let b = Device::new("GATE-B", "10.0.0.2", 4370, DirectionPolicy::In, false, vec![]).unwrap();
        insert_device(&pool.conn, &a).unwrap();
        insert_device(&pool.conn, &b).unwrap();
        pool
    }

    #[test]
    fn fresh_devices_have_no_sync_and_no_error() {
        let pool = setup();
        let status = get_status(&pool.conn).unwrap();

        assert_eq!(status.len(), 2);
        assert_eq!(status[0].device_id, "GATE-A");
        assert!(status.iter().all(|s| s.last_sync.is_none() && s.last_error.is_none()));
    }

    #[test]
    fn last_sync_is_the_max_over_linked_shifts() {
        let pool = setup();
        let early = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap().and_hms_opt(7, 0, 0).unwrap();
        let late = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap().and_hms_opt(7, 0, 0).unwrap();
        update_shift_sync_timestamps(&pool.conn, &["Morning".into()], early).unwrap();
        update_shift_sync_timestamps(&pool.conn, &["Night".into()], late).unwrap();

        let status = get_status(&pool.conn).unwrap();
        assert_eq!(status[0].last_sync, Some(late));
        assert_eq!(status[1].last_sync, None);
    }

    #[test]
    fn last_error_is_newest_error_row_for_the_device() {
        let pool = setup();
        ttlog(&pool.conn, OP_DEVICE_ERROR, "GATE-A", "connection refused").unwrap();
        ttlog(&pool.conn, OP_DEVICE_ERROR, "GATE-A", "timed out").unwrap();
        ttlog(&pool.conn, OP_SYNC, "GATE-A", "fetched 3").unwrap();

        let status = get_status(&pool.conn).unwrap();
        assert_eq!(status[0].last_error.as_ref().unwrap().error, "timed out");
        assert!(status[1].last_error.is_none());
    }

    #[test]
    fn rendered_table_shows_never_for_unsynced_devices() {
        let pool = setup();
        let out = strip_ansi(&render_status(&get_status(&pool.conn).unwrap()));
        assert!(out.contains("GATE-B"));
        assert!(out.contains("Never"));
    }
}
