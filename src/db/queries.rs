use crate::db::models::ShiftType;
use crate::errors::{AppError, AppResult};
use crate::models::device::Device;
use crate::models::direction::DirectionPolicy;
use crate::utils::date::{format_ts, parse_ts};
use chrono::{Local, NaiveDateTime};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

const DEVICE_COLUMNS: &str =
    "id, device_id, ip_address, port, punch_direction, clear_from_device_on_fetch";

fn conversion_error(e: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
}

/// Map a `devices` row. Shift links are loaded separately.
pub fn map_device_row(row: &Row) -> Result<Device> {
    let dir_str: String = row.get("punch_direction")?;
    let punch_direction = DirectionPolicy::from_db_str(&dir_str)
        .ok_or_else(|| conversion_error(AppError::InvalidDirection(dir_str.clone())))?;

    let port: i64 = row.get("port")?;
    let port = u16::try_from(port)
        .map_err(|_| conversion_error(AppError::Config(format!("invalid port {port}"))))?;

    Ok(Device {
        id: row.get("id")?,
        device_id: row.get("device_id")?,
        ip_address: row.get("ip_address")?,
        port,
        punch_direction,
        clear_on_fetch: row.get::<_, i32>("clear_from_device_on_fetch")? == 1,
        shift_types: Vec::new(),
    })
}

fn load_shift_links(conn: &Connection, device_pk: i64) -> Result<Vec<String>> {
    let mut stmt = conn.prepare_cached(
        "SELECT shift_type FROM device_shifts WHERE device = ?1 ORDER BY rowid ASC",
    )?;
    let rows = stmt.query_map([device_pk], |r| r.get::<_, String>(0))?;
    rows.collect()
}

fn with_links(conn: &Connection, mut device: Device) -> Result<Device> {
    device.shift_types = load_shift_links(conn, device.id)?;
    Ok(device)
}

pub fn shift_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt = conn.prepare_cached("SELECT 1 FROM shift_types WHERE name = ?1")?;
    stmt.exists([name])
}

/// Insert a device and its shift links atomically. Returns the new row id.
pub fn insert_device(conn: &Connection, device: &Device) -> AppResult<i64> {
    if find_device(conn, &device.device_id)?.is_some() {
        return Err(AppError::DeviceExists(device.device_id.clone()));
    }
    for shift in &device.shift_types {
        if !shift_exists(conn, shift)? {
            return Err(AppError::ShiftNotFound(shift.clone()));
        }
    }

    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT INTO devices (device_id, ip_address, port, punch_direction, clear_from_device_on_fetch, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            device.device_id,
            device.ip_address,
            device.port,
            device.punch_direction.to_db_str(),
            if device.clear_on_fetch { 1 } else { 0 },
            Local::now().to_rfc3339(),
        ],
    )?;
    let id = tx.last_insert_rowid();

    for shift in &device.shift_types {
        tx.execute(
            "INSERT OR IGNORE INTO device_shifts (device, shift_type) VALUES (?1, ?2)",
            params![id, shift],
        )?;
    }

    tx.commit()?;
    Ok(id)
}

/// All configured devices, in enumeration (creation) order.
pub fn list_devices(conn: &Connection) -> AppResult<Vec<Device>> {
    let sql = format!("SELECT {DEVICE_COLUMNS} FROM devices ORDER BY id ASC");
    let devices: Vec<Device> = {
        let mut stmt = conn.prepare_cached(&sql)?;
        let rows = stmt.query_map([], map_device_row)?;
        rows.collect::<Result<Vec<_>>>()?
    };

    let mut out = Vec::with_capacity(devices.len());
    for d in devices {
        out.push(with_links(conn, d)?);
    }
    Ok(out)
}

pub fn find_device(conn: &Connection, device_id: &str) -> AppResult<Option<Device>> {
    let sql = format!("SELECT {DEVICE_COLUMNS} FROM devices WHERE device_id = ?1");
    let found = {
        let mut stmt = conn.prepare_cached(&sql)?;
        stmt.query_row([device_id], map_device_row).optional()?
    };

    match found {
        Some(d) => Ok(Some(with_links(conn, d)?)),
        None => Ok(None),
    }
}

/// Delete a device and its shift links. Returns false when it did not exist.
pub fn delete_device(conn: &Connection, device_id: &str) -> AppResult<bool> {
    let Some(device) = find_device(conn, device_id)? else {
        return Ok(false);
    };

    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM device_shifts WHERE device = ?1", [device.id])?;
    tx.execute("DELETE FROM devices WHERE id = ?1", [device.id])?;
    tx.commit()?;
    Ok(true)
}

/// Link an existing shift type to an existing device (no-op if already linked).
pub fn link_shift(conn: &Connection, device_id: &str, shift: &str) -> AppResult<()> {
    let device =
        find_device(conn, device_id)?.ok_or_else(|| AppError::DeviceNotFound(device_id.into()))?;
    if !shift_exists(conn, shift)? {
        return Err(AppError::ShiftNotFound(shift.to_string()));
    }

    conn.execute(
        "INSERT OR IGNORE INTO device_shifts (device, shift_type) VALUES (?1, ?2)",
        params![device.id, shift],
    )?;
    Ok(())
}

/// Create a shift type. Returns false when it already existed.
pub fn insert_shift_type(conn: &Connection, name: &str) -> AppResult<bool> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Config("shift type name must not be empty".into()));
    }
    let n = conn.execute(
        "INSERT OR IGNORE INTO shift_types (name) VALUES (?1)",
        [name],
    )?;
    Ok(n == 1)
}

pub fn list_shift_types(conn: &Connection) -> AppResult<Vec<ShiftType>> {
    let mut stmt =
        conn.prepare_cached("SELECT name, last_sync_of_checkin FROM shift_types ORDER BY name")?;
    let rows = stmt.query_map([], |r| {
        let last: Option<String> = r.get(1)?;
        Ok(ShiftType {
            name: r.get(0)?,
            last_sync_of_checkin: last.as_deref().and_then(parse_ts),
        })
    })?;

    Ok(rows.collect::<Result<Vec<_>>>()?)
}

/// Stamp `last_sync_of_checkin` on every given shift type and commit.
pub fn update_shift_sync_timestamps(
    conn: &Connection,
    shift_types: &[String],
    now: NaiveDateTime,
) -> AppResult<()> {
    let stamp = format_ts(&now);
    let tx = conn.unchecked_transaction()?;
    {
        let mut stmt =
            tx.prepare_cached("UPDATE shift_types SET last_sync_of_checkin = ?1 WHERE name = ?2")?;
        for shift in shift_types {
            stmt.execute(params![stamp, shift])?;
        }
    }
    tx.commit()?;
    Ok(())
}

/// Latest sync across all shift types linked to the device.
pub fn max_last_sync_for_device(
    conn: &Connection,
    device_id: &str,
) -> AppResult<Option<NaiveDateTime>> {
    let mut stmt = conn.prepare_cached(
        "SELECT MAX(st.last_sync_of_checkin)
         FROM shift_types st
         INNER JOIN device_shifts ds ON ds.shift_type = st.name
         INNER JOIN devices d ON d.id = ds.device
         WHERE d.device_id = ?1",
    )?;
    let last: Option<String> = stmt.query_row([device_id], |r| r.get(0))?;
    Ok(last.as_deref().and_then(parse_ts))
}
