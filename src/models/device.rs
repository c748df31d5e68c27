use super::direction::DirectionPolicy;
use crate::errors::{AppError, AppResult};
use serde::Serialize;

/// Default TCP port of ZKTeco-compatible time clocks.
pub const DEFAULT_PORT: u16 = 4370;

/// A configured biometric time clock.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Device {
    pub id: i64,                           // ⇔ devices.id
    pub device_id: String,                 // ⇔ devices.device_id (user facing identifier)
    pub ip_address: String,                // ⇔ devices.ip_address (dotted quad)
    pub port: u16,                         // ⇔ devices.port
    pub punch_direction: DirectionPolicy,  // ⇔ devices.punch_direction ('IN','OUT','AUTO')
    pub clear_on_fetch: bool,              // ⇔ devices.clear_from_device_on_fetch
    pub shift_types: Vec<String>,          // ⇔ device_shifts.shift_type
}

impl Device {
    /// Build a new (not yet persisted) device, validating the address first.
    pub fn new(
        device_id: &str,
        ip_address: &str,
        port: u16,
        punch_direction: DirectionPolicy,
        clear_on_fetch: bool,
        shift_types: Vec<String>,
    ) -> AppResult<Self> {
        let device_id = device_id.trim();
        if device_id.is_empty() {
            return Err(AppError::Config("device id must not be empty".into()));
        }
        validate_ip_address(ip_address)?;

        Ok(Self {
            id: 0,
            device_id: device_id.to_string(),
            ip_address: ip_address.trim().to_string(),
            port,
            punch_direction,
            clear_on_fetch,
            shift_types,
        })
    }
}

/// Accept only dotted quads with four numeric octets in 0..=255.
pub fn validate_ip_address(address: &str) -> AppResult<()> {
    let invalid = || AppError::InvalidAddress(address.to_string());

    let parts: Vec<&str> = address.trim().split('.').collect();
    if parts.len() != 4 {
        return Err(invalid());
    }

    for part in parts {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let octet: u32 = part.parse().map_err(|_| invalid())?;
        if octet > 255 {
            return Err(invalid());
        }
    }

    Ok(())
}
