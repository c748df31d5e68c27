use crate::cli::commands::open_db;
use crate::cli::parser::{Commands, DeviceCommands};
use crate::config::Config;
use crate::db::log::record;
use crate::db::queries::{delete_device, insert_device, link_shift, list_devices};
use crate::errors::{AppError, AppResult};
use crate::models::device::Device;
use crate::models::direction::DirectionPolicy;
use crate::ui::messages::{info, success};
use crate::utils::colors::{CYAN, RESET, colorize_missing};
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Device { action } = cmd else {
        return Ok(());
    };
    let pool = open_db(cfg)?;
    let conn = &pool.conn;

    match action {
        DeviceCommands::Add {
            device_id,
            ip_address,
            port,
            direction,
            clear,
            shifts,
        } => {
            let policy = DirectionPolicy::from_code(direction)
                .ok_or_else(|| AppError::InvalidDirection(direction.clone()))?;
            let device = Device::new(device_id, ip_address, *port, policy, *clear, shifts.clone())?;
            insert_device(conn, &device)?;
            record(
                conn,
                "device_add",
                &device.device_id,
                &format!("{}:{} ({})", device.ip_address, device.port, policy.to_db_str()),
            );
            success(format!("Device {} added", device.device_id));
        }

        DeviceCommands::List => {
            let devices = list_devices(conn)?;
            if devices.is_empty() {
                info("No devices configured.");
                return Ok(());
            }
            let mut table = Table::new(["DEVICE ID", "ADDRESS", "DIRECTION", "CLEAR", "SHIFTS"]);
            for d in devices {
                let shifts = if d.shift_types.is_empty() {
                    colorize_missing("--")
                } else {
                    d.shift_types.join(", ")
                };
                table.add_row(vec![
                    format!("{CYAN}{}{RESET}", d.device_id),
                    format!("{}:{}", d.ip_address, d.port),
                    d.punch_direction.to_db_str().to_string(),
                    if d.clear_on_fetch { "yes" } else { "no" }.to_string(),
                    shifts,
                ]);
            }
            print!("{}", table.render());
        }

        DeviceCommands::Del { device_id } => {
            if !delete_device(conn, device_id)? {
                return Err(AppError::DeviceNotFound(device_id.clone()));
            }
            record(conn, "device_del", device_id, "Device removed");
            success(format!("Device {} removed", device_id));
        }

        DeviceCommands::Link { device_id, shift } => {
            link_shift(conn, device_id, shift)?;
            record(conn, "device_link", device_id, &format!("Linked shift {}", shift));
            success(format!("Shift {} linked to {}", shift, device_id));
        }
    }

    Ok(())
}
