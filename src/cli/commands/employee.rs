use crate::cli::commands::open_db;
use crate::cli::parser::{Commands, EmployeeCommands};
use crate::config::Config;
use crate::errors::AppResult;
use crate::ledger::sqlite::{add_employee, list_checkins, list_employees};
use crate::ui::messages::{info, success};
use crate::utils::colors::{GREEN, RED, RESET, colorize_direction, colorize_missing};
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Employee { action } = cmd else {
        return Ok(());
    };
    let pool = open_db(cfg)?;

    match action {
        EmployeeCommands::Add {
            code,
            name,
            device_user,
            inactive,
        } => {
            add_employee(&pool.conn, code, name, device_user.as_deref(), !inactive)?;
            success(format!("Employee {} added", code.trim()));
        }

        EmployeeCommands::List => {
            let employees = list_employees(&pool.conn)?;
            if employees.is_empty() {
                info("No employees registered.");
                return Ok(());
            }
            let mut table = Table::new(["CODE", "NAME", "DEVICE USER", "STATUS"]);
            for e in employees {
                table.add_row(vec![
                    e.employee_code,
                    e.employee_name,
                    e.attendance_device_id
                        .unwrap_or_else(|| colorize_missing("--")),
                    if e.active {
                        format!("{GREEN}Active{RESET}")
                    } else {
                        format!("{RED}Inactive{RESET}")
                    },
                ]);
            }
            print!("{}", table.render());
        }

        EmployeeCommands::Checkins { device } => {
            let rows = list_checkins(&pool.conn, device.as_deref())?;
            if rows.is_empty() {
                info("No checkins recorded.");
                return Ok(());
            }
            let mut table = Table::new(["TIME", "EMPLOYEE", "DEVICE", "TYPE"]);
            for r in rows {
                table.add_row(vec![
                    r.time,
                    r.employee_code,
                    r.device_id.unwrap_or_else(|| colorize_missing("--")),
                    colorize_direction(r.log_type.as_deref()),
                ]);
            }
            print!("{}", table.render());
        }
    }

    Ok(())
}
