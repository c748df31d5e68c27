use crate::cli::commands::open_db;
use crate::cli::parser::{Commands, ShiftCommands};
use crate::config::Config;
use crate::db::log::record;
use crate::db::queries::{insert_shift_type, list_shift_types};
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use crate::utils::colors::colorize_missing;
use crate::utils::date::format_ts;
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Shift { action } = cmd else {
        return Ok(());
    };
    let pool = open_db(cfg)?;

    match action {
        ShiftCommands::Add { name } => {
            if insert_shift_type(&pool.conn, name)? {
                record(&pool.conn, "shift_add", name.trim(), "Shift type added");
                success(format!("Shift type {} added", name.trim()));
            } else {
                warning(format!("Shift type {} already exists", name.trim()));
            }
        }
        ShiftCommands::List => {
            let shifts = list_shift_types(&pool.conn)?;
            if shifts.is_empty() {
                info("No shift types configured.");
                return Ok(());
            }
            let mut table = Table::new(["SHIFT TYPE", "LAST SYNC"]);
            for s in shifts {
                table.add_row(vec![
                    s.name,
                    s.last_sync_of_checkin
                        .as_ref()
                        .map(format_ts)
                        .unwrap_or_else(|| colorize_missing("Never")),
                ]);
            }
            print!("{}", table.render());
        }
    }

    Ok(())
}
