use crate::cli::commands::open_db;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::log::format_log;
use crate::db::log::load_entries;
use crate::errors::AppResult;
use crate::ui::messages::info;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Log {
        print,
        errors,
        device,
    } = cmd
    else {
        return Ok(());
    };

    if !(*print || *errors || device.is_some()) {
        info("Nothing to do: use --print, --errors or --device ID");
        return Ok(());
    }

    let pool = open_db(cfg)?;
    let entries = load_entries(&pool.conn, *errors, device.as_deref())?;
    if entries.is_empty() {
        info("Internal log is empty.");
        return Ok(());
    }

    println!("📜 Internal log:\n");
    for line in format_log(&entries) {
        println!("{}", line);
    }
    Ok(())
}
