use crate::cli::commands::open_db_read_only;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::status::{get_status, render_status};
use crate::errors::AppResult;
use crate::ui::messages::info;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Status { json } = cmd else {
        return Ok(());
    };
    let statuses = match open_db_read_only(cfg)? {
        Some(pool) => get_status(&pool.conn)?,
        None => Vec::new(),
    };

    if *json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
        return Ok(());
    }
    if statuses.is_empty() {
        info("No devices configured.");
        return Ok(());
    }
    print!("{}", render_status(&statuses));
    Ok(())
}
