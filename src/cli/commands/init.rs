use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::log::record;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped in test mode)
///  - the SQLite database and all pending migrations
pub fn handle(cli: &Cli) -> AppResult<()> {
    let db_path = Config::init_all(cli.db.as_deref(), cli.test)?;
    let db_path = db_path.to_string_lossy().to_string();

    info("Initializing punchsync…");
    info(format!("Config file : {}", Config::config_file().display()));
    info(format!("Database    : {}", db_path));

    let pool = DbPool::new(&db_path)?;
    let applied = init_db(&pool.conn)?;
    if applied == 0 {
        info("Schema already up to date");
    }

    record(
        &pool.conn,
        "init",
        "database",
        &format!("Database initialized at {}", db_path),
    );

    success(format!("Database initialized at {}", db_path));
    Ok(())
}
