pub mod config;
pub mod device;
pub mod employee;
pub mod init;
pub mod log;
pub mod shift;
pub mod status;
pub mod sync;

use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use std::path::Path;

/// Open the configured database with every migration applied.
pub(crate) fn open_db(cfg: &Config) -> AppResult<DbPool> {
    let pool = DbPool::new(&cfg.database)?;
    init_db(&pool.conn)?;
    Ok(pool)
}

/// Open the configured database for queries only: no file creation, no
/// migrations. `None` when the database does not exist or was never initialized.
pub(crate) fn open_db_read_only(cfg: &Config) -> AppResult<Option<DbPool>> {
    if !Path::new(&cfg.database).exists() {
        return Ok(None);
    }
    let pool = DbPool::open_read_only(&cfg.database)?;
    if !pool.has_tables(&["log", "devices", "device_shifts", "shift_types"])? {
        return Ok(None);
    }
    Ok(Some(pool))
}
