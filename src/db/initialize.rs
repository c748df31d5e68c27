use crate::db::migrate::run_pending_migrations;
use crate::errors::AppResult;
use rusqlite::Connection;

/// Bring the schema up to date. Returns how many migrations were applied;
/// zero on an already current database.
pub fn init_db(conn: &Connection) -> AppResult<usize> {
    run_pending_migrations(conn)
}
