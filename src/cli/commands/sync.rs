use crate::cli::commands::open_db;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::sync::{DeviceOutcome, SyncOrchestrator};
use crate::device::bridge::BridgeConnector;
use crate::errors::AppResult;
use crate::ledger::sqlite::SqliteLedger;
use crate::ui::messages::{info, success, warning};
use crate::utils::date::parse_date;
use std::time::Duration;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Sync { timeout, since } = cmd else {
        return Ok(());
    };

    let mut settings = cfg.sync.clone();
    if let Some(day) = since {
        settings.import_start_date = Some(parse_date(day)?);
    }

    let pool = open_db(cfg)?;
    let connector = BridgeConnector;
    let mut ledger = SqliteLedger::new(&pool.conn);

    let mut orchestrator = SyncOrchestrator::new(&pool.conn, &connector, &mut ledger);
    if let Some(secs) = timeout {
        orchestrator = orchestrator.with_timeout(Duration::from_secs(*secs));
    }

    let report = orchestrator.run_sync_cycle(&settings)?;
    if !report.ran {
        return Ok(());
    }
    if report.outcomes.is_empty() {
        info("No devices configured.");
        return Ok(());
    }

    let failed: Vec<&str> = report
        .outcomes
        .iter()
        .filter(|o| o.is_failed())
        .map(DeviceOutcome::device_id)
        .collect();

    println!();
    if failed.is_empty() {
        success(format!("Sync completed for {} device(s)", report.outcomes.len()));
    } else {
        warning(format!(
            "Sync completed, {} of {} device(s) failed: {}",
            failed.len(),
            report.outcomes.len(),
            failed.join(", ")
        ));
    }
    Ok(())
}
