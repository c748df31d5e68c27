use crate::config::SyncSettings;
use crate::core::filter::filter_by_cutoff;
use crate::core::normalize::to_event;
use crate::core::reconcile::{ReconcileReport, reconcile};
use crate::db::log::{OP_DEVICE_ERROR, OP_SYNC, OP_SYNC_ERROR, record, record_error};
use crate::db::queries::{list_devices, update_shift_sync_timestamps};
use crate::device::client::DeviceClient;
use crate::device::{DEFAULT_TIMEOUT, DeviceConnector};
use crate::errors::{AppError, AppResult};
use crate::ledger::CheckinLedger;
use crate::models::device::Device;
use crate::models::punch::NormalizedEvent;
use crate::ui::messages::{header, info, success, warning};
use crate::utils::date;
use chrono::NaiveDateTime;
use rusqlite::Connection;
use std::fs;
use std::time::Duration;

/// Result of one device's pipeline inside a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSummary {
    pub device_id: String,
    pub fetched: usize,
    pub kept: usize,
    pub report: ReconcileReport,
    /// `None` when nothing was fetched: shift timestamps are left alone.
    pub synced_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceOutcome {
    Synced(DeviceSummary),
    Failed { device_id: String, error: String },
}

impl DeviceOutcome {
    pub fn device_id(&self) -> &str {
        match self {
            DeviceOutcome::Synced(s) => &s.device_id,
            DeviceOutcome::Failed { device_id, .. } => device_id,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, DeviceOutcome::Failed { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// False when sync is disabled in the settings.
    pub ran: bool,
    pub outcomes: Vec<DeviceOutcome>,
}

/// Drives fetch → filter → normalize → reconcile → stamp for every device.
pub struct SyncOrchestrator<'a, C: DeviceConnector, L: CheckinLedger> {
    conn: &'a Connection,
    connector: &'a C,
    ledger: &'a mut L,
    timeout: Duration,
}

impl<'a, C: DeviceConnector, L: CheckinLedger> SyncOrchestrator<'a, C, L> {
    pub fn new(conn: &'a Connection, connector: &'a C, ledger: &'a mut L) -> Self {
        Self {
            conn,
            connector,
            ledger,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run one cycle over all configured devices, in enumeration order.
    ///
    /// Device and record failures are logged and never abort the cycle; only
    /// failures before the first device (logs directory, device list) are
    /// returned as errors.
    pub fn run_sync_cycle(&mut self, settings: &SyncSettings) -> AppResult<CycleReport> {
        if !settings.enabled {
            info("Biometric sync is disabled, nothing to do.");
            return Ok(CycleReport::default());
        }

        fs::create_dir_all(settings.logs_path())?;

        let devices = list_devices(self.conn)?;
        let mut report = CycleReport {
            ran: true,
            outcomes: Vec::with_capacity(devices.len()),
        };

        for device in &devices {
            header(format!("{} ({}:{})", device.device_id, device.ip_address, device.port));

            let outcome = match self.sync_device(device, settings) {
                Ok(summary) => DeviceOutcome::Synced(summary),
                Err(e) => {
                    let operation = match &e {
                        AppError::Device(d) => {
                            if d.is_retryable() {
                                info("Device will be retried on the next cycle.");
                            }
                            OP_DEVICE_ERROR
                        }
                        _ => OP_SYNC_ERROR,
                    };
                    let message = format!(
                        "Error syncing attendance for device {}: {}",
                        device.device_id, e
                    );
                    record_error(self.conn, operation, &device.device_id, &message);
                    DeviceOutcome::Failed {
                        device_id: device.device_id.clone(),
                        error: e.to_string(),
                    }
                }
            };
            report.outcomes.push(outcome);
        }

        Ok(report)
    }

    fn sync_device(&mut self, device: &Device, settings: &SyncSettings) -> AppResult<DeviceSummary> {
        let pulled = DeviceClient::new(self.connector)
            .with_timeout(self.timeout)
            .fetch(device);

        // A failed release may leave capture disabled on the device.
        for e in &pulled.release_failures {
            record_error(
                self.conn,
                OP_DEVICE_ERROR,
                &device.device_id,
                &format!("Error releasing device {}: {}", device.device_id, e),
            );
        }
        let records = pulled.records?;

        let fetched = records.len();
        if fetched == 0 {
            info("No new punches on device.");
            return Ok(DeviceSummary {
                device_id: device.device_id.clone(),
                fetched: 0,
                kept: 0,
                report: ReconcileReport::default(),
                synced_at: None,
            });
        }

        let kept = filter_by_cutoff(records, settings.import_start_date);
        let events: Vec<NormalizedEvent> = kept.iter().map(|r| to_event(r, device)).collect();

        let outcome = reconcile(&mut *self.ledger, self.conn, device, &events, settings);

        // Stamped even when some events were rejected: rejections live in the error log.
        let now = date::now();
        update_shift_sync_timestamps(self.conn, &device.shift_types, now)?;

        let line = format!(
            "fetched {}, kept {}, submitted {}, suppressed {}, failed {}",
            fetched,
            events.len(),
            outcome.submitted,
            outcome.suppressed,
            outcome.failed
        );
        record(self.conn, OP_SYNC, &device.device_id, &line);
        if outcome.is_clean() {
            success(line);
        } else {
            warning(line);
        }

        Ok(DeviceSummary {
            device_id: device.device_id.clone(),
            fetched,
            kept: events.len(),
            report: outcome,
            synced_at: Some(now),
        })
    }
}
