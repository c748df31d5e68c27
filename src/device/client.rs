use super::{DEFAULT_TIMEOUT, DeviceConnection, DeviceConnector, DeviceError};
use crate::models::device::Device;
use crate::models::punch::RawPunchRecord;
use crate::ui::messages::warning;
use std::time::Duration;

/// Capture is disabled for the lifetime of the session.
///
/// [`CaptureSession::release`] re-enables capture and disconnects, each step
/// attempted exactly once, and hands the failures back to the caller. A
/// session dropped without `release` (panic unwinding) releases itself and
/// can only warn on the console.
pub struct CaptureSession<T: DeviceConnection> {
    conn: T,
    device_id: String,
    released: bool,
}

impl<T: DeviceConnection> CaptureSession<T> {
    /// Take ownership of an open connection. No I/O happens here.
    pub fn open(conn: T, device_id: &str) -> Self {
        Self {
            conn,
            device_id: device_id.to_string(),
            released: false,
        }
    }

    pub fn disable_capture(&mut self) -> Result<(), DeviceError> {
        self.conn.disable_capture()
    }

    pub fn read_all(&mut self) -> Result<Vec<RawPunchRecord>, DeviceError> {
        self.conn.read_all()
    }

    /// Wipe the device buffer. Irreversible.
    pub fn clear(&mut self) -> Result<(), DeviceError> {
        self.conn.clear()
    }

    fn release_once(&mut self) -> Vec<DeviceError> {
        if self.released {
            return Vec::new();
        }
        self.released = true;

        let mut failures = Vec::new();
        if let Err(e) = self.conn.enable_capture() {
            failures.push(e);
        }
        if let Err(e) = self.conn.disconnect() {
            failures.push(e);
        }
        failures
    }

    /// Re-enable capture and disconnect. Returns what failed, in order.
    pub fn release(mut self) -> Vec<DeviceError> {
        self.release_once()
    }
}

impl<T: DeviceConnection> Drop for CaptureSession<T> {
    fn drop(&mut self) {
        for e in self.release_once() {
            warning(format!("Could not release device {}: {}", self.device_id, e));
        }
    }
}

/// Result of one fetch: the records (or the error that ended the session)
/// plus every failure hit while releasing the device.
#[derive(Debug)]
pub struct FetchOutcome {
    pub records: Result<Vec<RawPunchRecord>, DeviceError>,
    pub release_failures: Vec<DeviceError>,
}

/// Fetches buffered punches from a device.
pub struct DeviceClient<'a, C: DeviceConnector> {
    connector: &'a C,
    timeout: Duration,
}

fn drain<T: DeviceConnection>(
    session: &mut CaptureSession<T>,
    clear: bool,
) -> Result<Vec<RawPunchRecord>, DeviceError> {
    session.disable_capture()?;
    let records = session.read_all()?;
    if clear {
        session.clear()?;
    }
    Ok(records)
}

impl<'a, C: DeviceConnector> DeviceClient<'a, C> {
    pub fn new(connector: &'a C) -> Self {
        Self {
            connector,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// connect → disable capture → read → clear (if configured) → release.
    ///
    /// Release runs once connected, whatever happened before it; its
    /// failures never replace the fetch result.
    pub fn fetch(&self, device: &Device) -> FetchOutcome {
        let conn = match self
            .connector
            .connect(&device.ip_address, device.port, self.timeout)
        {
            Ok(conn) => conn,
            Err(e) => {
                return FetchOutcome {
                    records: Err(e),
                    release_failures: Vec::new(),
                };
            }
        };

        let mut session = CaptureSession::open(conn, &device.device_id);
        let records = drain(&mut session, device.clear_on_fetch);
        let release_failures = session.release();

        FetchOutcome {
            records,
            release_failures,
        }
    }

    /// [`fetch`](Self::fetch) with release failures only shown as warnings.
    pub fn fetch_records(&self, device: &Device) -> Result<Vec<RawPunchRecord>, DeviceError> {
        let outcome = self.fetch(device);
        for e in &outcome.release_failures {
            warning(format!("Could not release device {}: {}", device.device_id, e));
        }
        outcome.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::direction::DirectionPolicy;
    use chrono::NaiveDate;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Calls {
        log: Vec<&'static str>,
    }

    impl Calls {
        fn count(&self, name: &str) -> usize {
            self.log.iter().filter(|c| **c == name).count()
        }
    }

    #[derive(Default, Clone, Copy)]
    struct Faults {
        refuse: bool,
        disable: bool,
        read: bool,
        clear: bool,
        enable: bool,
    }

    struct FakeConn {
        calls: Rc<RefCell<Calls>>,
        faults: Faults,
    }

    fn fail(flag: bool, what: &str) -> Result<(), DeviceError> {
        if flag {
            Err(DeviceError::Protocol(format!("{what} failed")))
        } else {
            Ok(())
        }
    }

    impl DeviceConnection for FakeConn {
        fn disable_capture(&mut self) -> Result<(), DeviceError> {
            self.calls.borrow_mut().log.push("disable");
            fail(self.faults.disable, "disable")
        }
        fn read_all(&mut self) -> Result<Vec<RawPunchRecord>, DeviceError> {
            self.calls.borrow_mut().log.push("read");
            fail(self.faults.read, "read")?;
            Ok(vec![RawPunchRecord {
                user_id: "7".into(),
                timestamp: NaiveDate::from_ymd_opt(2025, 1, 2)
                    .unwrap()
                    .and_hms_opt(9, 0, 0)
                    .unwrap(),
                punch_code: 0,
                status: 1,
                uid: 1,
            }])
        }
        fn clear(&mut self) -> Result<(), DeviceError> {
            self.calls.borrow_mut().log.push("clear");
            fail(self.faults.clear, "clear")
        }
        fn enable_capture(&mut self) -> Result<(), DeviceError> {
            self.calls.borrow_mut().log.push("enable");
            fail(self.faults.enable, "enable")
        }
        fn disconnect(&mut self) -> Result<(), DeviceError> {
            self.calls.borrow_mut().log.push("disconnect");
            Ok(())
        }
    }

    struct FakeConnector {
        calls: Rc<RefCell<Calls>>,
        faults: Faults,
    }

    impl FakeConnector {
        fn new(faults: Faults) -> Self {
            Self {
                calls: Rc::new(RefCell::new(Calls::default())),
                faults,
            }
        }
    }

    impl DeviceConnector for FakeConnector {
        type Connection = FakeConn;

        fn connect(&self, address: &str, port: u16, _: Duration) -> Result<FakeConn, DeviceError> {
            if self.faults.refuse {
                return Err(DeviceError::Unreachable {
                    address: format!("{address}:{port}"),
                    reason: "refused".into(),
                });
            }
            Ok(FakeConn {
                calls: Rc::clone(&self.calls),
                faults: self.faults,
            })
        }
    }

    fn device(clear: bool) -> Device {
        Device::new("D1", "10.0.0.1", 4370, DirectionPolicy::Auto, clear, vec![]).unwrap()
    }

    #[test]
    fn happy_path_brackets_the_read() {
        let connector = FakeConnector::new(Faults::default());
        let records = DeviceClient::new(&connector).fetch_records(&device(false)).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(
            connector.calls.borrow().log,
            ["disable", "read", "enable", "disconnect"]
        );
    }

    #[test]
    fn clear_only_when_configured() {
        let connector = FakeConnector::new(Faults::default());
        DeviceClient::new(&connector).fetch_records(&device(true)).unwrap();

        assert_eq!(
            connector.calls.borrow().log,
            ["disable", "read", "clear", "enable", "disconnect"]
        );
    }

    #[test]
    fn read_failure_still_releases_exactly_once() {
        let connector = FakeConnector::new(Faults {
            read: true,
            ..Faults::default()
        });
        let err = DeviceClient::new(&connector)
            .fetch_records(&device(true))
            .unwrap_err();

        assert_eq!(err, DeviceError::Protocol("read failed".into()));
        let calls = connector.calls.borrow();
        assert_eq!(calls.count("enable"), 1);
        assert_eq!(calls.count("disconnect"), 1);
        assert_eq!(calls.count("clear"), 0);
    }

    #[test]
    fn disable_and_clear_failures_release_the_device() {
        for faults in [
            Faults { disable: true, ..Faults::default() },
            Faults { clear: true, ..Faults::default() },
        ] {
            let connector = FakeConnector::new(faults);
            assert!(DeviceClient::new(&connector).fetch_records(&device(true)).is_err());

            let calls = connector.calls.borrow();
            assert_eq!(calls.count("enable"), 1);
            assert_eq!(calls.count("disconnect"), 1);
        }
    }

    #[test]
    fn enable_failure_does_not_mask_success_or_skip_disconnect() {
        let connector = FakeConnector::new(Faults {
            enable: true,
            ..Faults::default()
        });
        let records = DeviceClient::new(&connector).fetch_records(&device(false));

        assert!(records.is_ok());
        assert_eq!(connector.calls.borrow().count("disconnect"), 1);
    }

    #[test]
    fn enable_failure_does_not_mask_the_read_error() {
        let connector = FakeConnector::new(Faults {
            read: true,
            enable: true,
            ..Faults::default()
        });
        let err = DeviceClient::new(&connector)
            .fetch_records(&device(false))
            .unwrap_err();
        assert_eq!(err, DeviceError::Protocol("read failed".into()));
    }

    #[test]
    fn release_failures_are_handed_back_with_the_primary_error() {
        let connector = FakeConnector::new(Faults {
            read: true,
            enable: true,
            ..Faults::default()
        });
        let outcome = DeviceClient::new(&connector).fetch(&device(false));

        assert_eq!(outcome.records, Err(DeviceError::Protocol("read failed".into())));
        assert_eq!(
            outcome.release_failures,
            [DeviceError::Protocol("enable failed".into())]
        );
        assert_eq!(connector.calls.borrow().count("enable"), 1);
        assert_eq!(connector.calls.borrow().count("disconnect"), 1);
    }

    #[test]
    fn dropped_session_releases_once() {
        let connector = FakeConnector::new(Faults::default());
        let conn = connector.connect("10.0.0.1", 4370, DEFAULT_TIMEOUT).unwrap();
        {
            let mut session = CaptureSession::open(conn, "D1");
            session.disable_capture().unwrap();
        }
        let calls = connector.calls.borrow();
        assert_eq!(calls.count("enable"), 1);
        assert_eq!(calls.count("disconnect"), 1);
    }

    #[test]
    fn unreachable_device_never_touches_capture() {
        let connector = FakeConnector::new(Faults {
            refuse: true,
            ..Faults::default()
        });
        let err = DeviceClient::new(&connector)
            .fetch_records(&device(false))
            .unwrap_err();

        assert!(err.is_retryable());
        assert!(connector.calls.borrow().log.is_empty());
    }
}
