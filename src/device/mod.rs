//! Device access layer.
//!
//! The vendor wire protocol is hidden behind [`DeviceConnector`] and
//! [`DeviceConnection`]; [`client::DeviceClient`] drives the fetch protocol
//! (disable capture, read, optional clear, guaranteed re-enable) on top of them.

pub mod bridge;
pub mod client;

use crate::models::punch::RawPunchRecord;
use std::time::Duration;
use thiserror::Error;

/// Network timeout for connect and every request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// Transport failure: refused, timed out, reset.
    #[error("device {address} unreachable: {reason}")]
    Unreachable { address: String, reason: String },

    /// The device answered but the exchange failed.
    #[error("device protocol error: {0}")]
    Protocol(String),
}

impl DeviceError {
    /// Transport failures may succeed on the next cycle, protocol failures usually won't.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DeviceError::Unreachable { .. })
    }
}

/// An open session with one time clock.
pub trait DeviceConnection {
    fn disable_capture(&mut self) -> Result<(), DeviceError>;
    fn read_all(&mut self) -> Result<Vec<RawPunchRecord>, DeviceError>;
    fn clear(&mut self) -> Result<(), DeviceError>;
    fn enable_capture(&mut self) -> Result<(), DeviceError>;
    fn disconnect(&mut self) -> Result<(), DeviceError>;
}

/// Opens connections to time clocks.
pub trait DeviceConnector {
    type Connection: DeviceConnection;

    fn connect(
        &self,
        address: &str,
        port: u16,
        timeout: Duration,
    ) -> Result<Self::Connection, DeviceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transport_failures_are_retryable() {
        let unreachable = DeviceError::Unreachable {
            address: "10.0.0.1:4370".into(),
            reason: "connection refused".into(),
        };
        assert!(unreachable.is_retryable());
        assert!(!DeviceError::Protocol("bad reply".into()).is_retryable());
    }
}
