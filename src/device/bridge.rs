//! Client for a time-clock bridge speaking newline-delimited JSON over TCP.
//!
//! Each request is one JSON object on its own line, `{"cmd":"read_all"}`,
//! answered by one line: `{"ok":true,"records":[...]}` or
//! `{"ok":false,"error":"..."}`.

use super::{DeviceConnection, DeviceConnector, DeviceError};
use crate::models::punch::RawPunchRecord;
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum BridgeRequest {
    DisableCapture,
    ReadAll,
    Clear,
    EnableCapture,
    Disconnect,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BridgeResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub records: Vec<RawPunchRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Opens TCP sessions with a bridge.
#[derive(Debug, Default, Clone, Copy)]
pub struct BridgeConnector;

pub struct BridgeConnection {
    address: String,
    timeout: Duration,
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

/// Upper bound on one reply line.
pub const MAX_REPLY_BYTES: usize = 4 * 1024 * 1024;

fn resolve(address: &str, port: u16) -> Result<SocketAddr, DeviceError> {
    let unreachable = |reason: String| DeviceError::Unreachable {
        address: format!("{address}:{port}"),
        reason,
    };
    (address, port)
        .to_socket_addrs()
        .map_err(|e| unreachable(e.to_string()))?
        .next()
        .ok_or_else(|| unreachable("address did not resolve".into()))
}

fn transport(address: &str, e: io::Error) -> DeviceError {
    DeviceError::Unreachable {
        address: address.to_string(),
        reason: e.to_string(),
    }
}

impl DeviceConnector for BridgeConnector {
    type Connection = BridgeConnection;

    fn connect(
        &self,
        address: &str,
        port: u16,
        timeout: Duration,
    ) -> Result<BridgeConnection, DeviceError> {
        if timeout.is_zero() {
            return Err(DeviceError::Protocol("timeout must be greater than zero".into()));
        }
        let addr = resolve(address, port)?;
        let unreachable = |e: io::Error| transport(&addr.to_string(), e);

        let stream = TcpStream::connect_timeout(&addr, timeout).map_err(unreachable)?;
        let writer = stream.try_clone().map_err(unreachable)?;

        Ok(BridgeConnection {
            address: addr.to_string(),
            timeout,
            reader: BufReader::new(stream),
            writer,
        })
    }
}

impl BridgeConnection {
    /// Time left before `deadline`, or `Unreachable` once it has passed.
    fn remaining(&self, deadline: Instant, req: BridgeRequest) -> Result<Duration, DeviceError> {
        let left = deadline.saturating_duration_since(Instant::now());
        if left.is_zero() {
            return Err(DeviceError::Unreachable {
                address: self.address.clone(),
                reason: format!("no complete reply to {req:?} within {:?}", self.timeout),
            });
        }
        Ok(left)
    }

    /// Read one newline-terminated reply, bounded by `deadline` and [`MAX_REPLY_BYTES`].
    fn read_reply(&mut self, deadline: Instant, req: BridgeRequest) -> Result<String, DeviceError> {
        let mut line = Vec::new();
        loop {
            let left = self.remaining(deadline, req)?;
            self.reader
                .get_ref()
                .set_read_timeout(Some(left))
                .map_err(|e| transport(&self.address, e))?;

            let (used, done) = {
                let available = match self.reader.fill_buf() {
                    Ok(buf) => buf,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(transport(&self.address, e)),
                };
                if available.is_empty() {
                    return Err(DeviceError::Protocol(format!(
                        "bridge closed the connection during {req:?}"
                    )));
                }
                match available.iter().position(|b| *b == b'\n') {
                    Some(i) => {
                        line.extend_from_slice(&available[..i]);
                        (i + 1, true)
                    }
                    None => {
                        line.extend_from_slice(available);
                        (available.len(), false)
                    }
                }
            };
            self.reader.consume(used);

            if line.len() > MAX_REPLY_BYTES {
                return Err(DeviceError::Protocol(format!(
                    "reply to {req:?} exceeds {MAX_REPLY_BYTES} bytes"
                )));
            }
            if done {
                break;
            }
        }

        String::from_utf8(line)
            .map_err(|e| DeviceError::Protocol(format!("reply to {req:?} is not UTF-8: {e}")))
    }

    fn request(&mut self, req: BridgeRequest) -> Result<BridgeResponse, DeviceError> {
        let deadline = Instant::now() + self.timeout;

        let mut line = serde_json::to_string(&req)
            .map_err(|e| DeviceError::Protocol(format!("cannot encode request: {e}")))?;
        line.push('\n');

        let left = self.remaining(deadline, req)?;
        self.writer
            .set_write_timeout(Some(left))
            .and_then(|_| self.writer.write_all(line.as_bytes()))
            .and_then(|_| self.writer.flush())
            .map_err(|e| transport(&self.address, e))?;

        let reply = self.read_reply(deadline, req)?;
        let resp: BridgeResponse = serde_json::from_str(reply.trim_end())
            .map_err(|e| DeviceError::Protocol(format!("malformed reply to {req:?}: {e}")))?;

        if !resp.ok {
            return Err(DeviceError::Protocol(
                resp.error.unwrap_or_else(|| format!("{req:?} rejected")),
            ));
        }
        Ok(resp)
    }
}

impl DeviceConnection for BridgeConnection {
    fn disable_capture(&mut self) -> Result<(), DeviceError> {
        self.request(BridgeRequest::DisableCapture).map(|_| ())
    }

    fn read_all(&mut self) -> Result<Vec<RawPunchRecord>, DeviceError> {
        self.request(BridgeRequest::ReadAll).map(|r| r.records)
    }

    fn clear(&mut self) -> Result<(), DeviceError> {
        self.request(BridgeRequest::Clear).map(|_| ())
    }

    fn enable_capture(&mut self) -> Result<(), DeviceError> {
        self.request(BridgeRequest::EnableCapture).map(|_| ())
    }

    fn disconnect(&mut self) -> Result<(), DeviceError> {
        let res = self.request(BridgeRequest::Disconnect).map(|_| ());
        let _ = self.writer.shutdown(std::net::Shutdown::Both);
        res
    }
}
