#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use punchsync::device::bridge::{BridgeRequest, BridgeResponse};
use punchsync::models::punch::RawPunchRecord;
use std::env;
use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread;

/// Isolated workspace: its own HOME (config dir) and database file.
pub struct TestEnv {
    pub home: PathBuf,
    pub db: String,
}

impl TestEnv {
    pub fn new(name: &str) -> Self {
        let home = env::temp_dir().join(format!("punchsync_it_{}", name));
        fs::remove_dir_all(&home).ok();
        fs::create_dir_all(&home).expect("create test home");
        let db = home.join("punchsync.sqlite").to_string_lossy().to_string();
        Self { home, db }
    }

    /// `punchsync --db <db>` running with HOME pointing at the test dir
    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("punchsync");
        cmd.env("HOME", &self.home)
            .env("APPDATA", &self.home)
            .args(["--db", &self.db]);
        cmd
    }

    pub fn init(&self) {
        self.cmd().args(["--test", "init"]).assert().success();
    }

    pub fn config_dir(&self) -> PathBuf {
        if cfg!(target_os = "windows") {
            self.home.join("punchsync")
        } else {
            self.home.join(".punchsync")
        }
    }

    /// Write `punchsync.conf` with the given `sync:` section body.
    pub fn write_config(&self, sync_yaml: &str) {
        let dir = self.config_dir();
        fs::create_dir_all(&dir).expect("config dir");
        let body = format!("database: {}\nsync:\n{}", self.db, sync_yaml);
        fs::write(dir.join("punchsync.conf"), body).expect("write config");
    }
}

pub fn record(user: &str, timestamp: &str, punch: i32) -> RawPunchRecord {
    serde_json::from_value(serde_json::json!({
        "user_id": user,
        "timestamp": timestamp,
        "punch": punch,
    }))
    .expect("punch record")
}

/// A one-connection device bridge on localhost. Returns its port and the
/// commands it received (available after the thread is joined).
pub fn fake_bridge(
    records: Vec<RawPunchRecord>,
) -> (u16, Arc<Mutex<Vec<BridgeRequest>>>, thread::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_srv = Arc::clone(&seen);

    let handle = thread::spawn(move || {
        let Ok((stream, _)) = listener.accept() else {
            return;
        };
        let mut writer = stream.try_clone().expect("clone stream");
        for line in BufReader::new(stream).lines() {
            let Ok(line) = line else { break };
            let req: BridgeRequest = serde_json::from_str(&line).expect("request");
            seen_srv.lock().expect("lock").push(req);

            let resp = BridgeResponse {
                ok: true,
                records: if req == BridgeRequest::ReadAll {
                    records.clone()
                } else {
                    Vec::new()
                },
                error: None,
            };
            let mut out = serde_json::to_string(&resp).expect("response");
            out.push('\n');
            if writer.write_all(out.as_bytes()).is_err() || req == BridgeRequest::Disconnect {
                break;
            }
        }
    });

    (port, seen, handle)
}

/// A localhost port with nothing listening on it.
pub fn closed_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .expect("bind")
        .local_addr()
        .expect("addr")
        .port()
}
