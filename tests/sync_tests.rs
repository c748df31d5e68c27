use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use punchsync::device::bridge::BridgeRequest;

mod common;
use common::{TestEnv, closed_port, fake_bridge, record};

fn seed(env: &TestEnv) {
    env.init();
    env.cmd().args(["shift", "add", "Day"]).assert().success();
    env.cmd()
        .args(["employee", "add", "E-001", "Ada", "--device-user", "101"])
        .assert()
        .success();
    env.cmd()
        .args(["employee", "add", "E-002", "Bob", "--device-user", "102", "--inactive"])
        .assert()
        .success();
}

#[test]
fn test_sync_imports_punches_and_stamps_status() {
    let env = TestEnv::new("sync_ok");
    seed(&env);

    let (port, seen, server) = fake_bridge(vec![
        record("101", "2025-03-03T08:00:00", 0),
        record("101", "2025-03-03T17:00:00", 1),
    ]);
    env.cmd()
        .args(["device", "add", "GATE-1", "127.0.0.1", "--port", &port.to_string(), "--shift", "Day"])
        .assert()
        .success();

    env.cmd()
        .args(["sync", "--timeout", "5"])
        .assert()
        .success()
        .stdout(contains("submitted 2"));
    server.join().expect("bridge thread");

    let seen = seen.lock().expect("lock");
    assert_eq!(seen.first(), Some(&BridgeRequest::DisableCapture));
    assert!(seen.contains(&BridgeRequest::EnableCapture));
    assert!(!seen.contains(&BridgeRequest::Clear));

    env.cmd()
        .args(["employee", "checkins", "--device", "GATE-1"])
        .assert()
        .success()
        .stdout(contains("2025-03-03 08:00:00").and(contains("IN")).and(contains("OUT")));

    env.cmd()
        .args(["status", "--json"])
        .assert()
        .success()
        .stdout(contains("\"last_sync\": null").not());
}

#[test]
fn test_sync_logs_unreachable_device_and_keeps_going() {
    let env = TestEnv::new("sync_unreachable");
    seed(&env);

    let dead = closed_port();
    let (port, _seen, server) = fake_bridge(vec![record("101", "2025-03-04T08:00:00", 0)]);
    env.cmd()
        .args(["device", "add", "DEAD", "127.0.0.1", "--port", &dead.to_string()])
        .assert()
        .success();
    env.cmd()
        .args(["device", "add", "LIVE", "127.0.0.1", "--port", &port.to_string()])
        .assert()
        .success();

    env.cmd()
        .args(["sync", "--timeout", "2"])
        .assert()
        .success()
        .stdout(contains("1 of 2 device(s) failed: DEAD"));
    server.join().expect("bridge thread");

    env.cmd()
        .args(["log", "--errors", "--device", "DEAD"])
        .assert()
        .success()
        .stdout(contains("device_error").and(contains("unreachable")));

    env.cmd()
        .args(["employee", "checkins", "--device", "LIVE"])
        .assert()
        .success()
        .stdout(contains("E-001"));
}

#[test]
fn test_sync_records_ledger_rejections_unless_ignored() {
    let env = TestEnv::new("sync_rejections");
    seed(&env);
    env.write_config("  ignore_inactive_employee: true\n");

    let (port, _seen, server) = fake_bridge(vec![
        record("102", "2025-03-05T08:00:00", 0),
        record("999", "2025-03-05T08:01:00", 0),
        record("101", "2025-03-05T08:02:00", 0),
    ]);
    env.cmd()
        .args(["device", "add", "GATE-1", "127.0.0.1", "--port", &port.to_string()])
        .assert()
        .success();

    env.cmd()
        .args(["sync", "--timeout", "5"])
        .assert()
        .success()
        .stdout(contains("submitted 1, suppressed 1, failed 1"));
    server.join().expect("bridge thread");

    env.cmd()
        .args(["log", "--errors"])
        .assert()
        .success()
        .stdout(
            contains("checkin_error")
                .and(contains("user 999"))
                .and(contains("user 102").not()),
        );
}

#[test]
fn test_disabled_sync_contacts_no_device() {
    let env = TestEnv::new("sync_disabled");
    seed(&env);
    env.write_config("  enabled: false\n");

    let dead = closed_port();
    env.cmd()
        .args(["device", "add", "D1", "127.0.0.1", "--port", &dead.to_string()])
        .assert()
        .success();

    env.cmd()
        .arg("sync")
        .assert()
        .success()
        .stdout(contains("disabled"));

    env.cmd()
        .args(["log", "--errors"])
        .assert()
        .success()
        .stdout(contains("device_error").not());
}

#[test]
fn test_sync_since_skips_older_punches() {
    let env = TestEnv::new("sync_since");
    seed(&env);

    let (port, _seen, server) = fake_bridge(vec![
        record("101", "2025-03-01T08:00:00", 0),
        record("101", "2025-03-10T08:00:00", 0),
    ]);
    env.cmd()
        .args(["device", "add", "GATE-1", "127.0.0.1", "--port", &port.to_string()])
        .assert()
        .success();

    env.cmd()
        .args(["sync", "--timeout", "5", "--since", "2025-03-05"])
        .assert()
        .success()
        .stdout(contains("fetched 2, kept 1, submitted 1"));
    server.join().expect("bridge thread");

    env.cmd()
        .args(["employee", "checkins"])
        .assert()
        .success()
        .stdout(contains("2025-03-10").and(contains("2025-03-01").not()));
}

#[test]
fn test_sync_rejects_bad_since_date() {
    let env = TestEnv::new("sync_bad_since");
    env.init();

    env.cmd()
        .args(["sync", "--since", "2025-13-01"])
        .assert()
        .failure()
        .stderr(contains("Invalid date format"));
}
