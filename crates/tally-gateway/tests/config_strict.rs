#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use tally_gateway::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
metrics:
  event_log_capacitty: 10 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.server.listen, "0.0.0.0:9464");
    assert_eq!(cfg.metrics.event_log_capacity, 1000);
    assert!(cfg.metrics.track_requests);
}

#[test]
fn rejects_unsupported_version() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn rejects_bad_listen_addr() {
    let bad = r#"
version: 1
server:
  listen: "not-an-addr"
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn rejects_zero_event_capacity() {
    let bad = r#"
version: 1
metrics:
  event_log_capacity: 0
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert!(err.to_string().contains("event_log_capacity"));
}

#[test]
fn missing_file_is_internal() {
    let err = config::load_from_file("/nonexistent/tally.yaml").expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "INTERNAL");
}
