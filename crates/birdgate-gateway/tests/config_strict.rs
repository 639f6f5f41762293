#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use birdgate_gateway::app_state::AppState;
use birdgate_gateway::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
gateway:
  listen: "0.0.0.0:8000"
admission:
  per_minte: 10 # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn ok_minimal_config_uses_default_quotas() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.gateway.listen, "0.0.0.0:8000");
    assert_eq!(cfg.admission.per_minute, 30);
    assert_eq!(cfg.admission.per_hour, 500);
}

#[test]
fn explicit_quotas_are_carried_into_limits() {
    let ok = r#"
version: 1
gateway:
  listen: "127.0.0.1:9000"
admission:
  per_minute: 10
  per_hour: 120
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    let limits = cfg.admission.limits();
    assert_eq!(limits.per_minute, 10);
    assert_eq!(limits.per_hour, 120);
    assert_eq!(cfg.gateway.listen_addr().unwrap().port(), 9000);
}

#[test]
fn unsupported_version_is_rejected() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn zero_quota_is_rejected() {
    let bad = r#"
version: 1
admission:
  per_minute: 0
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn minute_quota_above_hour_quota_is_accepted() {
    let ok = r#"
version: 1
admission:
  per_minute: 100
  per_hour: 2
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.admission.limits().per_minute, 100);
    assert_eq!(cfg.admission.limits().per_hour, 2);
}

#[test]
fn max_quota_loads_and_builds_state() {
    let ok = r#"
version: 1
admission:
  per_minute: 4294967295
  per_hour: 4294967295
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    let state = AppState::new(cfg);
    assert!(state.admission().try_admit());
    assert_eq!(state.admission().stats().hour_limit, u32::MAX);
}

#[test]
fn bad_listen_address_is_rejected() {
    let bad = r#"
version: 1
gateway:
  listen: "not-an-addr"
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn missing_file_is_internal() {
    let err = config::load_from_file("/nonexistent/birdgate.yaml").expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "INTERNAL");
}
