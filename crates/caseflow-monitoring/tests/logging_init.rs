use caseflow_monitoring::{init, LogExt, MonitoringConfig};
use pretty_assertions::assert_eq;

// Installs the global subscriber, so this file holds a single test.
#[test]
fn test_init_installs_subscriber_once() {
    let dir = tempfile::tempdir().unwrap();
    let log_file = dir.path().join("caseflow.log");
    let config = MonitoringConfig {
        service_name: "caseflow-test".to_string(),
        log_filter: "debug".to_string(),
        enable_json_logging: true,
        log_file: Some(log_file.to_string_lossy().into_owned()),
        environment: "test".to_string(),
    };

    init(config.clone()).unwrap();
    assert!(init(config.clone()).is_err());

    let failed: Result<(), String> = Err("handler failed".to_string());
    assert_eq!(failed.log_err("Event delivery"), Err("handler failed".to_string()));

    let json = serde_json::to_value(&config).unwrap();
    assert_eq!(json["enable_json_logging"], serde_json::json!(true));
    caseflow_monitoring::shutdown();
}
