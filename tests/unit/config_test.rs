//! Tests for configuration validation

use kernel_admission_sim::config::{parse_counts, QueueBackendConfig, SimulationConfig};

#[test]
fn test_default_config() {
    let cfg = SimulationConfig::default();
    assert_eq!(cfg.buffer_capacity, 5);
    assert_eq!(cfg.producers, 2);
    assert_eq!(cfg.processes_per_producer, 5);
    assert_eq!(cfg.initial_available, vec![3, 3, 2]);
    assert_eq!(cfg.quantum, 4);
    assert_eq!(cfg.push_delay_ms, 80);
    assert_eq!(cfg.queue, QueueBackendConfig::Ring);
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_config_invalid_capacity() {
    let invalid = SimulationConfig::new().with_buffer_capacity(0);
    assert!(invalid.validate().is_err());
}

#[test]
fn test_config_invalid_quantum() {
    let invalid = SimulationConfig::new().with_quantum(0);
    assert!(invalid.validate().is_err());
}

#[test]
fn test_config_invalid_resources() {
    let invalid = SimulationConfig::new().with_initial_available(Vec::new());
    assert!(invalid.validate().is_err());
}

#[test]
fn test_config_from_json_partial() {
    let cfg = SimulationConfig::from_json_str(
        r#"{"buffer_capacity": 8, "initial_available": [10, 5, 7], "queue": "channel"}"#,
    )
    .unwrap();

    assert_eq!(cfg.buffer_capacity, 8);
    assert_eq!(cfg.initial_available, vec![10, 5, 7]);
    assert_eq!(cfg.queue, QueueBackendConfig::Channel);
    // Unspecified fields keep their defaults.
    assert_eq!(cfg.quantum, 4);
}

#[test]
fn test_config_from_json_rejects_invalid() {
    assert!(SimulationConfig::from_json_str(r#"{"quantum": 0}"#).is_err());
    assert!(SimulationConfig::from_json_str("not json").is_err());
}

#[test]
fn test_queue_backend_from_str() {
    assert_eq!("ring".parse::<QueueBackendConfig>(), Ok(QueueBackendConfig::Ring));
    assert_eq!(" Channel ".parse::<QueueBackendConfig>(), Ok(QueueBackendConfig::Channel));
    assert!("postgres".parse::<QueueBackendConfig>().is_err());
}

#[test]
fn test_parse_counts() {
    assert_eq!(parse_counts("3, 3,2").unwrap(), vec![3, 3, 2]);
    assert!(parse_counts("3,x,2").is_err());
}

#[test]
fn test_config_from_env() {
    std::env::set_var("SIM_BUFFER_CAPACITY", "9");
    std::env::set_var("SIM_AVAILABLE", "4,4");
    std::env::set_var("SIM_QUEUE_BACKEND", "channel");

    let cfg = SimulationConfig::from_env().unwrap();

    std::env::remove_var("SIM_BUFFER_CAPACITY");
    std::env::remove_var("SIM_AVAILABLE");
    std::env::remove_var("SIM_QUEUE_BACKEND");

    assert_eq!(cfg.buffer_capacity, 9);
    assert_eq!(cfg.initial_available, vec![4, 4]);
    assert_eq!(cfg.queue, QueueBackendConfig::Channel);
    assert_eq!(cfg.producers, 2);
}
