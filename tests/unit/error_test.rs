//! Tests for error types

use kernel_admission_sim::core::SimError;

#[test]
fn test_dimension_mismatch_error() {
    let err = SimError::DimensionMismatch {
        expected: 3,
        actual: 2,
    };
    assert_eq!(
        format!("{}", err),
        "resource vector length mismatch: expected 3, got 2"
    );
}

#[test]
fn test_invalid_configuration_error() {
    let err = SimError::InvalidConfiguration("quantum must be greater than 0".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid configuration: quantum must be greater than 0"
    );
}

#[test]
fn test_underflow_error() {
    let err = SimError::ResourceUnderflow;
    assert_eq!(format!("{}", err), "resource vector underflow");
}

#[test]
fn test_queue_closed_error() {
    let err = SimError::QueueClosed;
    assert_eq!(format!("{}", err), "handoff queue closed");
}

#[test]
fn test_worker_spawn_from_io_error() {
    let io = std::io::Error::new(std::io::ErrorKind::Other, "no threads left");
    let err: SimError = io.into();
    assert!(matches!(err, SimError::WorkerSpawn(_)));
    assert_eq!(
        format!("{}", err),
        "failed to spawn worker thread: no threads left"
    );
}

#[test]
fn test_worker_panicked_error() {
    let err = SimError::WorkerPanicked("consumer".to_string());
    assert_eq!(format!("{}", err), "worker thread panicked: consumer");
}
