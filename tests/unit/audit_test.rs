//! Tests for audit sink

use kernel_admission_sim::core::{
    build_audit_event, AuditAction, AuditSink, InMemoryAuditSink, TracingAuditSink,
};
use uuid::Uuid;

#[test]
fn test_in_memory_audit_sink() {
    let episode = Uuid::new_v4();
    let mut sink = InMemoryAuditSink::new(10);

    let event = build_audit_event(episode, 7, AuditAction::Admitted, Some("[7]".to_string()));

    sink.record(event.clone());
    assert_eq!(sink.events().len(), 1);

    let events = sink.events();
    assert_eq!(events[0], event);
    assert_eq!(events[0].pid, 7);
    assert_eq!(events[0].action, AuditAction::Admitted);
    assert!(events[0].created_at_ms > 0);
}

#[test]
fn test_audit_sink_overflow() {
    let episode = Uuid::new_v4();
    let mut sink = InMemoryAuditSink::new(2);

    sink.record(build_audit_event(episode, 1, AuditAction::Enqueued, None));
    sink.record(build_audit_event(episode, 2, AuditAction::Enqueued, None));
    sink.record(build_audit_event(episode, 3, AuditAction::Enqueued, None));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].pid, 2); // First one popped
    assert_eq!(events[1].pid, 3);
}

#[test]
fn test_events_for_filters_by_pid() {
    let episode = Uuid::new_v4();
    let mut sink = InMemoryAuditSink::new(10);

    sink.record(build_audit_event(episode, 1, AuditAction::Enqueued, None));
    sink.record(build_audit_event(episode, 2, AuditAction::Enqueued, None));
    sink.record(build_audit_event(episode, 1, AuditAction::Blocked, None));

    let actions: Vec<_> = sink.events_for(1).into_iter().map(|e| e.action).collect();
    assert_eq!(actions, vec![AuditAction::Enqueued, AuditAction::Blocked]);
}

#[test]
fn test_zero_capacity_sink_drops_everything() {
    let mut sink = InMemoryAuditSink::new(0);
    sink.record(build_audit_event(Uuid::new_v4(), 1, AuditAction::Released, None));
    assert!(sink.events().is_empty());
}

#[test]
fn test_tracing_sink_accepts_events() {
    let mut sink = TracingAuditSink;
    sink.record(build_audit_event(Uuid::new_v4(), 4, AuditAction::Unblocked, None));
}

#[test]
fn test_action_display_and_serde() {
    assert_eq!(AuditAction::Unblocked.to_string(), "unblocked");
    let json = serde_json::to_string(&AuditAction::Released).unwrap();
    assert_eq!(json, "\"released\"");
}
