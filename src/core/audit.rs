//! Admission audit trail.
//!
//! The simulator records one event per intake/admission/release step so a
//! caller can reconstruct how every pid moved between the lists.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::Pid;
use crate::util::clock::now_ms;

/// Step a process went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Pushed into the handoff queue.
    Enqueued,
    /// Claim granted; process placed on the ready list.
    Admitted,
    /// Claim refused; process placed on the blocked list.
    Blocked,
    /// Allocation returned to the ledger after scheduling.
    Released,
    /// Blocked process granted on retry.
    Unblocked,
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Enqueued => "enqueued",
            Self::Admitted => "admitted",
            Self::Blocked => "blocked",
            Self::Released => "released",
            Self::Unblocked => "unblocked",
        };
        f.write_str(name)
    }
}

/// Audit event structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Episode the event belongs to.
    pub episode: Uuid,
    /// Process concerned.
    pub pid: Pid,
    /// What happened.
    pub action: AuditAction,
    /// Wall-clock timestamp in milliseconds.
    pub created_at_ms: u128,
    /// Additional context, e.g. the safe sequence.
    pub detail: Option<String>,
}

/// Audit sink abstraction.
pub trait AuditSink: Send {
    /// Record an audit event.
    fn record(&mut self, event: AuditEvent);
}

/// Bounded in-memory sink; the oldest event is evicted when full.
pub struct InMemoryAuditSink {
    events: VecDeque<AuditEvent>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a sink holding at most `max_events` events.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events),
            max_events,
        }
    }

    /// Snapshot of stored events, oldest first.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.iter().cloned().collect()
    }

    /// Events recorded for `pid`, oldest first.
    pub fn events_for(&self, pid: Pid) -> Vec<AuditEvent> {
        self.events.iter().filter(|e| e.pid == pid).cloned().collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&mut self, event: AuditEvent) {
        if self.max_events == 0 {
            return;
        }
        if self.events.len() >= self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

/// Sink that forwards events to `tracing` at debug level.
#[derive(Debug, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&mut self, event: AuditEvent) {
        tracing::debug!(
            episode = %event.episode,
            pid = event.pid,
            action = %event.action,
            detail = event.detail.as_deref().unwrap_or(""),
            "audit"
        );
    }
}

/// Helper to build an audit event stamped with the current time.
pub fn build_audit_event(
    episode: Uuid,
    pid: Pid,
    action: AuditAction,
    detail: Option<String>,
) -> AuditEvent {
    AuditEvent {
        episode,
        pid,
        action,
        created_at_ms: now_ms(),
        detail,
    }
}
