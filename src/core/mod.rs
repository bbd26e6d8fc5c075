//! Core simulation components: resources, ledger, scheduler and orchestrator.

pub mod audit;
pub mod error;
pub mod ledger;
pub mod process;
pub mod resource;
pub mod scheduler;
pub mod simulator;

pub use audit::{
    build_audit_event, AuditAction, AuditEvent, AuditSink, InMemoryAuditSink, TracingAuditSink,
};
pub use error::{AppResult, SimError};
pub use ledger::{LedgerEntry, ResourceLedger, SafeSequence};
pub use process::{Pid, Process, ProcessGenerator, SyntheticWorkload, SENTINEL_PID};
pub use resource::ResourceVector;
pub use scheduler::{
    GanttSlice, ProcessScheduler, ScheduleResult, SchedulingPolicy, DEFAULT_QUANTUM,
    PRIORITY_POLICY_MAX_PROCESSES,
};
pub use simulator::{EpisodeReport, IntakeMode, Simulator, StateSnapshot};
