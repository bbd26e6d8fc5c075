//! Episode orchestration: intake, admission, scheduling, release and retry.
//!
//! One `Simulator` owns a resource ledger and a handoff queue. Each call to
//! [`Simulator::start`] is an independent episode:
//!
//! 1. the ready/blocked lists are cleared;
//! 2. processes enter the queue, either from the manual pool (single-threaded)
//!    or from producer threads running alongside a consumer thread;
//! 3. the consumer asks the ledger to admit each process and files it as
//!    ready or blocked;
//! 4. the ready list is scheduled, its allocations are released and blocked
//!    processes are retried against the freed ledger.
//!
//! Lock order: `episode_guard`, then `lists`, then `ledger`; never the reverse.

use std::iter;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, info_span, warn, Span};
use uuid::Uuid;

use crate::config::SimulationConfig;
use crate::core::{
    build_audit_event, AuditAction, AuditSink, Pid, Process, ProcessGenerator, ProcessScheduler,
    ResourceLedger, ResourceVector, ScheduleResult, SimError, SyntheticWorkload, SENTINEL_PID,
};
use crate::infra::queue::HandoffQueue;

/// How processes entered the queue during an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeMode {
    /// The manual pool was drained on the calling thread.
    Manual {
        /// Processes taken from the pool.
        count: usize,
    },
    /// Producer threads synthesized processes.
    Threaded {
        /// Producer threads spawned.
        producers: usize,
        /// Processes per producer.
        per_producer: usize,
    },
}

/// Observable outcome of one episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeReport {
    /// Identifier used in logs and audit events.
    pub episode_id: Uuid,
    /// Intake mode used.
    pub mode: IntakeMode,
    /// Timeline and statistics of the ready list.
    pub schedule: ScheduleResult,
    /// Pids admitted during intake, in admission order.
    pub admitted: Vec<Pid>,
    /// Pids whose allocation was returned after scheduling.
    pub released: Vec<Pid>,
    /// Blocked pids granted on retry.
    pub unblocked: Vec<Pid>,
    /// Pids still blocked after the retry pass.
    pub still_blocked: Vec<Pid>,
}

/// Read-only view of ledger capacity and the three lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Ledger capacity.
    pub total: ResourceVector,
    /// Resources not currently held.
    pub available: ResourceVector,
    /// Pids waiting in the manual pool.
    pub manual_pool: Vec<Pid>,
    /// Pids on the ready list.
    pub ready: Vec<Pid>,
    /// Pids on the blocked list.
    pub blocked: Vec<Pid>,
}

#[derive(Default)]
struct ProcessLists {
    ready: Vec<Process>,
    blocked: Vec<Process>,
    manual_pool: Vec<Process>,
}

fn pids(processes: &[Process]) -> Vec<Pid> {
    processes.iter().map(|p| p.pid).collect()
}

/// Owns the ledger and queue for a sequence of simulation episodes.
pub struct Simulator {
    config: SimulationConfig,
    queue: Box<dyn HandoffQueue<Process>>,
    ledger: Mutex<ResourceLedger>,
    lists: Mutex<ProcessLists>,
    next_pid: AtomicI64,
    generator: Box<dyn ProcessGenerator>,
    audit: Option<Arc<Mutex<dyn AuditSink>>>,
    episode_guard: Mutex<()>,
}

impl Simulator {
    /// Assemble a simulator from already-validated components.
    pub fn new(
        config: SimulationConfig,
        ledger: ResourceLedger,
        queue: Box<dyn HandoffQueue<Process>>,
    ) -> Self {
        Self {
            config,
            queue,
            ledger: Mutex::new(ledger),
            lists: Mutex::new(ProcessLists::default()),
            next_pid: AtomicI64::new(1),
            generator: Box::new(SyntheticWorkload),
            audit: None,
            episode_guard: Mutex::new(()),
        }
    }

    /// Replace the synthetic workload used by producer threads.
    #[must_use]
    pub fn with_generator(mut self, generator: impl ProcessGenerator + 'static) -> Self {
        self.generator = Box::new(generator);
        self
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Arc<Mutex<dyn AuditSink>>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Configuration in use.
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run `f` against the ledger while holding its lock.
    pub fn with_ledger<R>(&self, f: impl FnOnce(&ResourceLedger) -> R) -> R {
        f(&self.ledger.lock())
    }

    /// Queue a manually specified process for the next episode.
    ///
    /// # Errors
    ///
    /// Rejects the reserved sentinel pid and claims whose length does not
    /// match the ledger.
    pub fn add_process(&self, process: Process) -> Result<(), SimError> {
        if process.pid == SENTINEL_PID {
            return Err(SimError::InvalidConfiguration(format!(
                "pid {SENTINEL_PID} is reserved for the end-of-stream marker"
            )));
        }
        self.ledger.lock().check_dimensions(&process.max_need)?;
        info!(pid = process.pid, "added process to manual pool");
        self.lists.lock().manual_pool.push(process);
        Ok(())
    }

    /// Consistent snapshot of available resources and the three lists.
    pub fn display_state(&self) -> StateSnapshot {
        let lists = self.lists.lock();
        let ledger = self.ledger.lock();
        StateSnapshot {
            total: ledger.total().clone(),
            available: ledger.available().clone(),
            manual_pool: pids(&lists.manual_pool),
            ready: pids(&lists.ready),
            blocked: pids(&lists.blocked),
        }
    }

    /// Run one full episode.
    ///
    /// Episodes share the handoff queue, so concurrent callers are
    /// serialised: a second `start` waits until the running one returns.
    ///
    /// # Errors
    ///
    /// Fails when the manual pool is empty and no producers are configured,
    /// on thread spawn/panic, on a ledger failure during intake (after
    /// the queue has been drained) or on an invalid quantum.
    pub fn start(&self) -> Result<EpisodeReport, SimError> {
        let _running = self.episode_guard.lock();
        let episode = Uuid::new_v4();
        let span = info_span!("episode", id = %episode);
        let _entered = span.enter();

        self.reset_lists()?;
        info!(
            available = %self.ledger.lock().available(),
            "simulation start"
        );

        let manual = std::mem::take(&mut self.lists.lock().manual_pool);
        let mode = if manual.is_empty() {
            self.run_threaded(episode, &span)?
        } else {
            self.run_manual(episode, manual)?
        };

        let report = self.finish_episode(episode, mode)?;
        info!(
            still_blocked = ?report.still_blocked,
            "simulation end"
        );
        Ok(report)
    }

    /// Clear both lists, returning allocations still held by processes the
    /// previous episode promoted from blocked to ready.
    fn reset_lists(&self) -> Result<(), SimError> {
        let mut lists = self.lists.lock();
        let stale = pids(&lists.ready);
        lists.ready.clear();
        lists.blocked.clear();

        let mut ledger = self.ledger.lock();
        for pid in stale {
            if let Some(freed) = ledger.release(pid)? {
                debug!(pid, freed = %freed, "released allocation left by previous episode");
            }
        }
        Ok(())
    }

    fn run_manual(&self, episode: Uuid, manual: Vec<Process>) -> Result<IntakeMode, SimError> {
        let count = manual.len();
        info!(count, "using manual processes");

        let mut failure = None;
        for process in manual.into_iter().chain(iter::once(Process::sentinel())) {
            let pid = process.pid;
            let mut pending = process;
            // Single-threaded: make room by admitting queued work ourselves.
            while let Err(back) = self.queue.try_push(pending) {
                pending = back;
                self.admit_next(episode, &mut failure)?;
            }
            if pid != SENTINEL_PID {
                self.record(episode, pid, AuditAction::Enqueued, None);
            }
        }
        while self.admit_next(episode, &mut failure)? {}

        failure.map_or(Ok(IntakeMode::Manual { count }), Err)
    }

    fn run_threaded(&self, episode: Uuid, span: &Span) -> Result<IntakeMode, SimError> {
        let producers = self.config.producers;
        let per_producer = self.config.processes_per_producer;
        if producers == 0 {
            return Err(SimError::InvalidConfiguration(
                "no producers configured and the manual pool is empty".into(),
            ));
        }
        let resource_types = self.ledger.lock().resource_types();
        info!(producers, per_producer, "spawning producer threads");

        thread::scope(|scope| {
            let consumer = thread::Builder::new()
                .name("sim-consumer".into())
                .spawn_scoped(scope, || {
                    let _entered = span.enter();
                    self.consume(episode)
                })?;

            let mut outcome = Ok(());
            let mut handles = Vec::with_capacity(producers);
            for id in 1..=producers {
                let spawned = thread::Builder::new()
                    .name(format!("sim-producer-{id}"))
                    .spawn_scoped(scope, move || {
                        let _entered = span.enter();
                        self.produce(episode, id, resource_types)
                    });
                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(e) => {
                        error!(producer = id, error = %e, "failed to spawn producer");
                        outcome = Err(SimError::WorkerSpawn(e));
                        break;
                    }
                }
            }

            for handle in handles {
                let joined = handle
                    .join()
                    .map_err(|_| SimError::WorkerPanicked("producer".into()))
                    .and_then(|r| r);
                if outcome.is_ok() {
                    outcome = joined;
                }
            }

            // Every producer has joined, so the sentinel is the last item.
            self.queue.push(Process::sentinel())?;
            let consumed = consumer
                .join()
                .map_err(|_| SimError::WorkerPanicked("consumer".into()))
                .and_then(|r| r);

            outcome.and(consumed)
        })?;

        Ok(IntakeMode::Threaded {
            producers,
            per_producer,
        })
    }

    fn produce(&self, episode: Uuid, producer: usize, resource_types: usize) -> Result<(), SimError> {
        let delay = Duration::from_millis(self.config.push_delay_ms);
        for sequence in 0..self.config.processes_per_producer {
            let pid = self.next_pid.fetch_add(1, Ordering::Relaxed);
            let process = self.generator.generate(pid, sequence, resource_types);
            debug!(
                producer,
                pid = process.pid,
                arrival = process.arrival_time,
                burst = process.burst_time,
                priority = process.priority,
                "push"
            );
            let pushed = process.pid;
            self.queue.push(process)?;
            self.record(episode, pushed, AuditAction::Enqueued, None);
            if !delay.is_zero() {
                thread::sleep(delay);
            }
        }
        Ok(())
    }

    fn consume(&self, episode: Uuid) -> Result<(), SimError> {
        let mut failure = None;
        while self.admit_next(episode, &mut failure)? {}
        failure.map_or(Ok(()), Err)
    }

    /// Pop one item and classify it. Returns `false` once the sentinel is seen.
    ///
    /// Ledger failures are stored in `failure` rather than returned so the
    /// queue keeps draining and producers never block on a full queue.
    fn admit_next(&self, episode: Uuid, failure: &mut Option<SimError>) -> Result<bool, SimError> {
        let process = self.queue.pop()?;
        if process.is_sentinel() {
            debug!("got sentinel, stopping intake");
            return Ok(false);
        }

        // Grant and filing happen under one lists lock.
        let mut lists = self.lists.lock();
        let verdict = self.ledger.lock().request(process.pid, &process.max_need);
        match verdict {
            Ok(Some(sequence)) => {
                debug!(pid = process.pid, ?sequence, "safe -> ready");
                self.record(
                    episode,
                    process.pid,
                    AuditAction::Admitted,
                    Some(format!("{sequence:?}")),
                );
                lists.ready.push(process);
            }
            Ok(None) => {
                debug!(pid = process.pid, "unsafe -> blocked");
                self.record(episode, process.pid, AuditAction::Blocked, None);
                lists.blocked.push(process);
            }
            Err(e) => {
                error!(pid = process.pid, error = %e, "admission failed");
                self.record(episode, process.pid, AuditAction::Blocked, Some(e.to_string()));
                lists.blocked.push(process);
                failure.get_or_insert(e);
            }
        }
        Ok(true)
    }

    fn finish_episode(&self, episode: Uuid, mode: IntakeMode) -> Result<EpisodeReport, SimError> {
        let mut lists = self.lists.lock();

        info!(
            ready = lists.ready.len(),
            policy = %ProcessScheduler::policy_for(lists.ready.len()),
            "scheduling ready list"
        );
        let schedule = ProcessScheduler::run(&lists.ready, self.config.quantum)?;
        info!(
            slices = schedule.gantt.len(),
            avg_waiting = schedule.avg_waiting,
            avg_turnaround = schedule.avg_turnaround,
            completion_time = schedule.completion_time,
            "schedule complete"
        );
        debug!("\n{schedule}");

        let admitted = pids(&lists.ready);
        let mut ledger = self.ledger.lock();

        let mut released = Vec::with_capacity(admitted.len());
        for &pid in &admitted {
            if ledger.release(pid)?.is_some() {
                self.record(episode, pid, AuditAction::Released, None);
                released.push(pid);
            }
        }

        let mut unblocked = Vec::new();
        for process in std::mem::take(&mut lists.blocked) {
            match ledger.request(process.pid, &process.max_need) {
                Ok(Some(sequence)) => {
                    info!(pid = process.pid, ?sequence, "now safe -> ready");
                    self.record(
                        episode,
                        process.pid,
                        AuditAction::Unblocked,
                        Some(format!("{sequence:?}")),
                    );
                    unblocked.push(process.pid);
                    lists.ready.push(process);
                }
                Ok(None) => lists.blocked.push(process),
                Err(e) => {
                    warn!(pid = process.pid, error = %e, "retry failed");
                    lists.blocked.push(process);
                }
            }
        }

        let still_blocked = pids(&lists.blocked);
        info!(?still_blocked, "blocked processes after retry");

        Ok(EpisodeReport {
            episode_id: episode,
            mode,
            schedule,
            admitted,
            released,
            unblocked,
            still_blocked,
        })
    }

    fn record(&self, episode: Uuid, pid: Pid, action: AuditAction, detail: Option<String>) {
        if let Some(sink) = &self.audit {
            sink.lock().record(build_audit_event(episode, pid, action, detail));
        }
    }
}
