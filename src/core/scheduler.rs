//! CPU scheduling of admitted processes.
//!
//! `ProcessScheduler::run` is a pure function of its inputs: small batches
//! (at most [`PRIORITY_POLICY_MAX_PROCESSES`]) run under non-preemptive
//! priority, larger ones under round-robin.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{Pid, Process, SimError};

/// Largest batch scheduled with the priority policy.
pub const PRIORITY_POLICY_MAX_PROCESSES: usize = 5;

/// Round-robin time slice used by the simulator unless configured otherwise.
pub const DEFAULT_QUANTUM: u32 = 4;

/// Policy selected for a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulingPolicy {
    /// Non-preemptive priority, lower number first.
    Priority,
    /// Round-robin with a fixed quantum.
    RoundRobin,
}

impl fmt::Display for SchedulingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Priority => f.write_str("Priority"),
            Self::RoundRobin => f.write_str("Round Robin"),
        }
    }
}

/// One contiguous interval during which a single process holds the CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GanttSlice {
    /// Process on the CPU.
    pub pid: Pid,
    /// Slice start (inclusive).
    pub start: u64,
    /// Slice end (exclusive).
    pub end: u64,
}

/// Timeline and timing statistics for one scheduled batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResult {
    /// Policy that produced the timeline.
    pub policy: SchedulingPolicy,
    /// Execution timeline in order.
    pub gantt: Vec<GanttSlice>,
    /// Waiting time per pid.
    pub waiting: BTreeMap<Pid, u64>,
    /// Turnaround time per pid.
    pub turnaround: BTreeMap<Pid, u64>,
    /// Mean waiting time over completed processes.
    pub avg_waiting: f64,
    /// Mean turnaround time over completed processes.
    pub avg_turnaround: f64,
    /// Clock value when the last process finished.
    pub completion_time: u64,
    /// Completed processes, in completion order, with start/finish set.
    pub completed: Vec<Process>,
}

impl ScheduleResult {
    fn empty(policy: SchedulingPolicy) -> Self {
        Self {
            policy,
            gantt: Vec::new(),
            waiting: BTreeMap::new(),
            turnaround: BTreeMap::new(),
            avg_waiting: 0.0,
            avg_turnaround: 0.0,
            completion_time: 0,
            completed: Vec::new(),
        }
    }
}

impl fmt::Display for ScheduleResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Policy: {}", self.policy)?;
        writeln!(f, "Gantt Chart:")?;
        for slice in &self.gantt {
            write!(f, "| P{} ({}-{}) ", slice.pid, slice.start, slice.end)?;
        }
        writeln!(f, "|")?;
        writeln!(f, "PID  WT  TAT")?;
        for (pid, wt) in &self.waiting {
            let tat = self.turnaround.get(pid).copied().unwrap_or_default();
            writeln!(f, "{pid}   {wt}   {tat}")?;
        }
        write!(
            f,
            "Average WT={:.2}  Average TAT={:.2}",
            self.avg_waiting, self.avg_turnaround
        )
    }
}

/// Replays admitted processes into a timeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessScheduler;

impl ProcessScheduler {
    /// Policy used for a batch of `count` processes.
    pub const fn policy_for(count: usize) -> SchedulingPolicy {
        if count <= PRIORITY_POLICY_MAX_PROCESSES {
            SchedulingPolicy::Priority
        } else {
            SchedulingPolicy::RoundRobin
        }
    }

    /// Schedule `processes` and compute waiting/turnaround statistics.
    ///
    /// The clock and the statistic sums saturate at `u64::MAX`.
    ///
    /// # Errors
    ///
    /// Returns `SimError::InvalidConfiguration` if `quantum` is zero.
    pub fn run(processes: &[Process], quantum: u32) -> Result<ScheduleResult, SimError> {
        if quantum == 0 {
            return Err(SimError::InvalidConfiguration(
                "quantum must be greater than 0".into(),
            ));
        }
        let procs = processes.to_vec();
        Ok(match Self::policy_for(procs.len()) {
            SchedulingPolicy::Priority => Self::priority_nonpreemptive(procs),
            SchedulingPolicy::RoundRobin => Self::round_robin(procs, u64::from(quantum)),
        })
    }

    fn priority_nonpreemptive(mut procs: Vec<Process>) -> ScheduleResult {
        let mut out = ScheduleResult::empty(SchedulingPolicy::Priority);
        procs.sort_by_key(|p| (p.arrival_time, p.priority));

        let mut pending = procs.into_iter().peekable();
        let mut ready: Vec<Process> = Vec::new();
        let mut done = Vec::new();
        let mut t = 0;

        loop {
            while let Some(p) = pending.next_if(|p| p.arrival_time <= t) {
                ready.push(p);
            }

            let Some(idx) = ready
                .iter()
                .enumerate()
                .min_by_key(|(_, p)| (p.priority, p.arrival_time))
                .map(|(i, _)| i)
            else {
                match pending.peek() {
                    Some(next) => {
                        t = next.arrival_time;
                        continue;
                    }
                    None => break,
                }
            };

            let mut p = ready.remove(idx);
            let start = t;
            p.start_time.get_or_insert(start);
            t = t.saturating_add(p.burst_time);
            p.remaining_time = 0;
            p.finish_time = Some(t);
            out.gantt.push(GanttSlice { pid: p.pid, start, end: t });
            done.push(p);
        }

        out.completion_time = t;
        Self::compute_stats(done, &mut out);
        out
    }

    fn round_robin(mut procs: Vec<Process>, quantum: u64) -> ScheduleResult {
        let mut out = ScheduleResult::empty(SchedulingPolicy::RoundRobin);
        procs.sort_by_key(|p| p.arrival_time);

        let mut pending = procs.into_iter().peekable();
        let mut queue: VecDeque<Process> = VecDeque::new();
        let mut done = Vec::new();
        let mut t = 0;

        loop {
            while let Some(p) = pending.next_if(|p| p.arrival_time <= t) {
                queue.push_back(p);
            }

            let Some(mut p) = queue.pop_front() else {
                match pending.peek() {
                    Some(next) => {
                        t = next.arrival_time;
                        continue;
                    }
                    None => break,
                }
            };

            p.start_time.get_or_insert(t);
            let run = quantum.min(p.remaining_time);
            let start = t;
            t = t.saturating_add(run);
            p.remaining_time -= run;
            out.gantt.push(GanttSlice { pid: p.pid, start, end: t });

            // Arrivals during this slice queue ahead of the preempted process.
            while let Some(arrived) = pending.next_if(|n| n.arrival_time <= t) {
                queue.push_back(arrived);
            }

            if p.remaining_time > 0 {
                queue.push_back(p);
            } else {
                p.finish_time = Some(t);
                done.push(p);
            }
        }

        out.completion_time = t;
        Self::compute_stats(done, &mut out);
        out
    }

    #[allow(clippy::cast_precision_loss)]
    fn compute_stats(done: Vec<Process>, out: &mut ScheduleResult) {
        let mut sum_waiting = 0u64;
        let mut sum_turnaround = 0u64;

        for p in &done {
            let finish = p.finish_time.unwrap_or(p.arrival_time);
            let turnaround = finish.saturating_sub(p.arrival_time);
            let waiting = turnaround.saturating_sub(p.burst_time);
            out.turnaround.insert(p.pid, turnaround);
            out.waiting.insert(p.pid, waiting);
            sum_waiting = sum_waiting.saturating_add(waiting);
            sum_turnaround = sum_turnaround.saturating_add(turnaround);
        }

        if !done.is_empty() {
            let n = done.len() as f64;
            out.avg_waiting = sum_waiting as f64 / n;
            out.avg_turnaround = sum_turnaround as f64 / n;
        }
        out.completed = done;
    }
}
