//! Threaded simulation runtime.
//!
//! `simulate` is synchronous and pure. Callers that want an "in progress"
//! state (a spinner, a cosmetic delay) submit runs here instead: jobs go onto
//! a bounded queue, a small worker pool executes them, and each caller gets a
//! handle whose result arrives over a channel.
//!
//! The runtime also keeps a single latest-result slot. Only the newest
//! submitted run may publish into it; a run that finishes after a newer one
//! was submitted still answers its own handle but leaves the slot alone.

use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

use crate::engine::{simulate, SimulationResult};
use crate::error::{CampaignError, CampaignResult, ExecutionError};
use crate::goal::CampaignGoal;
use crate::selection::CampaignSelection;

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Number of worker threads.
    pub workers: usize,
    /// Maximum queued runs.
    pub queue_capacity: usize,
    /// Cosmetic delay applied before each run.
    pub latency: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            workers: 1,
            queue_capacity: 16,
            latency: Duration::ZERO,
        }
    }
}

struct Job {
    run_id: u64,
    goal: CampaignGoal,
    selections: Vec<CampaignSelection>,
    reply: Sender<CampaignResult<SimulationResult>>,
}

#[derive(Debug, Default)]
struct LatestSlot {
    /// Highest run id accepted onto the queue.
    submitted: u64,
    /// Highest run id that finished while it was still the newest.
    settled: u64,
    result: Option<SimulationResult>,
}

type SharedSlot = Arc<Mutex<LatestSlot>>;

fn lock_slot(slot: &Mutex<LatestSlot>) -> CampaignResult<MutexGuard<'_, LatestSlot>> {
    slot.lock()
        .map_err(|_| CampaignError::internal("poisoned lock: latest simulation slot"))
}

struct WorkerPool {
    tx: Sender<Job>,
    workers: Vec<JoinHandle<()>>,
    queue_capacity: usize,
}

impl WorkerPool {
    fn start(config: &RuntimeConfig, slot: &SharedSlot) -> CampaignResult<Self> {
        let workers = config.workers.max(1);
        let queue_capacity = config.queue_capacity.max(1);
        let (tx, rx) = bounded::<Job>(queue_capacity);

        let mut handles = Vec::with_capacity(workers);
        for idx in 0..workers {
            let rx: Receiver<Job> = rx.clone();
            let slot = Arc::clone(slot);
            let latency = config.latency;
            let handle = thread::Builder::new()
                .name(format!("campaignsim-worker-{idx}"))
                .spawn(move || {
                    while let Ok(job) = rx.recv() {
                        run_job(job, latency, &slot);
                    }
                })
                .map_err(|e| CampaignError::internal(format!("failed to spawn simulation worker: {e}")))?;
            handles.push(handle);
        }

        tracing::info!(
            workers,
            queue_capacity,
            latency_ms = u64::try_from(config.latency.as_millis()).unwrap_or(u64::MAX),
            "simulation runtime started"
        );

        Ok(Self {
            tx,
            workers: handles,
            queue_capacity,
        })
    }

    fn shutdown(self) {
        // Closing the channel lets workers drain queued jobs and exit.
        drop(self.tx);
        for handle in self.workers {
            let _ = handle.join();
        }
    }
}

fn run_job(job: Job, latency: Duration, slot: &Mutex<LatestSlot>) {
    if !latency.is_zero() {
        thread::sleep(latency);
    }

    let result = simulate(&job.goal, &job.selections).map_err(CampaignError::from);
    if let Err(err) = &result {
        tracing::warn!(run_id = job.run_id, error = %err, "simulation run failed");
    }

    match lock_slot(slot) {
        Ok(mut latest) => {
            if job.run_id == latest.submitted {
                latest.settled = job.run_id;
                if let Ok(r) = &result {
                    latest.result = Some(r.clone());
                }
            } else {
                tracing::debug!(
                    run_id = job.run_id,
                    newest = latest.submitted,
                    "simulation run superseded"
                );
            }
        }
        Err(err) => tracing::warn!(run_id = job.run_id, error = %err, "could not publish simulation result"),
    }

    let _ = job.reply.send(result);
}

/// Handle returned by [`SimulationRuntime::submit`].
pub struct SimulationHandle {
    run_id: u64,
    rx: Receiver<CampaignResult<SimulationResult>>,
}

impl SimulationHandle {
    /// Run id assigned at submission.
    #[must_use]
    pub const fn run_id(&self) -> u64 {
        self.run_id
    }

    /// Waits for the run to complete.
    pub fn join(self) -> CampaignResult<SimulationResult> {
        self.rx
            .recv()
            .map_err(|_| CampaignError::Execution(ExecutionError::Disconnected))?
    }

    /// Waits for the run to complete with a timeout.
    pub fn join_timeout(self, timeout: Duration) -> CampaignResult<SimulationResult> {
        self.rx
            .recv_timeout(timeout)
            .map_err(|err| match err {
                crossbeam_channel::RecvTimeoutError::Timeout => {
                    CampaignError::Execution(ExecutionError::Timeout {
                        duration_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                    })
                }
                crossbeam_channel::RecvTimeoutError::Disconnected => {
                    CampaignError::Execution(ExecutionError::Disconnected)
                }
            })?
    }
}

/// Worker-pool runtime around the pure simulation engine.
pub struct SimulationRuntime {
    pool: Option<WorkerPool>,
    slot: SharedSlot,
}

impl SimulationRuntime {
    /// Starts the worker pool.
    pub fn new(config: RuntimeConfig) -> CampaignResult<Self> {
        let slot = SharedSlot::default();
        let pool = WorkerPool::start(&config, &slot)?;
        Ok(Self {
            pool: Some(pool),
            slot,
        })
    }

    /// Queues a run and returns a handle to its result.
    ///
    /// # Errors
    /// - `QueueFull` if the bounded queue has no room.
    /// - `Disconnected` if the workers are gone.
    pub fn submit(
        &self,
        goal: CampaignGoal,
        selections: Vec<CampaignSelection>,
    ) -> CampaignResult<SimulationHandle> {
        let Some(pool) = &self.pool else {
            return Err(CampaignError::Execution(ExecutionError::Disconnected));
        };

        // Hold the slot while enqueueing so run ids stay gap-free and a
        // rejected submission never counts as submitted.
        let mut latest = lock_slot(&self.slot)?;
        let run_id = latest.submitted + 1;
        let (tx, rx) = bounded::<CampaignResult<SimulationResult>>(1);
        let job = Job {
            run_id,
            goal,
            selections,
            reply: tx,
        };

        match pool.tx.try_send(job) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                return Err(CampaignError::Execution(ExecutionError::QueueFull {
                    capacity: pool.queue_capacity,
                }));
            }
            Err(TrySendError::Disconnected(_)) => {
                return Err(CampaignError::Execution(ExecutionError::Disconnected));
            }
        }
        latest.submitted = run_id;
        drop(latest);

        tracing::debug!(run_id, "simulation run submitted");
        Ok(SimulationHandle { run_id, rx })
    }

    /// Submits a run and waits for it.
    pub fn run(
        &self,
        goal: CampaignGoal,
        selections: Vec<CampaignSelection>,
    ) -> CampaignResult<SimulationResult> {
        self.submit(goal, selections)?.join()
    }

    /// Result of the newest run that completed successfully without being superseded.
    pub fn latest(&self) -> CampaignResult<Option<SimulationResult>> {
        Ok(lock_slot(&self.slot)?.result.clone())
    }

    /// Returns true while the newest submitted run has not completed.
    pub fn is_running(&self) -> CampaignResult<bool> {
        let latest = lock_slot(&self.slot)?;
        Ok(latest.settled < latest.submitted)
    }
}

impl Drop for SimulationRuntime {
    fn drop(&mut self) {
        if let Some(pool) = self.pool.take() {
            pool.shutdown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::goal::CampaignType;
    use crate::metrics::{PlatformMetrics, Tier};
    use crate::selection::PostType;

    fn goal(budget: f64) -> CampaignGoal {
        CampaignGoal::new(budget, 1_000_000, CampaignType::Awareness, 2).unwrap()
    }

    fn selections() -> Vec<CampaignSelection> {
        vec![CampaignSelection::new(
            "Brett Chody",
            "Instagram",
            PostType::Reel,
            2,
            PlatformMetrics::new("@brettchody", Tier::Micro, 50_000, 25_000, 5.2, 3.8),
        )]
    }

    fn runtime(latency_ms: u64, queue_capacity: usize) -> SimulationRuntime {
        SimulationRuntime::new(RuntimeConfig {
            workers: 1,
            queue_capacity,
            latency: Duration::from_millis(latency_ms),
        })
        .unwrap()
    }

    #[test]
    fn run_matches_pure_engine() {
        let rt = runtime(0, 4);
        let sel = selections();
        let via_runtime = rt.run(goal(10_000.0), sel.clone()).unwrap();
        let direct = simulate(&goal(10_000.0), &sel).unwrap();
        assert_eq!(via_runtime, direct);
        assert_eq!(rt.latest().unwrap(), Some(direct));
        assert!(!rt.is_running().unwrap());
    }

    #[test]
    fn newer_run_supersedes_older_one() {
        let rt = runtime(30, 4);
        let first = rt.submit(goal(10_000.0), selections()).unwrap();
        let second = rt.submit(goal(20_000.0), selections()).unwrap();
        assert_eq!(first.run_id() + 1, second.run_id());
        assert!(rt.is_running().unwrap());

        let first_result = first.join().unwrap();
        let second_result = second.join().unwrap();
        assert_ne!(first_result, second_result);

        assert_eq!(rt.latest().unwrap(), Some(second_result));
        assert!(!rt.is_running().unwrap());
    }

    #[test]
    fn invalid_goal_is_reported_through_handle() {
        let rt = runtime(0, 4);
        let mut bad = goal(10_000.0);
        bad.budget = 0.0;
        let err = rt.submit(bad, selections()).unwrap().join().unwrap_err();
        assert!(err.is_validation());
        assert_eq!(rt.latest().unwrap(), None);
        assert!(!rt.is_running().unwrap());
    }

    #[test]
    fn full_queue_rejects_submission() {
        let rt = runtime(300, 1);
        let mut rejected = false;
        let mut handles = Vec::new();
        for _ in 0..3 {
            match rt.submit(goal(10_000.0), selections()) {
                Ok(h) => handles.push(h),
                Err(CampaignError::Execution(ExecutionError::QueueFull { capacity })) => {
                    assert_eq!(capacity, 1);
                    rejected = true;
                }
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }
        assert!(rejected);
        for h in handles {
            h.join().unwrap();
        }
    }

    #[test]
    fn join_timeout_reports_timeout() {
        let rt = runtime(500, 2);
        let handle = rt.submit(goal(10_000.0), selections()).unwrap();
        let err = handle.join_timeout(Duration::from_millis(10)).unwrap_err();
        let CampaignError::Execution(ExecutionError::Timeout { duration_ms }) = err else {
            panic!("expected Timeout, got {err:?}");
        };
        assert_eq!(duration_ms, 10);
    }

    #[test]
    fn join_reports_disconnected_when_reply_sender_dropped() {
        let (tx, rx) = bounded::<CampaignResult<SimulationResult>>(1);
        drop(tx);

        let handle = SimulationHandle { run_id: 7, rx };
        let err = handle.join().unwrap_err();
        assert!(matches!(err, CampaignError::Execution(ExecutionError::Disconnected)));
    }

    #[test]
    fn join_timeout_reports_disconnected_not_timeout_when_reply_sender_dropped() {
        let (tx, rx) = bounded::<CampaignResult<SimulationResult>>(1);
        drop(tx);

        let handle = SimulationHandle { run_id: 1, rx };
        let err = handle.join_timeout(Duration::from_millis(10)).unwrap_err();
        assert!(matches!(err, CampaignError::Execution(ExecutionError::Disconnected)));
    }
}
