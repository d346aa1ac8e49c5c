//! Task scheduling: reset-then-register, worker pool, retry driving.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use crate::retry::RetryPolicy;
use crate::source::FlightSource;
use crate::task::{Task, TaskKind};
use crate::throttle::ThroughputGate;
use crate::worker::FetchWorker;

const QUEUE_DEPTH: usize = 256;

/// Scheduling knobs. Defaults mirror the configuration surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Cadence of each source's recurring task.
    pub fetch_interval: Duration,
    /// Global cap on occurrence starts per second, across all sources.
    pub jobs_per_second: u32,
    /// Worker pool size.
    pub workers: usize,
    /// Per-occurrence retry policy shared by both task kinds.
    pub retry: RetryPolicy,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            fetch_interval: Duration::from_millis(60_000),
            jobs_per_second: 10,
            workers: 4,
            retry: RetryPolicy::default(),
        }
    }
}

/// One eligible run of a task, tagged with the registration generation that
/// produced it. Occurrences from before a reset are dropped on dequeue.
struct Occurrence {
    task: Task,
    generation: u64,
}

/// Pulls fetch tasks through a bounded worker pool.
///
/// The pool and queue are created once; [`Scheduler::initialize`] may be
/// called any number of times. Each call performs a full reset — stale
/// occurrences invalidated, recurring tickers aborted and awaited, task
/// records drained — strictly before the new registrations, so restarts can
/// never accumulate duplicate recurring tasks.
pub struct Scheduler {
    config: SchedulerConfig,
    queue_tx: mpsc::Sender<Occurrence>,
    generation: Arc<AtomicU64>,
    tickers: Vec<JoinHandle<()>>,
    tasks: Vec<Task>,
    pool: Vec<JoinHandle<()>>,
}

impl Scheduler {
    pub fn new(worker: Arc<FetchWorker>, config: SchedulerConfig) -> Self {
        let (queue_tx, queue_rx) = mpsc::channel(QUEUE_DEPTH);
        let queue_rx = Arc::new(Mutex::new(queue_rx));
        let gate = ThroughputGate::per_second(config.jobs_per_second);
        let generation = Arc::new(AtomicU64::new(0));

        let pool = (0..config.workers.max(1))
            .map(|_| {
                tokio::spawn(run_worker(
                    Arc::clone(&queue_rx),
                    Arc::clone(&worker),
                    gate.clone(),
                    Arc::clone(&generation),
                    config.retry,
                ))
            })
            .collect();

        Self {
            config,
            queue_tx,
            generation,
            tickers: Vec::new(),
            tasks: Vec::new(),
            pool,
        }
    }

    /// Reset, then register one immediate and one recurring task per source.
    pub async fn initialize(&mut self, sources: &[FlightSource]) {
        self.reset().await;

        for (index, source) in sources.iter().enumerate() {
            let immediate = Task::immediate(index, source.clone());
            self.enqueue(immediate.clone()).await;
            self.tasks.push(immediate);

            let recurring =
                Task::recurring(index, source.clone(), self.config.fetch_interval);
            self.spawn_ticker(recurring.clone());
            self.tasks.push(recurring);

            tracing::info!(
                source = %source.name,
                url = %source.url,
                interval_ms = self.config.fetch_interval.as_millis() as u64,
                "registered fetch tasks"
            );
        }
    }

    /// Current registrations, in registration order.
    pub fn registered_tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Tear down all registrations. In-flight occurrences run to completion;
    /// queued ones are invalidated.
    pub async fn shutdown(&mut self) {
        self.reset().await;
    }

    async fn reset(&mut self) {
        // Invalidate queued occurrences first so nothing registered earlier
        // can still start once the tickers are gone.
        self.generation.fetch_add(1, Ordering::SeqCst);
        for handle in self.tickers.drain(..) {
            handle.abort();
            // Await the abort so the reset is confirmed complete before any
            // re-registration happens.
            let _ = handle.await;
        }
        self.tasks.clear();
    }

    async fn enqueue(&self, task: Task) {
        let occurrence = Occurrence {
            task,
            generation: self.generation.load(Ordering::SeqCst),
        };
        if self.queue_tx.send(occurrence).await.is_err() {
            tracing::warn!("task queue is closed; dropping occurrence");
        }
    }

    fn spawn_ticker(&mut self, task: Task) {
        let TaskKind::Recurring { interval } = task.kind else {
            return;
        };
        let tx = self.queue_tx.clone();
        let expected = self.generation.load(Ordering::SeqCst);

        let handle = tokio::spawn(async move {
            // The immediate task covers t=0; the recurring one first fires a
            // full interval after registration.
            let start = tokio::time::Instant::now() + interval;
            let mut ticker = tokio::time::interval_at(start, interval);
            loop {
                ticker.tick().await;
                let occurrence = Occurrence {
                    task: task.clone(),
                    generation: expected,
                };
                if tx.send(occurrence).await.is_err() {
                    return;
                }
            }
        });
        self.tickers.push(handle);
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        for handle in self.tickers.drain(..) {
            handle.abort();
        }
        for handle in self.pool.drain(..) {
            handle.abort();
        }
    }
}

async fn run_worker(
    queue: Arc<Mutex<mpsc::Receiver<Occurrence>>>,
    worker: Arc<FetchWorker>,
    gate: ThroughputGate,
    generation: Arc<AtomicU64>,
    retry: RetryPolicy,
) {
    loop {
        let occurrence = {
            let mut rx = queue.lock().await;
            match rx.recv().await {
                Some(occurrence) => occurrence,
                None => return,
            }
        };
        if occurrence.generation != generation.load(Ordering::SeqCst) {
            // Stale: queued before the last reset.
            continue;
        }
        gate.acquire().await;
        run_occurrence(&worker, &occurrence.task, retry).await;
    }
}

/// Drive one occurrence through its attempts.
///
/// Exhaustion is terminal for this occurrence only; a recurring task's next
/// occurrence is unaffected.
async fn run_occurrence(worker: &FetchWorker, task: &Task, retry: RetryPolicy) {
    let attempts = retry.attempts.max(1);
    for attempt in 1..=attempts {
        match worker.execute(task).await {
            Ok(_) => return,
            Err(error) if attempt < attempts => {
                let delay = retry.delay_for_attempt(attempt - 1);
                tracing::warn!(
                    task = %task.id,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    %error,
                    "fetch attempt failed, backing off"
                );
                tokio::time::sleep(delay).await;
            }
            Err(error) => {
                tracing::error!(
                    task = %task.id,
                    attempts,
                    %error,
                    "occurrence failed permanently"
                );
            }
        }
    }
}
