//! Async dispatch pool
//!
//! A bounded queue drained by worker threads into a [`SinkMultiplexer`].
//! Producers never lose records: when the queue is full, [`DispatchPool::submit`]
//! blocks until a worker frees a slot.

use super::{
    config::{DEFAULT_QUEUE_CAPACITY, DEFAULT_THREAD_COUNT},
    error::{LoggerError, Result},
    log_record::LogRecord,
    metrics::DispatchMetrics,
    multiplexer::SinkMultiplexer,
};
use crossbeam_channel::{bounded, Receiver, SendError, Sender, TrySendError};
use parking_lot::{Condvar, Mutex, RwLock};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Default shutdown timeout for pool cleanup (5 seconds)
///
/// Used when a pool is dropped without an explicit [`DispatchPool::shutdown`].
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Normalized pool parameters; a context keeps one pool per distinct key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolKey {
    pub thread_count: usize,
    pub queue_capacity: usize,
}

impl PoolKey {
    /// Zero values select [`DEFAULT_THREAD_COUNT`] and [`DEFAULT_QUEUE_CAPACITY`]
    pub fn new(thread_count: usize, queue_capacity: usize) -> Self {
        Self {
            thread_count: if thread_count == 0 { DEFAULT_THREAD_COUNT } else { thread_count },
            queue_capacity: if queue_capacity == 0 { DEFAULT_QUEUE_CAPACITY } else { queue_capacity },
        }
    }
}

/// Records submitted but not yet written
#[derive(Default)]
struct Pending {
    count: Mutex<usize>,
    idle: Condvar,
}

impl Pending {
    fn begin(&self) {
        *self.count.lock() += 1;
    }

    fn complete(&self) {
        let mut count = self.count.lock();
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.idle.notify_all();
        }
    }

    fn wait_idle(&self, timeout: Option<Duration>) -> bool {
        let deadline = timeout.map(|t| Instant::now() + t);
        let mut count = self.count.lock();

        while *count > 0 {
            match deadline {
                Some(deadline) => {
                    if self.idle.wait_until(&mut count, deadline).timed_out() {
                        return *count == 0;
                    }
                }
                None => self.idle.wait(&mut count),
            }
        }
        true
    }
}

pub struct DispatchPool {
    key: PoolKey,
    sender: RwLock<Option<Sender<LogRecord>>>,
    workers: Mutex<Vec<thread::JoinHandle<()>>>,
    pending: Arc<Pending>,
    sinks: Arc<SinkMultiplexer>,
    metrics: Arc<DispatchMetrics>,
}

impl DispatchPool {
    /// Spawn `key.thread_count` workers draining a queue of `key.queue_capacity`
    pub fn new(
        key: PoolKey,
        sinks: Arc<SinkMultiplexer>,
        metrics: Arc<DispatchMetrics>,
    ) -> Result<Self> {
        let (sender, receiver) = bounded(key.queue_capacity);
        let pending = Arc::new(Pending::default());
        // Dequeue and write happen under one gate so a single producer's
        // records reach the sinks in submission order with any worker count.
        let gate = Arc::new(Mutex::new(()));

        let mut workers = Vec::with_capacity(key.thread_count);
        for idx in 0..key.thread_count {
            let receiver = receiver.clone();
            let sinks = Arc::clone(&sinks);
            let pending = Arc::clone(&pending);
            let gate = Arc::clone(&gate);

            let handle = thread::Builder::new()
                .name(format!("unlog-worker-{}", idx))
                .spawn(move || Self::worker_loop(&receiver, &sinks, &pending, &gate))
                .map_err(|e| {
                    LoggerError::io_operation(
                        "spawning dispatch worker",
                        format!("worker {} of {}", idx + 1, key.thread_count),
                        e,
                    )
                })?;
            workers.push(handle);
        }

        Ok(Self {
            key,
            sender: RwLock::new(Some(sender)),
            workers: Mutex::new(workers),
            pending,
            sinks,
            metrics,
        })
    }

    fn worker_loop(
        receiver: &Receiver<LogRecord>,
        sinks: &SinkMultiplexer,
        pending: &Pending,
        gate: &Mutex<()>,
    ) {
        loop {
            let turn = gate.lock();
            let Ok(record) = receiver.recv() else {
                // Channel closed and fully drained
                break;
            };
            sinks.log(&record);
            drop(turn);
            pending.complete();
        }
    }

    pub fn key(&self) -> PoolKey {
        self.key
    }

    /// Queue `record`, blocking while the queue is full
    ///
    /// After [`shutdown`](Self::shutdown) the record is written synchronously
    /// instead, so nothing submitted is ever lost.
    pub fn submit(&self, record: LogRecord) {
        self.pending.begin();

        let sender = self.sender.read();
        let rejected = match sender.as_ref() {
            Some(tx) => match tx.try_send(record) {
                Ok(()) => None,
                Err(TrySendError::Full(record)) => {
                    self.metrics.record_queue_full();
                    // Back-pressure: wait for a worker to free a slot
                    tx.send(record).err().map(|SendError(record)| record)
                }
                Err(TrySendError::Disconnected(record)) => Some(record),
            },
            None => Some(record),
        };
        drop(sender);

        match rejected {
            None => self.metrics.record_queued(),
            Some(record) => {
                self.sinks.log(&record);
                self.pending.complete();
            }
        }
    }

    /// Block until every submitted record has been written
    pub fn drain(&self) {
        self.pending.wait_idle(None);
    }

    /// Like [`drain`](Self::drain) but gives up after `timeout`; returns whether the queue emptied
    pub fn drain_timeout(&self, timeout: Duration) -> bool {
        self.pending.wait_idle(Some(timeout))
    }

    /// Number of records submitted but not yet written
    pub fn pending(&self) -> usize {
        *self.pending.count.lock()
    }

    pub fn is_running(&self) -> bool {
        self.sender.read().is_some()
    }

    /// Close the queue, let workers drain it, and join them
    ///
    /// Returns `true` if every worker finished within `timeout`.
    pub fn shutdown(&self, timeout: Duration) -> bool {
        // Waits for in-flight submissions, then closes the channel
        drop(self.sender.write().take());

        let handles = std::mem::take(&mut *self.workers.lock());
        let start = Instant::now();
        let mut clean = true;

        for handle in handles {
            loop {
                if handle.is_finished() {
                    if let Err(e) = handle.join() {
                        eprintln!("[UNLOG ERROR] Dispatch worker panicked during shutdown: {:?}", e);
                        clean = false;
                    }
                    break;
                }

                if start.elapsed() >= timeout {
                    eprintln!(
                        "[UNLOG WARNING] Dispatch worker did not finish within {:?}. \
                         Some records may be lost.",
                        timeout
                    );
                    return false;
                }

                thread::sleep(Duration::from_millis(1));
            }
        }

        clean
    }
}

impl Drop for DispatchPool {
    fn drop(&mut self) {
        if self.is_running() || !self.workers.lock().is_empty() {
            self.shutdown(DEFAULT_SHUTDOWN_TIMEOUT);
        }
    }
}
