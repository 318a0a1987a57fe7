//! Bounded fire-and-forget diagnostic logger backed by a rayon thread pool.
//!
//! Callers hand over a value and return without waiting. The record is computed
//! and written on a pool thread, or on the caller's thread once the queue is full. A pending-task counter bounds the queue and lets a
//! host drain outstanding records before it exits.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, error, warn};

use super::config::DiagnosticsConfig;
use super::sink::{DiagnosticSink, StdoutSink};
use crate::adder::diagnostic_value;
use crate::error::{DiagnosticsError, Result};

/// Prefix of every diagnostic pool thread name.
pub const THREAD_NAME_PREFIX: &str = "async-adder-diag";

/// Count of scheduled records that have not finished writing.
#[derive(Default)]
struct Pending {
    count: Mutex<usize>,
    idle: Condvar,
}

impl Pending {
    fn lock(&self) -> MutexGuard<'_, usize> {
        self.count.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Take a slot if fewer than `capacity` are in use.
    fn try_acquire(&self, capacity: usize) -> bool {
        let mut count = self.lock();
        if *count >= capacity {
            return false;
        }
        *count += 1;
        true
    }

    fn release(&self) {
        let mut count = self.lock();
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.idle.notify_all();
        }
    }
}

/// Releases its pending slot when dropped, including during unwinding.
struct Slot(Arc<Pending>);

impl Drop for Slot {
    fn drop(&mut self) {
        self.0.release();
    }
}

/// Schedules diagnostic records onto a dedicated thread pool.
pub struct DiagnosticLogger {
    pool: rayon::ThreadPool,
    sink: Arc<dyn DiagnosticSink>,
    pending: Arc<Pending>,
    queue_capacity: usize,
}

impl DiagnosticLogger {
    /// Create a logger that writes to standard output.
    pub fn new(config: DiagnosticsConfig) -> Result<Self> {
        Self::with_sink(config, Arc::new(StdoutSink))
    }

    /// Create a logger that writes to `sink`.
    ///
    /// Falls back to a single worker thread if the requested pool cannot be built.
    pub fn with_sink(config: DiagnosticsConfig, sink: Arc<dyn DiagnosticSink>) -> Result<Self> {
        let threads = config.worker_threads.max(1);
        let pool = build_pool(threads).or_else(|e| {
            warn!(threads, error = %e, "falling back to a single diagnostic thread");
            build_pool(1)
        })?;

        debug!(
            threads = pool.current_num_threads(),
            queue_capacity = config.queue_capacity,
            "diagnostic logger started"
        );

        Ok(DiagnosticLogger {
            pool,
            sink,
            pending: Arc::new(Pending::default()),
            queue_capacity: config.queue_capacity.max(1),
        })
    }

    /// Schedule one record for first operand `v`.
    ///
    /// While fewer than `queue_capacity` records are pending this returns without
    /// waiting for the record. When the queue is full the record is written on the
    /// calling thread instead, so this call blocks for that write (for example on a
    /// full stdout pipe). Nothing is dropped and the queue stays bounded.
    pub fn schedule(&self, v: i64) {
        if !self.pending.try_acquire(self.queue_capacity) {
            debug!(
                queue_capacity = self.queue_capacity,
                "diagnostic queue saturated, emitting inline"
            );
            report(emit_guarded(self.sink.as_ref(), diagnostic_value(v)));
            return;
        }

        let sink = Arc::clone(&self.sink);
        let slot = Slot(Arc::clone(&self.pending));
        self.pool.spawn(move || {
            let _slot = slot;
            report(emit_guarded(sink.as_ref(), diagnostic_value(v)));
        });
    }

    /// Number of pool threads.
    pub fn worker_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Pending records allowed before `schedule` writes inline.
    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    /// Number of scheduled records not yet written.
    pub fn pending(&self) -> usize {
        *self.pending.lock()
    }

    /// Block until every scheduled record is written, or `timeout` elapses.
    ///
    /// `None` waits without limit. Returns `true` when nothing is pending.
    pub fn drain(&self, timeout: Option<Duration>) -> bool {
        let count = self.pending.lock();
        let count = match timeout {
            None => self
                .pending
                .idle
                .wait_while(count, |n| *n > 0)
                .unwrap_or_else(PoisonError::into_inner),
            Some(timeout) => {
                self.pending
                    .idle
                    .wait_timeout_while(count, timeout, |n| *n > 0)
                    .unwrap_or_else(PoisonError::into_inner)
                    .0
            }
        };

        let drained = *count == 0;
        if !drained {
            warn!(pending = *count, "diagnostic drain timed out");
        }
        drained
    }
}

fn build_pool(threads: usize) -> Result<rayon::ThreadPool> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("{THREAD_NAME_PREFIX}-{i}"))
        .build()?;
    Ok(pool)
}

/// Run the sink, turning a panic into an error so it never unwinds further.
fn emit_guarded(sink: &dyn DiagnosticSink, value: i64) -> Result<()> {
    match catch_unwind(AssertUnwindSafe(|| sink.emit(value))) {
        Ok(result) => result,
        Err(panic_info) => {
            let msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_info.downcast_ref::<String>() {
                s.clone()
            } else {
                "unknown panic".to_string()
            };
            Err(DiagnosticsError::Panicked(msg))
        }
    }
}

fn report(result: Result<()>) {
    match result {
        Ok(()) => {}
        Err(e @ DiagnosticsError::Panicked(_)) => error!(error = %e, "diagnostic record lost"),
        Err(e) => warn!(error = %e, "diagnostic record lost"),
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    const WAIT: Option<Duration> = Some(Duration::from_secs(10));

    fn config(worker_threads: usize, queue_capacity: usize) -> DiagnosticsConfig {
        DiagnosticsConfig {
            worker_threads,
            queue_capacity,
        }
    }

    #[test]
    fn test_every_record_written_after_drain() {
        let sink = Arc::new(CaptureSink::default());
        let logger = DiagnosticLogger::with_sink(config(2, 64), sink.clone()).unwrap();

        for v in 1..=5 {
            logger.schedule(v);
        }

        assert!(logger.drain(WAIT));
        assert_eq!(logger.pending(), 0);
        assert_eq!(sink.values(), vec![11, 12, 13, 14, 15]);
    }

    #[test]
    fn test_schedule_does_not_wait_for_record() {
        let sink = Arc::new(GatedSink::default());
        let logger = DiagnosticLogger::with_sink(config(1, 8), sink.clone()).unwrap();

        logger.schedule(2);

        // Worker is held by the gate, yet schedule has already returned.
        assert_eq!(logger.pending(), 1);
        assert!(sink.inner.values().is_empty());

        sink.release();
        assert!(logger.drain(WAIT));
        assert_eq!(sink.inner.values(), vec![12]);
    }

    #[test]
    fn test_saturated_queue_emits_inline() {
        let sink = Arc::new(GatedSink::default());
        let logger = DiagnosticLogger::with_sink(config(1, 1), sink.clone()).unwrap();

        logger.schedule(0);
        logger.schedule(1);

        // Second record bypassed the full queue and was written on this thread.
        assert_eq!(logger.pending(), 1);
        assert_eq!(sink.inner.values(), vec![11]);

        sink.release();
        assert!(logger.drain(WAIT));
        assert_eq!(sink.inner.values(), vec![10, 11]);
    }

    #[test]
    fn test_drain_times_out_while_blocked() {
        let sink = Arc::new(GatedSink::default());
        let logger = DiagnosticLogger::with_sink(config(1, 8), sink.clone()).unwrap();

        logger.schedule(5);
        assert!(!logger.drain(Some(Duration::from_millis(50))));

        sink.release();
        assert!(logger.drain(None));
        assert_eq!(sink.inner.values(), vec![15]);
    }

    #[test]
    fn test_drain_when_idle() {
        let logger =
            DiagnosticLogger::with_sink(config(1, 8), Arc::new(CaptureSink::default())).unwrap();
        assert!(logger.drain(Some(Duration::ZERO)));
    }

    #[test]
    fn test_repeated_values_are_not_memoized() {
        let sink = Arc::new(CaptureSink::default());
        let logger = DiagnosticLogger::with_sink(config(2, 64), sink.clone()).unwrap();

        for _ in 0..3 {
            logger.schedule(4);
        }

        assert!(logger.drain(WAIT));
        assert_eq!(sink.values(), vec![14, 14, 14]);
    }

    #[test]
    fn test_panicking_sink_releases_slots() {
        let logger = DiagnosticLogger::with_sink(config(2, 64), Arc::new(PanicSink)).unwrap();

        for v in 0..3 {
            logger.schedule(v);
        }

        assert!(logger.drain(WAIT));
        assert_eq!(logger.pending(), 0);
    }

    #[test]
    fn test_emit_guarded_catches_panic() {
        match emit_guarded(&PanicSink, 3) {
            Err(DiagnosticsError::Panicked(msg)) => assert_eq!(msg, "sink refused 3"),
            other => panic!("expected panic error, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_threads_uses_one() {
        let logger =
            DiagnosticLogger::with_sink(config(0, 0), Arc::new(CaptureSink::default())).unwrap();
        assert_eq!(logger.pool.current_num_threads(), 1);
        assert_eq!(logger.queue_capacity, 1);
    }
}
