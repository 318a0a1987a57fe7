//! Sizing for the diagnostic logger.
//!
//! The exported surface takes no configuration: the process-wide logger always
//! uses [`DiagnosticsConfig::default`]. Other sizes exist for loggers built directly.

pub const DEFAULT_WORKER_THREADS: usize = 2;
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Sizing for the diagnostic thread pool and its pending-task bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiagnosticsConfig {
    /// Number of pool threads. Values below 1 are raised to 1.
    pub worker_threads: usize,

    /// Maximum number of scheduled but unfinished records before callers emit inline.
    pub queue_capacity: usize,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        DiagnosticsConfig {
            worker_threads: DEFAULT_WORKER_THREADS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}
