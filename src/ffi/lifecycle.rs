//! Initialization and shutdown hooks for hosts.

use std::time::Duration;

use tracing_subscriber::EnvFilter;

use crate::diagnostics;

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "async_adder=warn";

/// Optional initializer. Produces no output of its own and returns nothing.
///
/// Side effects on the host process: installs a process-wide stderr `tracing`
/// subscriber as the global default, unless the host already set one (in which
/// case the host's subscriber is left untouched), and starts the diagnostic pool.
/// Hosts that do not want a global subscriber can skip this call entirely; `Add`
/// works without it. Safe to call any number of times.
#[no_mangle]
pub extern "C" fn adder_init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    diagnostics::global();
}

/// Waits for every scheduled diagnostic record to be written.
///
/// # Arguments
/// - `timeout_ms`: maximum wait in milliseconds; 0 waits without limit
///
/// # Returns
/// 0 when nothing is pending, 1 on timeout.
#[no_mangle]
pub extern "C" fn adder_drain(timeout_ms: u32) -> i32 {
    let Some(logger) = diagnostics::global() else {
        // Without a pool every record was written inline.
        return 0;
    };

    let timeout = (timeout_ms != 0).then(|| Duration::from_millis(u64::from(timeout_ms)));
    if logger.drain(timeout) {
        0
    } else {
        1
    }
}

/// Number of diagnostic records scheduled but not yet written.
#[no_mangle]
pub extern "C" fn adder_pending() -> u64 {
    diagnostics::global().map_or(0, |logger| logger.pending() as u64)
}
