//! The exported adder.

use tracing::warn;

use crate::adder;
use crate::diagnostics::{self, DiagnosticSink, StdoutSink};

/// Adds two 64-bit integers with wraparound and schedules a diagnostic record for `a`.
///
/// Exported under the plain symbol `Add` so hosts can bind it directly, e.g. with
/// `ctypes` using `argtypes = [c_int64, c_int64]` and `restype = c_int64`.
/// The record is written asynchronously; call `adder_drain` before exiting to
/// make sure it reaches stdout.
#[no_mangle]
#[allow(non_snake_case)]
pub extern "C" fn Add(a: i64, b: i64) -> i64 {
    match diagnostics::global() {
        Some(logger) => adder::add_and_report(logger, a, b),
        None => {
            if let Err(e) = StdoutSink.emit(adder::diagnostic_value(a)) {
                warn!(error = %e, "diagnostic record lost");
            }
            adder::add(a, b)
        }
    }
}
