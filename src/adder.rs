//! The adder itself and the value its diagnostic reports.

use crate::diagnostics::DiagnosticLogger;

/// Offset applied to the first operand in each diagnostic record.
pub const DIAGNOSTIC_OFFSET: i64 = 10;

/// Two's-complement sum of `a` and `b`. Overflow wraps.
#[inline]
pub fn add(a: i64, b: i64) -> i64 {
    a.wrapping_add(b)
}

/// The value printed by a diagnostic record for first operand `v`.
#[inline]
pub fn diagnostic_value(v: i64) -> i64 {
    v.wrapping_add(DIAGNOSTIC_OFFSET)
}

/// Schedules a diagnostic for `a` on `logger` and returns `a + b`.
///
/// The diagnostic is fire-and-forget from the caller's point of view: the sum is
/// returned without waiting for the record to be written.
pub fn add_and_report(logger: &DiagnosticLogger, a: i64, b: i64) -> i64 {
    logger.schedule(a);
    add(a, b)
}
