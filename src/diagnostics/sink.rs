//! Where diagnostic records are written.

use std::io::{self, Write};

use crate::error::Result;

/// Fixed first line of every diagnostic record.
pub const HEADLINE: &str = "Adding 10 to the first argument for fun yields";

/// Destination for diagnostic records.
///
/// Implementations run on pool threads, so they must be shareable.
pub trait DiagnosticSink: Send + Sync {
    /// Write one record for the already-computed `value`.
    fn emit(&self, value: i64) -> Result<()>;
}

/// Writes records to standard output.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdoutSink;

impl DiagnosticSink for StdoutSink {
    fn emit(&self, value: i64) -> Result<()> {
        // Both lines under one lock so a record is never split by another record.
        let stdout = io::stdout();
        let mut out = stdout.lock();
        write_record(&mut out, value)?;
        out.flush()?;
        Ok(())
    }
}

/// Format one record into `out`.
pub fn write_record<W: Write>(out: &mut W, value: i64) -> io::Result<()> {
    writeln!(out, "{HEADLINE}")?;
    writeln!(out, "{value}")
}
