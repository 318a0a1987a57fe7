//! Diagnostic Logger: asynchronous records of each adder call.
//!
//! The FFI layer reaches the process-wide logger through [`global`]. Tests build
//! their own [`DiagnosticLogger`] with a capturing sink.

pub mod config;
pub mod logger;
pub mod sink;

use std::sync::OnceLock;

use tracing::error;

pub use config::DiagnosticsConfig;
pub use logger::DiagnosticLogger;
pub use sink::{DiagnosticSink, StdoutSink};

static GLOBAL: OnceLock<Option<DiagnosticLogger>> = OnceLock::new();

/// The process-wide logger, created with default sizing on first use.
///
/// Returns `None` if no thread pool could be built at all.
pub fn global() -> Option<&'static DiagnosticLogger> {
    GLOBAL
        .get_or_init(|| match DiagnosticLogger::new(DiagnosticsConfig::default()) {
            Ok(logger) => Some(logger),
            Err(e) => {
                error!(error = %e, "diagnostic logger unavailable, records will be written inline");
                None
            }
        })
        .as_ref()
}
