//! Async Adder - an integer adder with asynchronous diagnostics
//!
//! This library provides a C ABI (`Add`, `adder_init`, `adder_drain`, `adder_pending`)
//! for foreign hosts. Each `Add` call returns the wrapping sum immediately and
//! schedules a diagnostic record on a small background thread pool.

pub mod adder;
pub mod diagnostics;
pub mod error;
pub mod ffi;

pub use adder::{add, add_and_report, diagnostic_value};
pub use diagnostics::{DiagnosticLogger, DiagnosticSink, DiagnosticsConfig, StdoutSink};
pub use error::DiagnosticsError;
pub use ffi::{adder_drain, adder_init, adder_pending, Add};
