//! C FFI layer.
//!
//! This module exports C ABI functions for foreign hosts.
//! All functions are marked with `#[no_mangle]` and use `extern "C"`.
//!
//! The actual logic is in `adder` and `diagnostics`. These functions are thin
//! wrappers that pick the process-wide logger and map results to plain integers.

pub mod lifecycle;
pub mod simple;

pub use lifecycle::{adder_drain, adder_init, adder_pending};
pub use simple::Add;
