//! Utility Functions and Cross-Cutting Concerns
//!
//! - **console_macros**: logging macros routed to the browser console or `tracing`
//! - **platform**: clock, sleep and page helpers that differ between WASM and native
//! - **format**: token amount and address formatting

pub mod console_macros;
pub mod format;
pub mod platform;

pub use format::*;
pub use platform::*;
