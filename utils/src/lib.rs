//! Shared utilities for the reorganization oracle.

pub mod logging;
pub mod time;

pub use logging::{init_logging, init_tracing, LogFormat, UnknownLogFormat};
pub use time::format_duration;
