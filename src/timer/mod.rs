//! Duration measurement for tracked operations.
//!
//! A timer starts measuring when it is built (normally via
//! [`crate::client::Client::build_timer`]) and is consumed by a tracking
//! call, which finishes it against the final metric name.

mod log;
mod memory;
mod statsd;

pub use log::LogTimer;
pub use memory::MemoryTimer;
pub use statsd::StatsdTimer;

use std::time::Duration;

/// A single completed timing measurement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metric {
    pub bucket: String,
    pub elapsed: Duration,
}

/// Metric time tracking.
///
/// Implementations start their clock at construction; `finish` reports
/// the elapsed time to the backend (where one exists) and returns it so
/// the caller can record it elsewhere.
pub trait Timer: Send {
    /// Completes the measurement for `bucket` and returns the elapsed time.
    fn finish(&mut self, bucket: &str) -> Duration;
}
