//! Absolute-value (gauge) metrics, one implementation per backend.

mod log;
mod memory;
mod prometheus;
mod statsd;

pub use log::LogState;
pub use memory::MemoryState;
pub use prometheus::PrometheusState;
pub use statsd::StatsdState;

/// Metric state (gauge) reporting.
pub trait State: Send + Sync {
    /// Sets `metric` to the absolute value `value`.
    fn set(&self, metric: &str, value: i64);
}
