//! Counter increments, one implementation per backend.

mod log;
mod memory;
mod prometheus;
mod statsd;

pub use log::LogIncrementer;
pub use memory::MemoryIncrementer;
pub use prometheus::PrometheusIncrementer;
pub use statsd::StatsdIncrementer;

use std::collections::BTreeMap;

use crate::bucket::Bucket;

/// Metric counter incrementing.
pub trait Incrementer: Send + Sync {
    /// Increments `metric` by one.
    fn increment(&self, metric: &str);

    /// Increments `metric` by `n`.
    fn increment_n(&self, metric: &str, n: i64);

    /// Increments `metric` by one, attaching labels where the backend
    /// supports them. Backends without label support fall through to the
    /// unlabeled increment.
    fn increment_with_labels(&self, metric: &str, labels: &BTreeMap<String, String>) {
        let _ = labels;
        self.increment(metric);
    }

    /// Increments `metric` by `n` with labels where supported.
    fn increment_n_with_labels(&self, metric: &str, n: i64, labels: &BTreeMap<String, String>) {
        let _ = labels;
        self.increment_n(metric, n);
    }

    /// Increments all four names of a bucket by one.
    fn increment_all(&self, bucket: &dyn Bucket) {
        self.increment(&bucket.metric());
        self.increment(&bucket.metric_with_suffix());
        self.increment(&bucket.metric_total());
        self.increment(&bucket.metric_total_with_suffix());
    }

    /// Increments all four names of a bucket by `n`.
    fn increment_all_n(&self, bucket: &dyn Bucket, n: i64) {
        self.increment_n(&bucket.metric(), n);
        self.increment_n(&bucket.metric_with_suffix(), n);
        self.increment_n(&bucket.metric_total(), n);
        self.increment_n(&bucket.metric_total_with_suffix(), n);
    }
}
