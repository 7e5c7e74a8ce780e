use std::collections::HashMap;
use std::sync::Mutex;

use super::Incrementer;

/// Incrementer that accumulates counts in memory, for tests.
#[derive(Default)]
pub struct MemoryIncrementer {
    metrics: Mutex<HashMap<String, i64>>,
}

impl MemoryIncrementer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all counts recorded so far.
    pub fn metrics(&self) -> HashMap<String, i64> {
        self.metrics.lock().expect("memory incrementer mutex poisoned").clone()
    }

    pub fn reset(&self) {
        self.metrics.lock().expect("memory incrementer mutex poisoned").clear();
    }
}

impl Incrementer for MemoryIncrementer {
    fn increment(&self, metric: &str) {
        self.increment_n(metric, 1);
    }

    fn increment_n(&self, metric: &str, n: i64) {
        let mut metrics = self.metrics.lock().expect("memory incrementer mutex poisoned");
        *metrics.entry(metric.to_string()).or_insert(0) += n;
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryIncrementer;
    use crate::bucket::{Bucket, MetricOperation, Plain};
    use crate::incrementer::Incrementer;

    #[test]
    fn accumulates_counts() {
        let incrementer = MemoryIncrementer::new();
        incrementer.increment("foo");
        incrementer.increment("foo");
        incrementer.increment_n("bar", 5);

        let metrics = incrementer.metrics();
        assert_eq!(2, metrics["foo"]);
        assert_eq!(5, metrics["bar"]);
    }

    #[test]
    fn increment_all_emits_the_four_bucket_names() {
        let incrementer = MemoryIncrementer::new();
        let bucket = Plain::new("section", &MetricOperation::new(["get", "foo", "bar"]), true, false);
        incrementer.increment_all(&bucket);

        let metrics = incrementer.metrics();
        assert_eq!(1, metrics[&bucket.metric()]);
        assert_eq!(1, metrics[&bucket.metric_with_suffix()]);
        assert_eq!(1, metrics[&bucket.metric_total()]);
        assert_eq!(1, metrics[&bucket.metric_total_with_suffix()]);
    }
}
