use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Default number of distinct second-level values after which a first
/// path segment is presumed to host opaque identifiers.
pub const DEFAULT_AUTO_DISCOVER_THRESHOLD: usize = 25;

/// Cardinality tracker behind second-level-ID auto-discovery.
///
/// For every first path segment it remembers up to `threshold` distinct
/// second-level values. Below the threshold a segment is never flagged,
/// so low-cardinality children like `/token/revoke` stay trackable. Once
/// the threshold is reached the segment is considered ID-bearing for the
/// rest of the process's life; the latch is one-way and the sets are
/// never evicted. Memory stays bounded per key because insertion stops
/// at the cap.
#[derive(Debug)]
pub struct MetricStorage {
    threshold: usize,
    metrics: Mutex<HashMap<String, HashSet<String>>>,
}

impl MetricStorage {
    pub fn new(threshold: usize) -> Self {
        MetricStorage {
            threshold,
            metrics: Mutex::new(HashMap::new()),
        }
    }

    /// Records `second_section` under `first_section` and reports whether
    /// the first section now looks like it hosts IDs.
    pub fn looks_like_id(&self, first_section: &str, second_section: &str) -> bool {
        let mut metrics = self.metrics.lock().expect("metric storage mutex poisoned");
        let seen = metrics.entry(first_section.to_string()).or_default();

        if seen.len() < self.threshold {
            seen.insert(second_section.to_string());
        }

        seen.len() >= self.threshold
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::MetricStorage;

    #[test]
    fn latches_at_threshold_and_stays_latched() {
        let storage = MetricStorage::new(25);
        let first = "storage.test.key";

        for i in 0..storage.threshold() - 1 {
            assert!(!storage.looks_like_id(first, &i.to_string()));
        }

        // 25th distinct value flips the latch.
        assert!(storage.looks_like_id(first, "brand-new"));
        // Already-seen and brand-new values keep reporting true.
        assert!(storage.looks_like_id(first, "0"));
        assert!(storage.looks_like_id(first, "another-new"));
    }

    #[test]
    fn repeated_values_do_not_advance_the_count() {
        let storage = MetricStorage::new(3);
        assert!(!storage.looks_like_id("foo", "a"));
        assert!(!storage.looks_like_id("foo", "a"));
        assert!(!storage.looks_like_id("foo", "b"));
        assert!(storage.looks_like_id("foo", "c"));
    }

    #[test]
    fn set_growth_stops_at_the_cap() {
        let storage = MetricStorage::new(2);
        for i in 0..10 {
            storage.looks_like_id("foo", &i.to_string());
        }
        let metrics = storage.metrics.lock().unwrap();
        assert_eq!(2, metrics["foo"].len());
    }

    #[test]
    fn keys_are_tracked_independently() {
        let storage = MetricStorage::new(2);
        assert!(!storage.looks_like_id("foo", "a"));
        assert!(!storage.looks_like_id("bar", "a"));
        assert!(storage.looks_like_id("foo", "b"));
        assert!(!storage.looks_like_id("bar", "a"));
    }
}
