use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use prometheus::{CounterVec, Opts, Registry};
use tracing::{debug, warn};

use super::Incrementer;

/// Incrementer backed by Prometheus counter vectors.
///
/// Counter vectors are created lazily, one per metric name, with the
/// label keys seen on first use, and registered into the client's
/// registry. Increments with a mismatched label set are dropped with a
/// warning rather than panicking.
pub struct PrometheusIncrementer {
    registry: Registry,
    counters: Mutex<HashMap<String, CounterVec>>,
}

impl PrometheusIncrementer {
    pub fn new(registry: Registry) -> Self {
        PrometheusIncrementer {
            registry,
            counters: Mutex::new(HashMap::new()),
        }
    }

    fn counter(&self, metric: &str, label_keys: &[&str]) -> Option<CounterVec> {
        let mut counters = self.counters.lock().expect("prometheus incrementer mutex poisoned");
        if let Some(counter) = counters.get(metric) {
            return Some(counter.clone());
        }

        let counter = match CounterVec::new(Opts::new(metric, "Tracked operation count"), label_keys)
        {
            Ok(counter) => counter,
            Err(err) => {
                warn!(metric, error = %err, "Failed to create Prometheus counter");
                return None;
            }
        };
        if let Err(err) = self.registry.register(Box::new(counter.clone())) {
            debug!(metric, error = %err, "Prometheus counter registration failed");
        }
        counters.insert(metric.to_string(), counter.clone());
        Some(counter)
    }

    fn add(&self, metric: &str, labels: &BTreeMap<String, String>, n: f64) {
        let keys: Vec<&str> = labels.keys().map(String::as_str).collect();
        let values: Vec<&str> = labels.values().map(String::as_str).collect();

        let Some(counter) = self.counter(metric, &keys) else {
            return;
        };
        match counter.get_metric_with_label_values(&values) {
            Ok(counter) => counter.inc_by(n),
            Err(err) => warn!(metric, error = %err, "Prometheus counter label mismatch"),
        }
    }
}

impl Incrementer for PrometheusIncrementer {
    fn increment(&self, metric: &str) {
        self.add(metric, &BTreeMap::new(), 1.0);
    }

    fn increment_n(&self, metric: &str, n: i64) {
        self.add(metric, &BTreeMap::new(), n as f64);
    }

    fn increment_with_labels(&self, metric: &str, labels: &BTreeMap<String, String>) {
        self.add(metric, labels, 1.0);
    }

    fn increment_n_with_labels(&self, metric: &str, n: i64, labels: &BTreeMap<String, String>) {
        self.add(metric, labels, n as f64);
    }
}
