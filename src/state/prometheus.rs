use std::collections::HashMap;
use std::sync::Mutex;

use prometheus::{GaugeVec, Opts, Registry};
use tracing::{debug, warn};

use super::State;

/// State backed by Prometheus gauge vectors, created lazily per metric
/// name and registered into the client's registry.
pub struct PrometheusState {
    registry: Registry,
    gauges: Mutex<HashMap<String, GaugeVec>>,
}

impl PrometheusState {
    pub fn new(registry: Registry) -> Self {
        PrometheusState {
            registry,
            gauges: Mutex::new(HashMap::new()),
        }
    }

    fn gauge(&self, metric: &str) -> Option<GaugeVec> {
        let mut gauges = self.gauges.lock().expect("prometheus state mutex poisoned");
        if let Some(gauge) = gauges.get(metric) {
            return Some(gauge.clone());
        }

        let gauge = match GaugeVec::new(Opts::new(metric, "Tracked state value"), &[]) {
            Ok(gauge) => gauge,
            Err(err) => {
                warn!(metric, error = %err, "Failed to create Prometheus gauge");
                return None;
            }
        };
        if let Err(err) = self.registry.register(Box::new(gauge.clone())) {
            debug!(metric, error = %err, "Prometheus gauge registration failed");
        }
        gauges.insert(metric.to_string(), gauge.clone());
        Some(gauge)
    }
}

impl State for PrometheusState {
    fn set(&self, metric: &str, value: i64) {
        let Some(gauge) = self.gauge(metric) else {
            return;
        };
        match gauge.get_metric_with_label_values(&[]) {
            Ok(gauge) => gauge.set(value as f64),
            Err(err) => warn!(metric, error = %err, "Prometheus gauge label mismatch"),
        }
    }
}
