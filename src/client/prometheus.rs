use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use prometheus::{Encoder, HistogramOpts, HistogramVec, Registry, TextEncoder};
use tracing::{debug, warn};

use crate::bucket::{self, Bucket, MetricOperation, OperationAlterer, RequestInfo};
use crate::incrementer::{Incrementer, PrometheusIncrementer};
use crate::state::{PrometheusState, State};
use crate::timer::{MemoryTimer, Timer};

use super::{Client, HttpSettings};

/// Client that records metrics into a Prometheus registry.
///
/// Names come from the Prometheus-flavored bucket builder (underscore
/// joins, placeholder slots dropped); outcome and verb travel as the
/// `success` and `action` labels instead of name suffixes. The registry
/// is owned by the client and can be handed to an exposition endpoint.
pub struct PrometheusClient {
    http: HttpSettings,
    uni_decode: bool,

    namespace: String,
    registry: Registry,
    incrementer: PrometheusIncrementer,
    state: PrometheusState,
    histograms: Mutex<HashMap<String, HistogramVec>>,
}

impl PrometheusClient {
    pub fn new(namespace: &str) -> Self {
        Self::with_registry(namespace, Registry::new())
    }

    /// Builds the client around an existing registry, e.g. the one an
    /// application already exposes on `/metrics`.
    pub fn with_registry(namespace: &str, registry: Registry) -> Self {
        PrometheusClient {
            http: HttpSettings::new(),
            uni_decode: false,
            namespace: namespace.to_string(),
            registry: registry.clone(),
            incrementer: PrometheusIncrementer::new(registry.clone()),
            state: PrometheusState::new(registry),
            histograms: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_unicode(mut self, uni_decode: bool) -> Self {
        self.uni_decode = uni_decode;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Renders all collected metrics in Prometheus text format.
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        if let Err(err) = encoder.encode(&metric_families, &mut buffer) {
            warn!(error = %err, "Failed to encode Prometheus metrics");
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }

    fn prepare_metric(&self, metric: &str) -> String {
        if self.namespace.is_empty() {
            metric.to_string()
        } else {
            format!("{}_{}", self.namespace, metric)
        }
    }

    fn observe_duration(
        &self,
        metric: &str,
        labels: &BTreeMap<String, String>,
        timer: &mut Box<dyn Timer>,
    ) {
        let elapsed = timer.finish(metric);
        let name = format!("{}_seconds", metric);
        let keys: Vec<&str> = labels.keys().map(String::as_str).collect();
        let values: Vec<&str> = labels.values().map(String::as_str).collect();

        let histogram = {
            let mut histograms = self.histograms.lock().expect("prometheus client mutex poisoned");
            match histograms.get(&name) {
                Some(histogram) => histogram.clone(),
                None => {
                    let histogram = match HistogramVec::new(
                        HistogramOpts::new(name.clone(), "Tracked operation duration in seconds"),
                        &keys,
                    ) {
                        Ok(histogram) => histogram,
                        Err(err) => {
                            warn!(metric = %name, error = %err, "Failed to create Prometheus histogram");
                            return;
                        }
                    };
                    if let Err(err) = self.registry.register(Box::new(histogram.clone())) {
                        debug!(metric = %name, error = %err, "Prometheus histogram registration failed");
                    }
                    histograms.insert(name.clone(), histogram.clone());
                    histogram
                }
            }
        };

        match histogram.get_metric_with_label_values(&values) {
            Ok(histogram) => histogram.observe(elapsed.as_secs_f64()),
            Err(err) => warn!(metric = %name, error = %err, "Prometheus histogram label mismatch"),
        }
    }

    fn operation_labels(
        operation: &MetricOperation,
        success: Option<bool>,
    ) -> BTreeMap<String, String> {
        let mut labels = operation.labels.clone().unwrap_or_default();
        if let Some(success) = success {
            labels.insert("success".to_string(), success.to_string());
        }
        labels
    }
}

impl Client for PrometheusClient {
    fn build_timer(&self) -> Box<dyn Timer> {
        Box::new(MemoryTimer::new())
    }

    fn track_request(&self, request: &RequestInfo, mut timer: Box<dyn Timer>, success: bool) {
        let operation = self.http.request_operation(request);
        let bucket =
            bucket::Prometheus::new(&self.http.section(), &operation, success, self.uni_decode);

        let mut labels = BTreeMap::new();
        labels.insert("success".to_string(), success.to_string());
        labels.insert("action".to_string(), request.method.as_str().to_string());

        let metric = self.prepare_metric(&bucket.metric());
        let metric_total = self.prepare_metric(&bucket.metric_total());

        self.observe_duration(&metric, &labels, &mut timer);
        self.incrementer.increment_with_labels(&metric, &labels);
        self.incrementer.increment_with_labels(&metric_total, &labels);
    }

    fn track_operation(
        &self,
        section: &str,
        operation: MetricOperation,
        timer: Option<Box<dyn Timer>>,
        success: bool,
    ) {
        let bucket = bucket::Prometheus::new(section, &operation, success, self.uni_decode);
        let labels = Self::operation_labels(&operation, Some(success));

        let metric = self.prepare_metric(&bucket.metric());
        let metric_total = self.prepare_metric(&bucket.metric_total());

        if let Some(mut timer) = timer {
            self.observe_duration(&metric, &labels, &mut timer);
        }
        self.incrementer.increment_with_labels(&metric, &labels);
        self.incrementer.increment_with_labels(&metric_total, &labels);
    }

    fn track_operation_n(
        &self,
        section: &str,
        operation: MetricOperation,
        timer: Option<Box<dyn Timer>>,
        n: i64,
        success: bool,
    ) {
        let bucket = bucket::Prometheus::new(section, &operation, success, self.uni_decode);
        let labels = Self::operation_labels(&operation, Some(success));

        let metric = self.prepare_metric(&bucket.metric());
        let metric_total = self.prepare_metric(&bucket.metric_total());

        if let Some(mut timer) = timer {
            self.observe_duration(&metric, &labels, &mut timer);
        }
        self.incrementer.increment_n_with_labels(&metric, n, &labels);
        self.incrementer
            .increment_n_with_labels(&metric_total, n, &labels);
    }

    fn track_metric(&self, section: &str, operation: MetricOperation) {
        let bucket = bucket::Prometheus::new(section, &operation, true, self.uni_decode);
        let labels = Self::operation_labels(&operation, None);

        self.incrementer
            .increment_with_labels(&self.prepare_metric(&bucket.metric()), &labels);
        self.incrementer
            .increment_with_labels(&self.prepare_metric(&bucket.metric_total()), &labels);
    }

    fn track_metric_n(&self, section: &str, operation: MetricOperation, n: i64) {
        let bucket = bucket::Prometheus::new(section, &operation, true, self.uni_decode);

        self.incrementer
            .increment_n(&self.prepare_metric(&bucket.metric()), n);
        self.incrementer
            .increment_n(&self.prepare_metric(&bucket.metric_total()), n);
    }

    fn track_state(&self, section: &str, operation: MetricOperation, value: i64) {
        let bucket = bucket::Prometheus::new(section, &operation, true, self.uni_decode);

        self.state.set(&self.prepare_metric(&bucket.metric()), value);
    }

    fn set_http_metric_alterer(&self, alterer: Arc<dyn OperationAlterer>) {
        self.http.set_alterer(alterer);
    }

    fn set_http_request_section(&self, section: &str) {
        self.http.set_section(section);
    }
}

#[cfg(test)]
mod tests {
    use http::Method;

    use super::PrometheusClient;
    use crate::bucket::{MetricOperation, RequestInfo};
    use crate::client::Client;

    #[test]
    fn track_request_records_labeled_counters_and_duration() {
        let client = PrometheusClient::new("service");
        let request = RequestInfo::new(Method::GET, "/foo/bar/baz".parse().unwrap());

        client.track_request(&request, client.build_timer(), true);

        let rendered = client.render();
        assert!(rendered.contains("service_request_get_foo_bar"), "got: {}", rendered);
        assert!(rendered.contains("service_total_request"), "got: {}", rendered);
        assert!(rendered.contains("service_request_get_foo_bar_seconds"), "got: {}", rendered);
        assert!(rendered.contains("success=\"true\""), "got: {}", rendered);
        assert!(rendered.contains("action=\"GET\""), "got: {}", rendered);
    }

    #[test]
    fn placeholder_slots_disappear_from_names() {
        let client = PrometheusClient::new("");

        client.track_operation("foo", MetricOperation::new(["bar", "underscore_baz"]), None, true);

        let rendered = client.render();
        assert!(rendered.contains("foo_bar_underscorebaz"), "got: {}", rendered);
        assert!(!rendered.contains("foo_bar_underscorebaz_"), "got: {}", rendered);
    }

    #[test]
    fn operation_labels_are_forwarded() {
        let client = PrometheusClient::new("");
        let mut labels = std::collections::BTreeMap::new();
        labels.insert("client".to_string(), "mobile".to_string());
        let operation = MetricOperation::new(["do", "things"]).with_labels(labels);

        client.track_operation("jobs", operation, None, true);

        let rendered = client.render();
        assert!(rendered.contains("client=\"mobile\""), "got: {}", rendered);
        assert!(rendered.contains("success=\"true\""), "got: {}", rendered);
    }

    #[test]
    fn track_state_sets_gauges() {
        let client = PrometheusClient::new("");

        client.track_state("queue", MetricOperation::new(["depth"]), 42);
        let rendered = client.render();
        assert!(rendered.contains("queue_depth 42"), "got: {}", rendered);
    }
}
