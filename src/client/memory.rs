use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::bucket::{Bucket, MetricOperation, OperationAlterer, Plain, RequestInfo};
use crate::incrementer::{Incrementer, MemoryIncrementer};
use crate::state::{MemoryState, State};
use crate::timer::{self, MemoryTimer, Timer};

use super::{Client, HttpSettings};

/// Client that records everything in memory, for tests.
///
/// Counters, gauge values and finished timings are all inspectable;
/// `close` resets the recordings.
pub struct MemoryClient {
    http: HttpSettings,
    uni_decode: bool,

    incrementer: MemoryIncrementer,
    state: MemoryState,
    timer_metrics: Mutex<Vec<timer::Metric>>,
}

impl MemoryClient {
    pub fn new() -> Self {
        MemoryClient {
            http: HttpSettings::new(),
            uni_decode: false,
            incrementer: MemoryIncrementer::new(),
            state: MemoryState::new(),
            timer_metrics: Mutex::new(Vec::new()),
        }
    }

    pub fn with_unicode(mut self, uni_decode: bool) -> Self {
        self.uni_decode = uni_decode;
        self
    }

    /// Snapshot of all counter values recorded so far.
    pub fn count_metrics(&self) -> HashMap<String, i64> {
        self.incrementer.metrics()
    }

    /// Snapshot of all gauge values recorded so far.
    pub fn state_metrics(&self) -> HashMap<String, i64> {
        self.state.metrics()
    }

    /// All finished timings in tracking order.
    pub fn timer_metrics(&self) -> Vec<timer::Metric> {
        self.timer_metrics.lock().expect("memory client mutex poisoned").clone()
    }

    fn record_timing(&self, timer: &mut Box<dyn Timer>, bucket: &str) {
        let elapsed = timer.finish(bucket);
        self.timer_metrics
            .lock()
            .expect("memory client mutex poisoned")
            .push(timer::Metric {
                bucket: bucket.to_string(),
                elapsed,
            });
    }
}

impl Default for MemoryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Client for MemoryClient {
    fn build_timer(&self) -> Box<dyn Timer> {
        Box::new(MemoryTimer::new())
    }

    /// Resets all recorded metrics.
    fn close(&self) {
        self.incrementer.reset();
        self.state.reset();
        self.timer_metrics.lock().expect("memory client mutex poisoned").clear();
    }

    fn track_request(&self, request: &RequestInfo, mut timer: Box<dyn Timer>, success: bool) {
        let operation = self.http.request_operation(request);
        let bucket = Plain::new(&self.http.section(), &operation, success, self.uni_decode);

        self.record_timing(&mut timer, &bucket.metric());
        self.incrementer.increment_all(&bucket);
    }

    fn track_operation(
        &self,
        section: &str,
        operation: MetricOperation,
        timer: Option<Box<dyn Timer>>,
        success: bool,
    ) {
        let bucket = Plain::new(section, &operation, success, self.uni_decode);

        if let Some(mut timer) = timer {
            self.record_timing(&mut timer, &bucket.metric_with_suffix());
        }
        self.incrementer.increment_all(&bucket);
    }

    fn track_operation_n(
        &self,
        section: &str,
        operation: MetricOperation,
        timer: Option<Box<dyn Timer>>,
        n: i64,
        success: bool,
    ) {
        let bucket = Plain::new(section, &operation, success, self.uni_decode);

        if let Some(mut timer) = timer {
            self.record_timing(&mut timer, &bucket.metric_with_suffix());
        }
        self.incrementer.increment_all_n(&bucket, n);
    }

    fn track_metric(&self, section: &str, operation: MetricOperation) {
        let bucket = Plain::new(section, &operation, true, self.uni_decode);

        self.incrementer.increment(&bucket.metric());
        self.incrementer.increment(&bucket.metric_total());
    }

    fn track_metric_n(&self, section: &str, operation: MetricOperation, n: i64) {
        let bucket = Plain::new(section, &operation, true, self.uni_decode);

        self.incrementer.increment_n(&bucket.metric(), n);
        self.incrementer.increment_n(&bucket.metric_total(), n);
    }

    fn track_state(&self, section: &str, operation: MetricOperation, value: i64) {
        let bucket = Plain::new(section, &operation, true, self.uni_decode);

        self.state.set(&bucket.metric(), value);
    }

    fn set_http_metric_alterer(&self, alterer: Arc<dyn OperationAlterer>) {
        self.http.set_alterer(alterer);
    }

    fn set_http_request_section(&self, section: &str) {
        self.http.set_section(section);
    }
}
