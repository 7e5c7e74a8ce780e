use std::sync::Arc;

use crate::bucket::{Bucket, MetricOperation, OperationAlterer, Plain, RequestInfo};
use crate::incrementer::{Incrementer, LogIncrementer};
use crate::state::{LogState, State};
use crate::timer::{LogTimer, Timer};

use super::{Client, HttpSettings};

/// Client that writes every metric to the log instead of a backend.
///
/// Useful for development environments without a statsd/Prometheus
/// setup: the emitted names are exactly what a real backend would get.
pub struct LogClient {
    http: HttpSettings,
    uni_decode: bool,
}

impl LogClient {
    pub fn new() -> Self {
        LogClient {
            http: HttpSettings::new(),
            uni_decode: false,
        }
    }

    pub fn with_unicode(mut self, uni_decode: bool) -> Self {
        self.uni_decode = uni_decode;
        self
    }
}

impl Default for LogClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Client for LogClient {
    fn build_timer(&self) -> Box<dyn Timer> {
        Box::new(LogTimer::new())
    }

    fn track_request(&self, request: &RequestInfo, mut timer: Box<dyn Timer>, success: bool) {
        let operation = self.http.request_operation(request);
        let bucket = Plain::new(&self.http.section(), &operation, success, self.uni_decode);

        timer.finish(&bucket.metric());
        LogIncrementer.increment_all(&bucket);
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
            timer.finish(&bucket.metric_with_suffix());
        }
        LogIncrementer.increment_all(&bucket);
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
            timer.finish(&bucket.metric_with_suffix());
        }
        LogIncrementer.increment_all_n(&bucket, n);
    }

    fn track_metric(&self, section: &str, operation: MetricOperation) {
        let bucket = Plain::new(section, &operation, true, self.uni_decode);

        LogIncrementer.increment(&bucket.metric());
        LogIncrementer.increment(&bucket.metric_total());
    }

    fn track_metric_n(&self, section: &str, operation: MetricOperation, n: i64) {
        let bucket = Plain::new(section, &operation, true, self.uni_decode);

        LogIncrementer.increment_n(&bucket.metric(), n);
        LogIncrementer.increment_n(&bucket.metric_total(), n);
    }

    fn track_state(&self, section: &str, operation: MetricOperation, value: i64) {
        let bucket = Plain::new(section, &operation, true, self.uni_decode);

        LogState.set(&bucket.metric(), value);
    }

    fn set_http_metric_alterer(&self, alterer: Arc<dyn OperationAlterer>) {
        self.http.set_alterer(alterer);
    }

    fn set_http_request_section(&self, section: &str) {
        self.http.set_section(section);
    }
}
