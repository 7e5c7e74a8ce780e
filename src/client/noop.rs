use std::sync::Arc;

use crate::bucket::{MetricOperation, OperationAlterer, RequestInfo};
use crate::timer::{MemoryTimer, Timer};

use super::Client;

/// Client that discards everything.
///
/// Returned by [`crate::context::client_from_extensions`] when no client
/// was attached, so call sites never need to branch on presence.
pub struct NoopClient;

impl Client for NoopClient {
    fn build_timer(&self) -> Box<dyn Timer> {
        Box::new(MemoryTimer::new())
    }

    fn track_request(&self, _request: &RequestInfo, _timer: Box<dyn Timer>, _success: bool) {}

    fn track_operation(
        &self,
        _section: &str,
        _operation: MetricOperation,
        _timer: Option<Box<dyn Timer>>,
        _success: bool,
    ) {
    }

    fn track_operation_n(
        &self,
        _section: &str,
        _operation: MetricOperation,
        _timer: Option<Box<dyn Timer>>,
        _n: i64,
        _success: bool,
    ) {
    }

    fn track_metric(&self, _section: &str, _operation: MetricOperation) {}

    fn track_metric_n(&self, _section: &str, _operation: MetricOperation, _n: i64) {}

    fn track_state(&self, _section: &str, _operation: MetricOperation, _value: i64) {}

    fn set_http_metric_alterer(&self, _alterer: Arc<dyn OperationAlterer>) {}

    fn set_http_request_section(&self, _section: &str) {}
}
