//! Metric name derivation.
//!
//! This module turns HTTP requests and custom operations into bounded,
//! backend-safe metric names. The moving parts:
//!
//! - [`MetricOperation`]: the fixed 3-slot `(method, path0, path1)` tuple
//!   describing one trackable action,
//! - [`sanitize_metric_name`] / [`sanitize_prometheus_metric_name`]: the
//!   two backend-specific escaping policies,
//! - [`Plain`] / [`Prometheus`] / [`HttpRequest`]: the [`Bucket`] name
//!   builders,
//! - [`SectionTestRegistry`] and [`HasIdAtSecondLevel`]: classification of
//!   path segments that are really opaque identifiers,
//! - [`MetricStorage`]: the cardinality-based auto-discovery fallback.

mod http_request;
mod metric_storage;
mod operation;
mod plain;
mod prometheus;
mod sanitize;

pub use http_request::{
    build_http_request_metric_operation, HttpRequest, OperationAlterer, RequestInfo,
};
pub use metric_storage::{MetricStorage, DEFAULT_AUTO_DISCOVER_THRESHOLD};
pub use operation::MetricOperation;
pub use plain::Plain;
pub use prometheus::{sanitize_prometheus_metric_name, Prometheus};
pub use sanitize::sanitize_metric_name;
pub use section_test::{
    HasIdAtSecondLevel, SecondLevelIdConfig, SectionTestCallback, SectionTestDefinition,
    SectionTestError, SectionTestRegistry, SectionsTestsMap, SECTION_TEST_IS_NOT_EMPTY,
    SECTION_TEST_IS_NUMERIC, SECTION_TEST_TRUE,
};

/// Aggregate prefix for rollup metrics (`total.<section>`).
pub const TOTAL_BUCKET: &str = "total";

/// Default section for HTTP request metrics.
pub const SECTION_REQUEST: &str = "request";

/// Slot value for an unset operation position.
pub const METRIC_EMPTY_PLACEHOLDER: &str = "-";

/// Slot value substituted for path segments presumed to be opaque IDs.
pub const METRIC_ID_PLACEHOLDER: &str = "-id-";

/// Prefix flagging a lossy unicode-to-ASCII transliteration.
pub const PREFIX_UNICODE: &str = "-u-";

const SUFFIX_STATUS_OK: &str = "ok";
const SUFFIX_STATUS_FAIL: &str = "fail";

fn operation_status(success: bool) -> &'static str {
    if success {
        SUFFIX_STATUS_OK
    } else {
        SUFFIX_STATUS_FAIL
    }
}

/// Bucket produces the four metric names every tracked action fans out to.
pub trait Bucket {
    /// Operation-detail metric name.
    fn metric(&self) -> String;
    /// Operation-detail metric name carrying the ok/fail outcome.
    fn metric_with_suffix(&self) -> String;
    /// Aggregate metric name, independent of operation detail.
    fn metric_total(&self) -> String;
    /// Aggregate metric name carrying the ok/fail outcome.
    fn metric_total_with_suffix(&self) -> String;
}
