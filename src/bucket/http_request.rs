use http::{HeaderMap, Method, Uri};

use super::plain::Plain;
use super::{Bucket, MetricOperation};

/// Owned view of the request bits metric derivation may look at.
///
/// Decoupled from the body type so the same value can be consulted after
/// the request itself has been consumed by the handler stack.
#[derive(Debug, Clone)]
pub struct RequestInfo {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
}

impl RequestInfo {
    pub fn new(method: Method, uri: Uri) -> Self {
        RequestInfo {
            method,
            uri,
            headers: HeaderMap::new(),
        }
    }

    /// Captures the relevant parts of an `http::Request`.
    pub fn from_request<B>(request: &http::Request<B>) -> Self {
        RequestInfo {
            method: request.method().clone(),
            uri: request.uri().clone(),
            headers: request.headers().clone(),
        }
    }

    /// Returns the raw value of a query parameter, if present.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.uri.query()?.split('&').find_map(|pair| {
            let mut kv = pair.splitn(2, '=');
            if kv.next() == Some(name) {
                Some(kv.next().unwrap_or(""))
            } else {
                None
            }
        })
    }
}

/// Post-processing seam for HTTP request metric operations.
///
/// Implementations receive the extracted operation together with the
/// request view and may override any slot, e.g. to fold query parameters
/// into the name. Implemented for any matching closure.
pub trait OperationAlterer: Send + Sync {
    fn alter(&self, operation: MetricOperation, request: &RequestInfo) -> MetricOperation;
}

impl<F> OperationAlterer for F
where
    F: Fn(MetricOperation, &RequestInfo) -> MetricOperation + Send + Sync,
{
    fn alter(&self, operation: MetricOperation, request: &RequestInfo) -> MetricOperation {
        self(operation, request)
    }
}

/// Splits an HTTP method and path into the 3-slot metric operation.
///
/// Slot 0 is the lower-cased method. The first two non-empty path
/// fragments fill slots 1 and 2; leading, trailing and duplicate slashes
/// are ignored, and anything below the second path level is dropped. The
/// root path leaves both path slots at the empty placeholder.
pub fn build_http_request_metric_operation(
    request: &RequestInfo,
    alterer: Option<&dyn OperationAlterer>,
) -> MetricOperation {
    let mut operation = MetricOperation::new([request.method.as_str().to_lowercase()]);

    if request.uri.path() != "/" {
        let mut slot = 1;
        for fragment in request.uri.path().split('/') {
            if fragment.is_empty() {
                continue;
            }
            operation.set(slot, fragment);
            slot += 1;
            if slot > 2 {
                break;
            }
        }
    }

    match alterer {
        Some(alterer) => alterer.alter(operation, request),
        None => operation,
    }
}

/// Plain-flavored bucket whose operation is derived from an HTTP request.
///
/// Metric names take the forms:
/// - `metric()` -> `<section>.<method>.<path-level-0>.<path-level-1>`
/// - `metric_with_suffix()` -> `<section>-ok|fail.<method>.<path-level-0>.<path-level-1>`
/// - `metric_total()` -> `total.<section>`
/// - `metric_total_with_suffix()` -> `total.<section>-ok|fail`
///
/// The section is normally `"request"` but any string value works.
pub struct HttpRequest {
    plain: Plain,
}

impl HttpRequest {
    pub fn new(
        section: &str,
        request: &RequestInfo,
        success: bool,
        alterer: Option<&dyn OperationAlterer>,
        uni_decode: bool,
    ) -> Self {
        let operation = build_http_request_metric_operation(request, alterer);
        HttpRequest {
            plain: Plain::new(section, &operation, success, uni_decode),
        }
    }
}

impl Bucket for HttpRequest {
    fn metric(&self) -> String {
        self.plain.metric()
    }

    fn metric_with_suffix(&self) -> String {
        self.plain.metric_with_suffix()
    }

    fn metric_total(&self) -> String {
        self.plain.metric_total()
    }

    fn metric_total_with_suffix(&self) -> String {
        self.plain.metric_total_with_suffix()
    }
}
