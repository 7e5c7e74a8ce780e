//! Metric backend clients.
//!
//! Every client consumes the naming core's output: a tracked request or
//! operation fans out to the four bucket names (see
//! [`crate::bucket::Bucket`]) and is forwarded to the backend transport.
//! [`create_client`] builds the configured implementation, mirroring how
//! the host picks a token store or auth provider from config.

mod log;
mod memory;
mod noop;
mod prometheus;
mod statsd;

pub use log::LogClient;
pub use memory::MemoryClient;
pub use noop::NoopClient;
pub use prometheus::PrometheusClient;
pub use statsd::StatsdClient;

use std::sync::{Arc, Mutex};

use tracing::info;

use crate::bucket::{
    build_http_request_metric_operation, MetricOperation, OperationAlterer, RequestInfo,
    SectionTestError, SectionTestRegistry, SECTION_REQUEST,
};
use crate::config::{BackendConfig, StatsConfig};
use crate::timer::Timer;

/// A metrics backend client.
///
/// Implementations are cheap to share behind an `Arc` and safe to call
/// from concurrent request handlers. Tracking calls never fail: backend
/// trouble degrades to logging, not errors.
pub trait Client: Send + Sync {
    /// Starts a timer suitable for this backend.
    fn build_timer(&self) -> Box<dyn Timer>;

    /// Releases backend resources, if any.
    fn close(&self) {}

    /// Tracks an HTTP request: counters for the derived operation plus
    /// the request timing.
    fn track_request(&self, request: &RequestInfo, timer: Box<dyn Timer>, success: bool);

    /// Tracks a custom operation with outcome counters and an optional
    /// timing.
    fn track_operation(
        &self,
        section: &str,
        operation: MetricOperation,
        timer: Option<Box<dyn Timer>>,
        success: bool,
    );

    /// Tracks a custom operation, incrementing by `n`.
    fn track_operation_n(
        &self,
        section: &str,
        operation: MetricOperation,
        timer: Option<Box<dyn Timer>>,
        n: i64,
        success: bool,
    );

    /// Tracks a custom metric without ok/fail outcome sections.
    fn track_metric(&self, section: &str, operation: MetricOperation);

    /// Tracks a custom metric without outcome sections, incrementing by `n`.
    fn track_metric_n(&self, section: &str, operation: MetricOperation, n: i64);

    /// Tracks an absolute (gauge) value.
    fn track_state(&self, section: &str, operation: MetricOperation, value: i64);

    /// Sets the post-processing hook applied to every HTTP request
    /// operation before its name is built.
    fn set_http_metric_alterer(&self, alterer: Arc<dyn OperationAlterer>);

    /// Sets the section used for HTTP request metrics.
    fn set_http_request_section(&self, section: &str);

    /// Resets the HTTP request section to the default `"request"`.
    fn reset_http_request_section(&self) {
        self.set_http_request_section(SECTION_REQUEST);
    }
}

/// The per-client mutable HTTP tracking settings every implementation
/// shares: the metric section and the optional operation alterer.
pub(crate) struct HttpSettings {
    section: Mutex<String>,
    alterer: Mutex<Option<Arc<dyn OperationAlterer>>>,
}

impl HttpSettings {
    pub(crate) fn new() -> Self {
        HttpSettings {
            section: Mutex::new(SECTION_REQUEST.to_string()),
            alterer: Mutex::new(None),
        }
    }

    pub(crate) fn section(&self) -> String {
        self.section.lock().expect("http settings mutex poisoned").clone()
    }

    pub(crate) fn set_section(&self, section: &str) {
        *self.section.lock().expect("http settings mutex poisoned") = section.to_string();
    }

    pub(crate) fn alterer(&self) -> Option<Arc<dyn OperationAlterer>> {
        self.alterer.lock().expect("http settings mutex poisoned").clone()
    }

    pub(crate) fn set_alterer(&self, alterer: Arc<dyn OperationAlterer>) {
        *self.alterer.lock().expect("http settings mutex poisoned") = Some(alterer);
    }

    /// Derives the request operation with the configured alterer applied.
    pub(crate) fn request_operation(&self, request: &RequestInfo) -> MetricOperation {
        let alterer = self.alterer();
        build_http_request_metric_operation(request, alterer.as_deref())
    }
}

/// Creates the configured metrics client.
///
/// When the config carries second-level-ID settings, the resolved
/// [`crate::bucket::HasIdAtSecondLevel`] alterer is installed on the
/// client before it is returned.
///
/// # Errors
///
/// Fails when the second-level-ID sections text is malformed or names an
/// unregistered section test.
pub fn create_client(
    config: &StatsConfig,
    registry: &SectionTestRegistry,
) -> Result<Arc<dyn Client>, SectionTestError> {
    let client: Arc<dyn Client> = match &config.backend {
        BackendConfig::Log => {
            info!("Using log stats client");
            Arc::new(LogClient::new().with_unicode(config.unicode))
        }
        BackendConfig::Memory => {
            info!("Using in-memory stats client");
            Arc::new(MemoryClient::new().with_unicode(config.unicode))
        }
        BackendConfig::Noop => {
            info!("Using noop stats client");
            Arc::new(NoopClient)
        }
        BackendConfig::Statsd { dsn, prefix } => {
            Arc::new(StatsdClient::new(dsn, prefix).with_unicode(config.unicode))
        }
        BackendConfig::Prometheus { namespace } => {
            info!(namespace = %namespace, "Using Prometheus stats client");
            Arc::new(PrometheusClient::new(namespace).with_unicode(config.unicode))
        }
    };

    if let Some(settings) = &config.second_level_id {
        let alterer = settings.build_alterer(registry)?;
        client.set_http_metric_alterer(Arc::new(alterer));
    }

    Ok(client)
}
