use std::net::UdpSocket;
use std::sync::Arc;

use cadence::UdpMetricSink;
use tracing::{debug, info, warn};

use crate::bucket::{Bucket, MetricOperation, OperationAlterer, Plain, RequestInfo};
use crate::incrementer::{Incrementer, LogIncrementer, StatsdIncrementer};
use crate::state::{LogState, State, StatsdState};
use crate::timer::{LogTimer, StatsdTimer, Timer};

use super::{Client, HttpSettings};

/// Client that forwards metrics to a statsd daemon over UDP.
///
/// When the DSN is empty or the socket cannot be set up, the client is
/// muted: tracking calls fall through to the log implementations so the
/// application keeps running and the metric names remain observable.
pub struct StatsdClient {
    http: HttpSettings,
    uni_decode: bool,
    client: Option<Arc<cadence::StatsdClient>>,
}

impl StatsdClient {
    pub fn new(dsn: &str, prefix: &str) -> Self {
        info!(dsn, "Trying to connect to statsd instance");

        let client = if dsn.is_empty() {
            debug!("Statsd DSN not provided, client will be muted");
            None
        } else {
            match Self::connect(dsn, prefix) {
                Ok(client) => Some(Arc::new(client)),
                Err(err) => {
                    warn!(
                        dsn,
                        prefix,
                        error = %err,
                        "An error occurred while connecting to statsd, client will be muted"
                    );
                    None
                }
            }
        };

        StatsdClient {
            http: HttpSettings::new(),
            uni_decode: false,
            client,
        }
    }

    fn connect(dsn: &str, prefix: &str) -> Result<cadence::StatsdClient, cadence::MetricError> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        let sink = UdpMetricSink::from(dsn, socket)?;
        Ok(cadence::StatsdClient::from_sink(prefix, sink))
    }

    pub fn with_unicode(mut self, uni_decode: bool) -> Self {
        self.uni_decode = uni_decode;
        self
    }

    /// Whether metrics are falling through to the log.
    pub fn is_muted(&self) -> bool {
        self.client.is_none()
    }

    fn incrementer(&self) -> Box<dyn Incrementer> {
        match &self.client {
            Some(client) => Box::new(StatsdIncrementer::new(client.clone())),
            None => Box::new(LogIncrementer),
        }
    }

    fn state(&self) -> Box<dyn State> {
        match &self.client {
            Some(client) => Box::new(StatsdState::new(client.clone())),
            None => Box::new(LogState),
        }
    }
}

impl Client for StatsdClient {
    fn build_timer(&self) -> Box<dyn Timer> {
        match &self.client {
            Some(client) => Box::new(StatsdTimer::new(client.clone())),
            None => Box::new(LogTimer::new()),
        }
    }

    fn track_request(&self, request: &RequestInfo, mut timer: Box<dyn Timer>, success: bool) {
        let operation = self.http.request_operation(request);
        let bucket = Plain::new(&self.http.section(), &operation, success, self.uni_decode);

        timer.finish(&bucket.metric());
        self.incrementer().increment_all(&bucket);
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
        self.incrementer().increment_all(&bucket);
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
        self.incrementer().increment_all_n(&bucket, n);
    }

    fn track_metric(&self, section: &str, operation: MetricOperation) {
        let bucket = Plain::new(section, &operation, true, self.uni_decode);
        let incrementer = self.incrementer();

        incrementer.increment(&bucket.metric());
        incrementer.increment(&bucket.metric_total());
    }

    fn track_metric_n(&self, section: &str, operation: MetricOperation, n: i64) {
        let bucket = Plain::new(section, &operation, true, self.uni_decode);
        let incrementer = self.incrementer();

        incrementer.increment_n(&bucket.metric(), n);
        incrementer.increment_n(&bucket.metric_total(), n);
    }

    fn track_state(&self, section: &str, operation: MetricOperation, value: i64) {
        let bucket = Plain::new(section, &operation, true, self.uni_decode);

        self.state().set(&bucket.metric(), value);
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
    use super::StatsdClient;

    #[test]
    fn empty_dsn_mutes_the_client() {
        let client = StatsdClient::new("", "app");
        assert!(client.is_muted());
    }

    #[test]
    fn unresolvable_dsn_mutes_the_client() {
        let client = StatsdClient::new("definitely-not-a-host:not-a-port", "app");
        assert!(client.is_muted());
    }
}
