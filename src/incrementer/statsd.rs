use std::sync::Arc;

use cadence::{Counted, CountedExt};
use tracing::debug;

use super::Incrementer;

/// Incrementer that sends counts to statsd.
pub struct StatsdIncrementer {
    client: Arc<cadence::StatsdClient>,
}

impl StatsdIncrementer {
    pub fn new(client: Arc<cadence::StatsdClient>) -> Self {
        StatsdIncrementer { client }
    }
}

impl Incrementer for StatsdIncrementer {
    fn increment(&self, metric: &str) {
        if let Err(err) = self.client.incr(metric) {
            debug!(metric, error = %err, "Failed to send counter to statsd");
        }
    }

    fn increment_n(&self, metric: &str, n: i64) {
        if let Err(err) = self.client.count(metric, n) {
            debug!(metric, n, error = %err, "Failed to send counter to statsd");
        }
    }
}
