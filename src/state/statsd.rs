use std::sync::Arc;

use cadence::Gauged;
use tracing::debug;

use super::State;

/// State that sends gauge values to statsd.
pub struct StatsdState {
    client: Arc<cadence::StatsdClient>,
}

impl StatsdState {
    pub fn new(client: Arc<cadence::StatsdClient>) -> Self {
        StatsdState { client }
    }
}

impl State for StatsdState {
    fn set(&self, metric: &str, value: i64) {
        if let Err(err) = self.client.gauge(metric, value as f64) {
            debug!(metric, value, error = %err, "Failed to send gauge to statsd");
        }
    }
}
