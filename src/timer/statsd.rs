use std::sync::Arc;
use std::time::{Duration, Instant};

use cadence::Timed;
use tracing::debug;

use super::Timer;

/// Timer that sends finished timings to statsd.
pub struct StatsdTimer {
    client: Arc<cadence::StatsdClient>,
    started_at: Instant,
}

impl StatsdTimer {
    pub fn new(client: Arc<cadence::StatsdClient>) -> Self {
        StatsdTimer {
            client,
            started_at: Instant::now(),
        }
    }
}

impl Timer for StatsdTimer {
    fn finish(&mut self, bucket: &str) -> Duration {
        let elapsed = self.started_at.elapsed();
        if let Err(err) = self.client.time(bucket, elapsed) {
            debug!(bucket, error = %err, "Failed to send timing to statsd");
        }
        elapsed
    }
}
