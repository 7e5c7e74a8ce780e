use std::time::{Duration, Instant};

use tracing::debug;

use super::Timer;

/// Timer that writes finished timings to the log.
pub struct LogTimer {
    started_at: Instant,
}

impl LogTimer {
    pub fn new() -> Self {
        LogTimer {
            started_at: Instant::now(),
        }
    }
}

impl Default for LogTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer for LogTimer {
    fn finish(&mut self, bucket: &str) -> Duration {
        let elapsed = self.started_at.elapsed();
        debug!(bucket, elapsed = ?elapsed, "Stats timer finished");
        elapsed
    }
}
