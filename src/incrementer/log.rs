use tracing::debug;

use super::Incrementer;

/// Incrementer that writes all increments to the log.
///
/// Also serves as the fallthrough for a muted statsd client.
pub struct LogIncrementer;

impl Incrementer for LogIncrementer {
    fn increment(&self, metric: &str) {
        debug!(metric, "Stats counter increment");
    }

    fn increment_n(&self, metric: &str, n: i64) {
        debug!(metric, n, "Stats counter increment by n");
    }
}
