//! Tracking hooks for the logging stack.

use std::sync::Arc;

use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::bucket::MetricOperation;
use crate::client::Client;

/// A `tracing-subscriber` layer that counts error-level log events.
///
/// Every ERROR event increments `<section>.error.-.-` (and the section
/// total), giving dashboards an error rate without the application
/// instrumenting each failure path by hand. Lower-severity events pass
/// through untouched, which also keeps the clients' own debug logging
/// from feeding back into itself.
pub struct ErrorCounterLayer {
    client: Arc<dyn Client>,
    section: String,
}

impl ErrorCounterLayer {
    pub fn new(client: Arc<dyn Client>, section: &str) -> Self {
        ErrorCounterLayer {
            client,
            section: section.to_string(),
        }
    }
}

impl<S: Subscriber> Layer<S> for ErrorCounterLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let level = *event.metadata().level();
        if level == Level::ERROR {
            self.client.track_metric(
                &self.section,
                MetricOperation::new([level.as_str().to_lowercase()]),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tracing_subscriber::prelude::*;

    use super::ErrorCounterLayer;
    use crate::client::MemoryClient;

    #[test]
    fn counts_error_events_only() {
        let client = Arc::new(MemoryClient::new());
        let layer = ErrorCounterLayer::new(client.clone(), "log");
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!("boom");
            tracing::error!("boom again");
            tracing::warn!("just a warning");
            tracing::info!("all fine");
        });

        let counts = client.count_metrics();
        assert_eq!(2, counts["log.error.-.-"]);
        assert_eq!(2, counts["total.log"]);
        assert_eq!(2, counts.len());
    }
}
