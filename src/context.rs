//! Propagating the stats client alongside a request.
//!
//! The middleware stores the client in the request extensions so that
//! handlers deep in the stack can track custom operations without
//! threading the client through every signature.

use std::sync::Arc;

use http::Extensions;

use crate::client::{Client, NoopClient};

/// Request-extension wrapper carrying the stats client.
#[derive(Clone)]
pub struct StatsExtension(pub Arc<dyn Client>);

/// Returns the stats client attached to the extensions, or a no-op
/// client when none was attached. Call sites never need to branch on
/// presence.
pub fn client_from_extensions(extensions: &Extensions) -> Arc<dyn Client> {
    extensions
        .get::<StatsExtension>()
        .map(|ext| ext.0.clone())
        .unwrap_or_else(|| Arc::new(NoopClient))
}
