//! HTTP request tracking middleware for axum.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::bucket::RequestInfo;
use crate::client::Client;
use crate::context::StatsExtension;

/// Middleware that tracks every request passing through the router.
///
/// The stats client is attached to the request extensions for handlers
/// (see [`crate::context`]), the request is timed around the inner
/// stack, and tracked on the way out with success derived from the
/// response status (everything below 400 counts as success).
///
/// Use with `axum::middleware::from_fn_with_state`:
/// ```ignore
/// let client = create_client(&config, &registry)?;
/// Router::new()
///     .route("/users/:id", get(handler))
///     .layer(middleware::from_fn_with_state(client, track_requests));
/// ```
pub async fn track_requests(
    State(client): State<Arc<dyn Client>>,
    mut request: Request,
    next: Next,
) -> Response {
    let info = RequestInfo::from_request(&request);
    request.extensions_mut().insert(StatsExtension(client.clone()));

    let timer = client.build_timer();
    let response = next.run(request).await;

    let success = response.status().as_u16() < 400;
    client.track_request(&info, timer, success);

    response
}
