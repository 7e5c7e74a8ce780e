use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::routing::get;
use axum::{middleware, Extension, Router};
use reqstats::bucket::MetricOperation;
use reqstats::client::Client;
use reqstats::context::StatsExtension;
use reqstats::middleware::track_requests;

pub fn build_app(client: Arc<dyn Client>) -> Router {
    Router::new()
        .route("/", get(ok_handler))
        .route("/users/:user_id", get(ok_handler))
        .route("/jobs", get(jobs_handler))
        .route("/failing", get(failing_handler))
        .layer(middleware::from_fn_with_state(client, track_requests))
}

async fn ok_handler() -> &'static str {
    "ok"
}

async fn failing_handler() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

/// Tracks a custom operation through the client propagated in the
/// request extensions.
async fn jobs_handler(Extension(stats): Extension<StatsExtension>) -> &'static str {
    stats
        .0
        .track_metric("jobs", MetricOperation::new(["handled"]));
    "ok"
}

pub fn request(method: Method, path: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(path)
        .body(Body::empty())
        .expect("failed to build request")
}
