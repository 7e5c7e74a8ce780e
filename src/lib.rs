//! Metrics emission for HTTP services.
//!
//! `reqstats` derives bounded, low-cardinality metric names from HTTP
//! request paths and custom operation labels, then forwards counters,
//! gauges and timings to a configurable backend (log, in-memory, statsd
//! or Prometheus).
//!
//! The usual wiring: load a [`config::StatsConfig`], build a client with
//! [`client::create_client`], attach [`middleware::track_requests`] to an
//! axum router, and let the [`bucket`] module turn every request into a
//! `section.method.path0.path1` metric family.

pub mod bucket;
pub mod client;
pub mod config;
pub mod context;
pub mod hooks;
pub mod incrementer;
pub mod middleware;
pub mod state;
pub mod timer;

pub use bucket::{RequestInfo, SECTION_REQUEST};
pub use client::{create_client, Client};
