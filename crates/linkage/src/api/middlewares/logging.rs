use std::net::SocketAddr;

use axum::{
  body::{Body, HttpBody},
  extract::{ConnectInfo, State},
  http::{Request, StatusCode},
  middleware::Next,
  response::Response,
};
use jiff::Timestamp;
use opentelemetry::{KeyValue, global, trace::TraceContextExt};
use tokio::time::Instant;
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;

use crate::api::{
  AppState,
  middlewares::{RunSummary, matched_route},
};

/// One access log line per request.
///
/// `/match` responses carry a `RunSummary`, whose row pair and match
/// counts are appended to the line.
pub async fn api_logger(State(state): State<AppState>, request: Request<Body>, next: Next) -> Result<Response, StatusCode> {
  let received_at = Timestamp::now();
  let method = request.method().clone();
  let uri = request.uri().clone();
  let route = matched_route(&request);
  let remote = request.extensions().get::<ConnectInfo<SocketAddr>>().map(|ConnectInfo(addr)| addr.ip().to_string());

  let then = Instant::now();
  let response = next.run(request).await;
  let elapsed = then.elapsed();

  global::meter("linkage")
    .f64_histogram("request_latency")
    .build()
    .record(elapsed.as_secs_f64() * 1000.0, &[KeyValue::new("route", route.clone())]);

  let trace = state.config.enable_tracing.then(|| Span::current().context().span().span_context().trace_id().to_string());
  let summary = response.extensions().get::<RunSummary>().copied();

  tracing::info!(
    time = %received_at.strftime("%Y-%m-%dT%H:%M:%S%z"),
    trace,
    remote = remote.as_deref().unwrap_or("-"),
    method = %method,
    path = uri.path(),
    route,
    status = response.status().as_u16(),
    latency = elapsed.as_millis(),
    size = response.size_hint().exact().unwrap_or(0),
    comparisons = summary.map(|run| run.comparisons),
    matches = summary.map(|run| run.matches),
    "{} {}",
    method,
    uri,
  );

  Ok(response)
}
