use axum::{
  body::Body,
  extract::MatchedPath,
  http::{HeaderValue, Request, StatusCode},
  middleware::Next,
  response::Response,
};
use metrics::counter;
use opentelemetry::global;
use opentelemetry_http::HeaderExtractor;
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;
use uuid::Uuid;

pub(crate) mod auth;
pub(crate) mod json_rejection;
pub(crate) mod logging;

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone, Copy, Debug)]
pub(crate) struct RequestId(pub Uuid);

/// Outcome of a matching run, attached to the `/match` response.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RunSummary {
  pub comparisons: usize,
  pub matches: usize,
}

/// Route template the request was dispatched to, `-` for the fallback.
pub(crate) fn matched_route<B>(request: &Request<B>) -> String {
  request.extensions().get::<MatchedPath>().map(|path| path.as_str().to_string()).unwrap_or_else(|| "-".to_string())
}

/// Tags each request with an identifier, reusing the caller's
/// `x-request-id` when it is a valid UUID, and echoes it on the response.
pub(crate) async fn request_id(mut request: Request<Body>, next: Next) -> Result<Response, StatusCode> {
  let id = request
    .headers()
    .get(REQUEST_ID_HEADER)
    .and_then(|value| value.to_str().ok())
    .and_then(|value| Uuid::try_parse(value).ok())
    .map_or_else(|| RequestId(Uuid::new_v4()), RequestId);

  request.extensions_mut().insert(id);

  let mut response = next.run(request).await;

  if let Ok(value) = HeaderValue::try_from(id.0.hyphenated().to_string()) {
    response.headers_mut().insert(REQUEST_ID_HEADER, value);
  }

  Ok(response)
}

pub(super) async fn metrics(request: Request<Body>, next: Next) -> Result<Response, StatusCode> {
  let route = matched_route(&request);
  let response = next.run(request).await;

  if let Some(run) = response.extensions().get::<RunSummary>() {
    counter!("linkage_row_pairs_total").increment(run.comparisons as u64);
    counter!("linkage_pairs_matched_total").increment(run.matches as u64);
  }

  counter!("http_requests_total", "route" => route, "status" => response.status().as_u16().to_string()).increment(1);

  Ok(response)
}

pub(crate) fn create_request_span<B>(request: &Request<B>) -> Span {
  let parent = global::get_text_map_propagator(|propagator| propagator.extract(&HeaderExtractor(request.headers())));
  let request_id = request.extensions().get::<RequestId>().map(|RequestId(id)| id.to_string()).unwrap_or_default();
  let span = tracing::info_span!("request", request_id);

  let _ = span.set_parent(parent);
  span
}
