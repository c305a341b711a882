use axum::{
  Router, middleware,
  routing::{get, post},
};
use liblinkage::prelude::*;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::trace::TraceLayer;

use crate::{api::config::Config, trace::build_prometheus};

pub mod config;
pub mod dto;
pub mod errors;

pub mod handlers;
mod middlewares;

#[derive(Clone)]
pub struct AppState {
  pub config: Config,
  pub prometheus: Option<PrometheusHandle>,
  pub linker: Linker,
}

pub fn routes(config: &Config) -> anyhow::Result<Router> {
  let linker = Linker::new(config.linkage_config()?).build()?;

  let prometheus = match config.enable_prometheus {
    true => Some(build_prometheus()?),
    false => None,
  };

  Ok(router(AppState {
    config: config.clone(),
    prometheus,
    linker,
  }))
}

pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/match", post(handlers::match_datasets))
    .route("/classify", post(handlers::classify))
    .route("/categories", get(handlers::categories))
    .fallback(handlers::not_found)
    .layer(middleware::from_fn(middlewares::metrics))
    .layer(middleware::from_fn_with_state(state.clone(), middlewares::logging::api_logger))
    .layer(TraceLayer::new_for_http().make_span_with(middlewares::create_request_span))
    // The routes below will not go through the observability middlewares above
    .route("/healthz", get(handlers::healthz))
    .route("/metrics", get(handlers::prometheus))
    .layer(middleware::from_fn(middlewares::request_id))
    .with_state(state)
}
