use axum::{Json, extract::State};
use liblinkage::prelude::*;
use tracing::instrument;

use crate::api::{AppState, middlewares::auth::Auth};

#[instrument(skip_all)]
pub async fn categories(State(state): State<AppState>, _: Auth) -> Json<LinkageConfig> {
  Json(state.linker.config().clone())
}
