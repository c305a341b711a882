use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use liblinkage::prelude::*;
use tracing::{Span, instrument};

use crate::api::{
  AppState,
  dto::{MatchPayload, MatchResponse},
  errors::AppError,
  middlewares::{RunSummary, auth::Auth, json_rejection::TypedJson},
};

#[instrument(skip_all)]
pub async fn match_datasets(State(state): State<AppState>, _: Auth, TypedJson(body): TypedJson<MatchPayload>) -> Result<impl IntoResponse, AppError> {
  let requested = body.left.rows.len().saturating_mul(body.right.rows.len());

  if requested > state.config.max_comparisons {
    return Err(AppError::TooManyComparisons {
      requested,
      limit: state.config.max_comparisons,
    });
  }

  let linker = match body.params.threshold {
    Some(threshold) => state.linker.with_config(state.linker.config().clone().with_threshold(threshold))?,
    None => state.linker.clone(),
  };

  // The run stops at the next candidate pair once this handler is dropped,
  // either because the client went away or the timeout below fired.
  let cancel = Cancellation::default();
  let _guard = cancel.drop_guard();

  let task = tokio::task::spawn_blocking({
    let cancel = cancel.clone();
    let span = Span::current();

    move || span.in_scope(|| linker.find_matches_with(&body.left, &body.right, &cancel))
  });

  let matches = match tokio::time::timeout(state.config.request_timeout, task).await {
    Err(_) => return Err(AppError::Timeout),
    Ok(Err(err)) => {
      tracing::error!(error = %err, "matching task failed");

      return Err(AppError::ServerError);
    }
    Ok(Ok(matches)) => matches?,
  };

  let summary = RunSummary {
    comparisons: requested,
    matches: matches.len(),
  };

  Ok((StatusCode::OK, Extension(summary), Json(MatchResponse::from(matches))))
}
