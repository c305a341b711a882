mod categories;
mod classify;
mod match_datasets;

use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::api::{AppState, errors::AppError};

pub use self::categories::categories;
pub use self::classify::classify;
pub use self::match_datasets::match_datasets;

pub async fn not_found() -> impl IntoResponse {
  AppError::ResourceNotFound
}

pub async fn healthz() -> StatusCode {
  StatusCode::OK
}

pub async fn prometheus(State(state): State<AppState>) -> Result<String, AppError> {
  match state.prometheus {
    Some(handle) => Ok(handle.render()),
    None => Err(AppError::ResourceNotFound),
  }
}
