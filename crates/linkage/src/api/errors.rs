use std::error::Error;

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use liblinkage::prelude::*;
use serde_json::json;
use tracing::*;

pub(super) struct ApiError(pub StatusCode, pub String, pub Option<Vec<String>>);

#[derive(Debug, thiserror::Error)]
pub enum AppError {
  #[error("invalid credentials")]
  InvalidCredentials,
  #[error("missing resource")]
  ResourceNotFound,
  #[error("server error, please check your logs for more information")]
  ServerError,
  #[error(transparent)]
  OtherError(#[from] anyhow::Error),

  #[error("invalid configuration: {0}")]
  ConfigError(String),
  #[error("invalid input: {0}")]
  InputShape(String),
  #[error("matching run was cancelled")]
  Cancelled,
  #[error("matching run did not complete in time")]
  Timeout,
  #[error("too many comparisons requested")]
  TooManyComparisons { requested: usize, limit: usize },
}

impl From<LinkageError> for AppError {
  fn from(value: LinkageError) -> Self {
    match value {
      LinkageError::ConfigError(err) => AppError::ConfigError(err),
      LinkageError::InputShape(err) => AppError::InputShape(err),
      LinkageError::Cancelled => AppError::Cancelled,
    }
  }
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    match ApiError::from(&self).0.is_server_error() {
      true => error!(error = self.source(), "{}", self.to_string()),
      false => warn!(error = self.source(), "{}", self.to_string()),
    }

    ApiError::from(&self).into_response()
  }
}

impl From<&AppError> for ApiError {
  fn from(value: &AppError) -> Self {
    match value {
      AppError::InvalidCredentials => ApiError(StatusCode::UNAUTHORIZED, value.to_string(), None),
      AppError::ResourceNotFound => ApiError(StatusCode::NOT_FOUND, value.to_string(), None),
      AppError::InputShape(_) => ApiError(StatusCode::UNPROCESSABLE_ENTITY, value.to_string(), None),
      AppError::Cancelled | AppError::Timeout => ApiError(StatusCode::SERVICE_UNAVAILABLE, value.to_string(), None),
      AppError::TooManyComparisons { requested, limit } => ApiError(
        StatusCode::PAYLOAD_TOO_LARGE,
        value.to_string(),
        Some(vec![format!("{requested} row pairs would be compared, at most {limit} are allowed")]),
      ),
      AppError::OtherError(inner) => match inner.downcast_ref::<AppError>() {
        Some(inner) => inner.into(),
        _ => ApiError(StatusCode::INTERNAL_SERVER_ERROR, value.to_string(), None),
      },
      _ => ApiError(StatusCode::INTERNAL_SERVER_ERROR, value.to_string(), None),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let payload = match self.2 {
      Some(details) => json!({
          "message": self.1.to_string(),
          "details": details,
      }),
      None => json!({
          "message": self.1.to_string(),
      }),
    };

    (self.0, Json(payload)).into_response()
  }
}
