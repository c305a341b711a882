use axum::{
  RequestPartsExt,
  extract::{FromRef, FromRequestParts},
  http::request::Parts,
};
use axum_extra::{
  TypedHeader,
  headers::{Authorization, authorization::Bearer},
};

use crate::api::{AppState, errors::AppError};

/// Guards the linkage endpoints behind `API_KEY`, when one is configured.
#[non_exhaustive]
pub(crate) struct Auth;

impl<S> FromRequestParts<S> for Auth
where
  S: Send + Sync,
  AppState: FromRef<S>,
{
  type Rejection = AppError;

  async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
    let AppState { config, .. } = AppState::from_ref(state);

    // A malformed header is as good as a missing one.
    let bearer = parts.extract::<Option<TypedHeader<Authorization<Bearer>>>>().await.ok().flatten();

    config.authorize(bearer.as_ref().map(|TypedHeader(header)| header.token()))?;

    Ok(Auth)
  }
}
