use axum::{Json, extract::State};
use tracing::instrument;

use crate::api::{
  AppState,
  dto::{ClassifiedColumn, ClassifyPayload, ClassifyResponse},
  middlewares::{auth::Auth, json_rejection::TypedJson},
};

#[instrument(skip_all)]
pub async fn classify(State(state): State<AppState>, _: Auth, TypedJson(body): TypedJson<ClassifyPayload>) -> Json<ClassifyResponse> {
  let columns = body
    .columns
    .into_iter()
    .map(|name| ClassifiedColumn {
      category: state.linker.classify(&name),
      name,
    })
    .collect();

  Json(ClassifyResponse { columns })
}
