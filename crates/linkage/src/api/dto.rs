use liblinkage::prelude::*;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Clone, Debug, Deserialize, Validate)]
pub(crate) struct MatchPayload {
  #[validate(custom(function = "has_columns"))]
  pub left: Dataset,
  #[validate(custom(function = "has_columns"))]
  pub right: Dataset,

  #[serde(default)]
  #[validate(nested)]
  pub params: MatchPayloadParams,
}

#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub(crate) struct MatchPayloadParams {
  #[validate(range(min = 0.0, max = 100.0, message = "threshold must be between 0 and 100"))]
  pub threshold: Option<f64>,
}

fn has_columns(dataset: &Dataset) -> Result<(), ValidationError> {
  match dataset.columns.is_empty() {
    true => Err(ValidationError::new("columns").with_message("at least one column must be selected on each dataset".into())),
    false => Ok(()),
  }
}

#[derive(Serialize)]
pub(super) struct MatchResponse {
  pub total: usize,
  pub threshold: f64,
  pub left_columns: Vec<ColumnMetadata>,
  pub right_columns: Vec<ColumnMetadata>,
  pub matches: Vec<CandidatePair>,
}

impl From<MatchSet> for MatchResponse {
  fn from(value: MatchSet) -> Self {
    MatchResponse {
      total: value.len(),
      threshold: value.threshold,
      left_columns: value.left_columns,
      right_columns: value.right_columns,
      matches: value.pairs,
    }
  }
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub(crate) struct ClassifyPayload {
  #[validate(length(min = 1, message = "at least one column must be provided"))]
  pub columns: Vec<String>,
}

#[derive(Serialize)]
pub(super) struct ClassifyResponse {
  pub columns: Vec<ClassifiedColumn>,
}

#[derive(Serialize)]
pub(super) struct ClassifiedColumn {
  pub name: String,
  pub category: Category,
}
