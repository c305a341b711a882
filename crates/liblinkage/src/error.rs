#[derive(Debug, thiserror::Error)]
pub enum LinkageError {
  #[error("invalid configuration: {0}")]
  ConfigError(String),
  #[error("invalid input: {0}")]
  InputShape(String),
  #[error("matching run was cancelled")]
  Cancelled,
}

/// Failure to normalize or compare a single field.
///
/// Those never abort a matching run: the field is scored as 0 and the run
/// carries on.
#[derive(Debug, thiserror::Error)]
pub enum ComparisonError {
  #[error("cannot compare non-scalar value of kind {0}")]
  NonScalar(&'static str),
}
