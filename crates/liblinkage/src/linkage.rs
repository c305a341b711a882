use std::sync::Arc;

use ahash::HashSet;
use bon::bon;

use crate::{
  cancel::Cancellation,
  config::LinkageConfig,
  error::LinkageError,
  matching::{
    CrossProduct, FieldComparator, PairGenerator, TextRatio,
    classifier::Classifier,
    scorer::{self, comparable_columns},
  },
  model::{Category, ColumnMetadata, ColumnSpec, Dataset, MatchSet, Row},
  scoring,
};

/// The main entrypoint for linking records across two datasets.
///
/// A `Linker` holds a validated [`LinkageConfig`] and the classifier built from
/// it. It performs no I/O: both datasets must be fully fetched before calling
/// [`Linker::find_matches`].
///
/// # Examples
///
/// ```rust
/// # use liblinkage::prelude::*;
/// # use serde_json::json;
/// let linker = Linker::new(LinkageConfig::default()).build().unwrap();
///
/// let customers = Dataset::builder()
///   .columns(&[("email", "varchar"), ("full_name", "varchar")])
///   .rows(&[&[("email", json!("a@x.com")), ("full_name", json!("John Smith"))]])
///   .build();
///
/// let users = Dataset::builder()
///   .columns(&[("user_email", "varchar"), ("name", "varchar")])
///   .rows(&[&[("user_email", json!("a@x.com")), ("name", json!("JOHN SMITH"))]])
///   .build();
///
/// let matches = linker.find_matches(&customers, &users).unwrap();
///
/// for pair in matches.iter() {
///   println!("{} <-> {}: {}", pair.left_id, pair.right_id, pair.score);
/// }
/// ```
///
/// This struct can be safely cloned and sent across thread boundaries.
#[derive(Clone, Debug)]
pub struct Linker<C: FieldComparator = TextRatio, G: PairGenerator = CrossProduct> {
  config: Arc<LinkageConfig>,
  classifier: Arc<Classifier>,
  comparator: C,
  generator: G,
}

#[bon]
impl Linker {
  /// Create a linker comparing fields as text over the full cross product.
  #[allow(clippy::new_ret_no_self)]
  #[builder(start_fn = new, finish_fn = build)]
  pub fn _new(#[builder(start_fn)] config: LinkageConfig) -> Result<Linker, LinkageError> {
    Linker::assemble(config, TextRatio, CrossProduct)
  }
}

#[bon]
impl<C: FieldComparator, G: PairGenerator> Linker<C, G> {
  /// Create a linker with a custom field comparator and pair generator.
  #[builder(finish_fn = build)]
  pub fn custom(#[builder(start_fn)] config: LinkageConfig, comparator: C, generator: G) -> Result<Linker<C, G>, LinkageError> {
    Linker::assemble(config, comparator, generator)
  }
}

impl<C: FieldComparator, G: PairGenerator> Linker<C, G> {
  fn assemble(config: LinkageConfig, comparator: C, generator: G) -> Result<Linker<C, G>, LinkageError> {
    config.check()?;

    let classifier = Classifier::new(&config)?;

    tracing::debug!(
      categories = config.categories.len(),
      threshold = config.threshold,
      comparator = comparator.name(),
      generator = generator.name(),
      "initialized linker"
    );

    Ok(Linker {
      config: Arc::new(config),
      classifier: Arc::new(classifier),
      comparator,
      generator,
    })
  }

  pub fn config(&self) -> &LinkageConfig {
    &self.config
  }

  /// Derive a linker sharing this one's comparator and generator.
  pub fn with_config(&self, config: LinkageConfig) -> Result<Linker<C, G>, LinkageError>
  where
    C: Clone,
    G: Clone,
  {
    Linker::assemble(config, self.comparator.clone(), self.generator.clone())
  }

  pub fn classify(&self, column: &str) -> Category {
    self.classifier.classify(column)
  }

  pub fn classify_columns(&self, columns: &[ColumnSpec]) -> Vec<ColumnMetadata> {
    self.classifier.classify_columns(columns)
  }

  /// Aggregate score of a single row pair, `None` when no field qualifies.
  pub fn score(&self, lhs: &Row, rhs: &Row, left: &[ColumnMetadata], right: &[ColumnMetadata]) -> Option<f64> {
    let columns = comparable_columns(&self.config, left, right);

    scorer::score(&self.comparator, self.config.threshold, lhs, rhs, &columns)
  }

  /// Find all row pairs across both datasets whose score clears the threshold.
  pub fn find_matches(&self, left: &Dataset, right: &Dataset) -> Result<MatchSet, LinkageError> {
    self.find_matches_with(left, right, &Cancellation::default())
  }

  /// Same as [`Linker::find_matches`], but gives up as soon as `cancel` is
  /// triggered. A cancelled run returns no partial results.
  pub fn find_matches_with(&self, left: &Dataset, right: &Dataset, cancel: &Cancellation) -> Result<MatchSet, LinkageError> {
    check_shape("left", left)?;
    check_shape("right", right)?;

    let left_columns = self.classifier.classify_columns(&left.columns);
    let right_columns = self.classifier.classify_columns(&right.columns);

    scoring::run(&self.config, &self.comparator, &self.generator, left, right, left_columns, right_columns, cancel)
  }
}

fn check_shape(side: &str, dataset: &Dataset) -> Result<(), LinkageError> {
  if dataset.columns.is_empty() {
    return Err(LinkageError::InputShape(format!("no column selected for the {side} dataset")));
  }

  let mut seen = HashSet::default();

  for column in &dataset.columns {
    if !seen.insert(column.name.as_str()) {
      return Err(LinkageError::InputShape(format!("column '{}' is selected twice in the {side} dataset", column.name)));
    }
  }

  for (index, row) in dataset.rows.iter().enumerate() {
    if let Some(column) = dataset.columns.iter().find(|column| !row.contains_key(&column.name)) {
      return Err(LinkageError::InputShape(format!("row {index} of the {side} dataset is missing column '{}'", column.name)));
    }
  }

  Ok(())
}
