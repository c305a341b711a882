use itertools::Itertools;
use metrics::counter;

use crate::{
  config::LinkageConfig,
  matching::FieldComparator,
  model::{Category, ColumnMetadata, Row, Value},
};

static MISSING: Value = Value::Null;

/// A left and a right column sharing a category, with the category weight.
#[derive(Clone, Debug)]
pub(crate) struct ColumnPair<'c> {
  pub left: &'c ColumnMetadata,
  pub right: &'c ColumnMetadata,
  pub weight: f64,
}

/// All cross-dataset column pairs worth comparing, left columns outer.
///
/// Columns classified as `other` are never paired, even with each other.
pub(crate) fn comparable_columns<'c>(config: &LinkageConfig, left: &'c [ColumnMetadata], right: &'c [ColumnMetadata]) -> Vec<ColumnPair<'c>> {
  left
    .iter()
    .cartesian_product(right.iter())
    .filter(|(lhs, rhs)| lhs.category == rhs.category && lhs.category != Category::Other)
    .map(|(lhs, rhs)| ColumnPair {
      left: lhs,
      right: rhs,
      weight: config.weight(lhs.category),
    })
    .collect()
}

/// Aggregate similarity of two rows.
///
/// Only fields scoring at least `threshold` take part in the weighted
/// average, in both numerator and denominator. Returns `None` when no field
/// qualifies. Comparator output is clamped to `[0, 100]`, NaN counts as 0.
pub(crate) fn score<C: FieldComparator>(comparator: &C, threshold: f64, lhs: &Row, rhs: &Row, columns: &[ColumnPair<'_>]) -> Option<f64> {
  let mut weighted_similarity = 0.0;
  let mut total_weight = 0.0;

  for pair in columns {
    let lvalue = lhs.get(&pair.left.name).unwrap_or(&MISSING);
    let rvalue = rhs.get(&pair.right.name).unwrap_or(&MISSING);

    let similarity = match comparator.compare(lvalue, rvalue, &pair.left.data_type) {
      Ok(similarity) if similarity.is_nan() => {
        counter!("linkage_comparison_errors_total").increment(1);

        tracing::warn!(left = pair.left.name.as_str(), right = pair.right.name.as_str(), "comparator returned NaN, scoring as 0");

        0.0
      }

      Ok(similarity) => similarity.clamp(0.0, 100.0),

      Err(err) => {
        counter!("linkage_comparison_errors_total").increment(1);

        tracing::warn!(error = %err, left = pair.left.name.as_str(), right = pair.right.name.as_str(), "could not compare fields, scoring as 0");

        0.0
      }
    };

    tracing::trace!(left = pair.left.name.as_str(), right = pair.right.name.as_str(), similarity, "compared fields");

    if similarity >= threshold {
      weighted_similarity += similarity * pair.weight;
      total_weight += pair.weight;
    }
  }

  if total_weight == 0.0 {
    return None;
  }

  Some(weighted_similarity / total_weight)
}
