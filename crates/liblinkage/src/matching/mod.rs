use crate::{
  error::ComparisonError,
  model::{Dataset, Value},
};

pub(crate) mod classifier;
pub(crate) mod comparers;
pub(crate) mod scorer;

/// Field-level similarity, from 0 to 100.
///
/// `data_type` is the declared type of the left column, as reported by the
/// source. Implementations may use it for type-aware comparison. Results
/// outside `[0, 100]` are clamped by the scorer and NaN is treated as 0.
pub trait FieldComparator: Send + Sync {
  fn name(&self) -> &'static str;
  fn compare(&self, lhs: &Value, rhs: &Value, data_type: &str) -> Result<f64, ComparisonError>;
}

/// Compares every value as lowercase text, regardless of its declared type.
#[derive(Clone, Copy, Debug, Default)]
pub struct TextRatio;

impl FieldComparator for TextRatio {
  fn name(&self) -> &'static str {
    "text_ratio"
  }

  #[tracing::instrument(level = "trace", name = "text_ratio", skip_all)]
  fn compare(&self, lhs: &Value, rhs: &Value, _data_type: &str) -> Result<f64, ComparisonError> {
    let (Some(lhs), Some(rhs)) = (comparers::normalize(lhs)?, comparers::normalize(rhs)?) else {
      return Ok(0.0);
    };

    Ok(comparers::ratio(&lhs, &rhs))
  }
}

/// Chooses which right rows are scored against a given left row.
///
/// Implementations must yield indices in ascending order so results stay in
/// row-major order.
pub trait PairGenerator: Send + Sync {
  fn name(&self) -> &'static str;
  fn candidates(&self, left: &Dataset, right: &Dataset, row: usize) -> impl Iterator<Item = usize> + Send;
}

/// Scores every left row against every right row.
#[derive(Clone, Copy, Debug, Default)]
pub struct CrossProduct;

impl PairGenerator for CrossProduct {
  fn name(&self) -> &'static str {
    "cross_product"
  }

  fn candidates(&self, _left: &Dataset, right: &Dataset, _row: usize) -> impl Iterator<Item = usize> + Send {
    0..right.rows.len()
  }
}

#[cfg(test)]
mod tests {
  use float_cmp::assert_approx_eq;
  use serde_json::json;

  use crate::{
    error::ComparisonError,
    matching::{CrossProduct, FieldComparator, PairGenerator, TextRatio},
    model::Dataset,
  };

  #[test]
  fn text_ratio_bounds() {
    let values = [json!("a@x.com"), json!("A@X.COM"), json!("John Smith"), json!(42), json!(4.2), json!(false), json!(""), json!("ÉLODIE")];

    for lhs in &values {
      assert_eq!(TextRatio.compare(lhs, lhs, "text").unwrap(), 100.0);
      assert_eq!(TextRatio.compare(lhs, &json!(null), "text").unwrap(), 0.0);
      assert_eq!(TextRatio.compare(&json!(null), lhs, "text").unwrap(), 0.0);

      for rhs in &values {
        let score = TextRatio.compare(lhs, rhs, "text").unwrap();

        assert!((0.0..=100.0).contains(&score));
        assert_approx_eq!(f64, score, TextRatio.compare(rhs, lhs, "text").unwrap());
      }
    }
  }

  #[test]
  fn text_ratio_ignores_declared_type() {
    assert_eq!(TextRatio.compare(&json!(12345), &json!("12345"), "integer").unwrap(), 100.0);
    assert_eq!(TextRatio.compare(&json!("John SMITH"), &json!("john smith"), "varchar").unwrap(), 100.0);
    assert_eq!(TextRatio.compare(&json!("kitten"), &json!("sitting"), "date").unwrap(), 62.0);
  }

  #[test]
  fn text_ratio_titlecase_letters() {
    assert_eq!(TextRatio.compare(&json!("ǅ"), &json!("ǆ"), "text").unwrap(), 100.0);
    assert_eq!(TextRatio.compare(&json!("ᾈ"), &json!("ᾀ"), "text").unwrap(), 100.0);
  }

  #[test]
  fn text_ratio_null_is_never_similar() {
    assert_eq!(TextRatio.compare(&json!(null), &json!(null), "text").unwrap(), 0.0);
  }

  #[test]
  fn text_ratio_non_scalar() {
    assert!(matches!(TextRatio.compare(&json!(["a"]), &json!("a"), "text"), Err(ComparisonError::NonScalar(_))));
    assert!(matches!(TextRatio.compare(&json!("a"), &json!({ "a": 1 }), "text"), Err(ComparisonError::NonScalar(_))));
  }

  #[test]
  fn cross_product() {
    let left = Dataset::builder().columns(&[("email", "text")]).rows(&[&[("email", json!("a"))], &[("email", json!("b"))]]).build();
    let right = Dataset::builder()
      .columns(&[("email", "text")])
      .rows(&[&[("email", json!("a"))], &[("email", json!("b"))], &[("email", json!("c"))]])
      .build();

    assert_eq!(CrossProduct.candidates(&left, &right, 0).collect::<Vec<_>>(), [0, 1, 2]);
    assert_eq!(CrossProduct.candidates(&left, &right, 1).collect::<Vec<_>>(), [0, 1, 2]);
    assert_eq!(CrossProduct.candidates(&left, &Dataset::default(), 0).count(), 0);
  }
}
