use std::borrow::Cow;

use crate::{error::ComparisonError, model::Value};

/// Render a cell as lowercase text, `None` for missing values.
pub(crate) fn normalize(value: &Value) -> Result<Option<Cow<'_, str>>, ComparisonError> {
  match value {
    Value::Null => Ok(None),
    Value::String(s) => Ok(Some(lowercase(s))),
    Value::Bool(b) => Ok(Some(Cow::Borrowed(if *b { "true" } else { "false" }))),
    Value::Number(n) => Ok(Some(Cow::Owned(n.to_string().to_lowercase()))),
    Value::Array(_) => Err(ComparisonError::NonScalar("array")),
    Value::Object(_) => Err(ComparisonError::NonScalar("object")),
  }
}

#[inline]
fn lowercase(s: &str) -> Cow<'_, str> {
  // Titlecase letters (`ǅ`) are not uppercase but still have a lowercase form.
  if s.chars().any(|c| c.to_lowercase().ne(std::iter::once(c))) { Cow::Owned(s.to_lowercase()) } else { Cow::Borrowed(s) }
}

/// Similarity ratio between two strings, from 0 to 100.
///
/// Computed from the insertion/deletion distance over the total length of
/// both strings, rounded to the nearest integer (ties to even).
pub(crate) fn ratio(lhs: &str, rhs: &str) -> f64 {
  if lhs == rhs {
    return 100.0;
  }

  let lhs = lhs.chars().collect::<Vec<_>>();
  let rhs = rhs.chars().collect::<Vec<_>>();
  let total = lhs.len() + rhs.len();

  if total == 0 {
    return 100.0;
  }

  let distance = indel_distance(&lhs, &rhs);

  ((1.0 - distance as f64 / total as f64) * 100.0).round_ties_even()
}

/// Number of insertions and deletions needed to turn `lhs` into `rhs`.
pub(crate) fn indel_distance(lhs: &[char], rhs: &[char]) -> usize {
  lhs.len() + rhs.len() - 2 * longest_common_subsequence(lhs, rhs)
}

fn longest_common_subsequence(lhs: &[char], rhs: &[char]) -> usize {
  let (outer, inner) = if lhs.len() >= rhs.len() { (lhs, rhs) } else { (rhs, lhs) };

  if inner.is_empty() {
    return 0;
  }

  let mut previous = vec![0usize; inner.len() + 1];
  let mut current = vec![0usize; inner.len() + 1];

  for a in outer {
    for (j, b) in inner.iter().enumerate() {
      current[j + 1] = if a == b { previous[j] + 1 } else { previous[j + 1].max(current[j]) };
    }

    std::mem::swap(&mut previous, &mut current);
  }

  previous[inner.len()]
}
