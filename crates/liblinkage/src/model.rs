use std::{collections::HashMap, fmt};

use ahash::RandomState;
use bon::bon;
use serde::{Deserialize, Serialize, Serializer, ser::SerializeMap};
use serde_inline_default::serde_inline_default;

/// A single cell, as fetched from the source table.
pub type Value = serde_json::Value;

/// A row, keyed by column name.
pub type Row = HashMap<String, Value, RandomState>;

pub(crate) const LEFT_PREFIX: &str = "table1_";
pub(crate) const RIGHT_PREFIX: &str = "table2_";

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
  Identity,
  Contact,
  Name,
  Other,
}

impl Category {
  pub fn as_str(&self) -> &'static str {
    match self {
      Category::Identity => "identity",
      Category::Contact => "contact",
      Category::Name => "name",
      Category::Other => "other",
    }
  }
}

impl fmt::Display for Category {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[serde_inline_default]
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ColumnSpec {
  pub name: String,
  #[serde(rename = "type")]
  #[serde_inline_default("text".to_string())]
  pub data_type: String,
}

impl ColumnSpec {
  pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> ColumnSpec {
    ColumnSpec {
      name: name.into(),
      data_type: data_type.into(),
    }
  }
}

/// A selected column, tagged with the category it was classified into.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ColumnMetadata {
  pub name: String,
  #[serde(rename = "type")]
  pub data_type: String,
  pub category: Category,
}

/// Rows fetched from one table, projected on the selected columns.
///
/// The position of a row in `rows` is its identifier in the match results.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Dataset {
  pub columns: Vec<ColumnSpec>,
  #[serde(default)]
  pub rows: Vec<Row>,
}

#[bon]
impl Dataset {
  #[builder]
  pub fn builder(columns: &[(&str, &str)], #[builder(default)] rows: &[&[(&str, Value)]]) -> Dataset {
    Dataset {
      columns: columns.iter().map(|(name, data_type)| ColumnSpec::new(*name, *data_type)).collect(),
      rows: rows
        .iter()
        .map(|row| row.iter().map(|(column, value)| (column.to_string(), value.clone())).collect::<Row>())
        .collect(),
    }
  }
}

/// A pair of rows whose aggregate score cleared the threshold.
#[derive(Clone, Debug, PartialEq)]
pub struct CandidatePair {
  pub left_id: usize,
  pub right_id: usize,
  pub score: f64,
  /// Selected values from both rows, keyed by `table1_<column>` and
  /// `table2_<column>`, left columns first.
  pub values: Vec<(String, Value)>,
}

impl CandidatePair {
  pub(crate) fn new(left_id: usize, right_id: usize, score: f64, (left, left_row): (&[ColumnSpec], &Row), (right, right_row): (&[ColumnSpec], &Row)) -> CandidatePair {
    let left_values = left.iter().map(|column| (format!("{LEFT_PREFIX}{}", column.name), cell(left_row, &column.name)));
    let right_values = right.iter().map(|column| (format!("{RIGHT_PREFIX}{}", column.name), cell(right_row, &column.name)));

    CandidatePair {
      left_id,
      right_id,
      score,
      values: left_values.chain(right_values).collect(),
    }
  }

  pub fn value(&self, key: &str) -> Option<&Value> {
    self.values.iter().find(|(k, _)| k == key).map(|(_, value)| value)
  }
}

fn cell(row: &Row, column: &str) -> Value {
  row.get(column).cloned().unwrap_or(Value::Null)
}

impl Serialize for CandidatePair {
  fn serialize<S: Serializer>(&self, ser: S) -> Result<S::Ok, S::Error> {
    let mut map = ser.serialize_map(Some(self.values.len() + 3))?;

    map.serialize_entry("table1_id", &self.left_id)?;
    map.serialize_entry("table2_id", &self.right_id)?;
    map.serialize_entry("similarity_score", &self.score)?;

    for (k, v) in &self.values {
      map.serialize_entry(k, v)?;
    }

    map.end()
  }
}

/// Output of a matching run, in enumeration order.
#[derive(Clone, Debug, Serialize)]
pub struct MatchSet {
  pub threshold: f64,
  pub left_columns: Vec<ColumnMetadata>,
  pub right_columns: Vec<ColumnMetadata>,
  pub pairs: Vec<CandidatePair>,
}

impl MatchSet {
  pub fn len(&self) -> usize {
    self.pairs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.pairs.is_empty()
  }

  pub fn iter(&self) -> std::slice::Iter<'_, CandidatePair> {
    self.pairs.iter()
  }
}

impl IntoIterator for MatchSet {
  type Item = CandidatePair;
  type IntoIter = std::vec::IntoIter<CandidatePair>;

  fn into_iter(self) -> Self::IntoIter {
    self.pairs.into_iter()
  }
}
