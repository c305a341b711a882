use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};

use crate::{
  config::LinkageConfig,
  error::LinkageError,
  model::{Category, ColumnMetadata, ColumnSpec},
};

/// Maps column names to categories.
///
/// Each rule gets its own automaton and rules are tried in configuration
/// order, so a name containing patterns from two categories resolves to the
/// one declared first. Patterns are plain substrings: `name` matches
/// `username`.
#[derive(Clone, Debug)]
pub struct Classifier {
  rules: Vec<(Category, AhoCorasick)>,
}

impl Classifier {
  pub fn new(config: &LinkageConfig) -> Result<Classifier, LinkageError> {
    let rules = config
      .categories
      .iter()
      .map(|rule| {
        let patterns = rule.patterns.iter().map(|pattern| pattern.to_lowercase());
        let automaton = AhoCorasickBuilder::new()
          .match_kind(MatchKind::LeftmostFirst)
          .build(patterns)
          .map_err(|err| LinkageError::ConfigError(format!("invalid patterns for category '{}': {err}", rule.category)))?;

        Ok((rule.category, automaton))
      })
      .collect::<Result<Vec<_>, LinkageError>>()?;

    Ok(Classifier { rules })
  }

  pub fn classify(&self, column: &str) -> Category {
    let column = column.to_lowercase();

    self.rules.iter().find(|(_, automaton)| automaton.is_match(&column)).map(|(category, _)| *category).unwrap_or(Category::Other)
  }

  pub fn classify_columns(&self, columns: &[ColumnSpec]) -> Vec<ColumnMetadata> {
    columns
      .iter()
      .map(|column| ColumnMetadata {
        name: column.name.clone(),
        data_type: column.data_type.clone(),
        category: self.classify(&column.name),
      })
      .collect()
  }
}
