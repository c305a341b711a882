use std::sync::LazyLock;

use ahash::HashSet;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};
use serde_inline_default::serde_inline_default;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::{error::LinkageError, model::Category};

#[derive(Embed)]
#[folder = "./assets"]
struct Assets;

/// Category table shipped with the library.
pub static DEFAULT_CONFIG: LazyLock<LinkageConfig> = LazyLock::new(|| {
  let file = Assets::get("categories.yml").expect("could not read default categories");

  serde_yaml::from_slice::<LinkageConfig>(&file.data).expect("could not unmarshal default categories")
});

/// Matching configuration, fixed for the lifetime of a [`Linker`](crate::Linker).
///
/// Rules are evaluated in order, so the position of a category in
/// `categories` is its precedence during classification.
#[serde_inline_default]
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
pub struct LinkageConfig {
  #[validate(nested, length(min = 1, message = "at least one category must be configured"))]
  pub categories: Vec<CategoryRule>,
  #[serde_inline_default(0.2)]
  #[validate(range(min = 0.0, max = 1.0, message = "fallback weight must be between 0 and 1"))]
  pub fallback_weight: f64,
  #[serde_inline_default(85.0)]
  #[validate(range(min = 0.0, max = 100.0, message = "threshold must be between 0 and 100"))]
  pub threshold: f64,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
pub struct CategoryRule {
  pub category: Category,
  #[validate(range(min = 0.0, max = 1.0, message = "category weight must be between 0 and 1"))]
  pub weight: f64,
  #[validate(length(min = 1, message = "categories must have at least one pattern"))]
  pub patterns: Vec<String>,
}

impl Default for LinkageConfig {
  fn default() -> Self {
    DEFAULT_CONFIG.clone()
  }
}

impl LinkageConfig {
  /// Parse a category table from YAML.
  ///
  /// The result is not validated until it is handed to a `Linker`.
  pub fn from_yaml(input: &str) -> Result<LinkageConfig, LinkageError> {
    serde_yaml::from_str(input).map_err(|err| LinkageError::ConfigError(format!("could not parse categories: {err}")))
  }

  pub fn with_threshold(mut self, threshold: f64) -> LinkageConfig {
    self.threshold = threshold;
    self
  }

  /// Weight of a category, `fallback_weight` for `other` or any category
  /// without a rule.
  pub fn weight(&self, category: Category) -> f64 {
    self.categories.iter().find(|rule| rule.category == category).map(|rule| rule.weight).unwrap_or(self.fallback_weight)
  }

  pub fn check(&self) -> Result<(), LinkageError> {
    if let Err(errs) = self.validate() {
      return Err(LinkageError::ConfigError(validation_messages(&errs).join(", ")));
    }

    // NaN goes through range validation.
    if !self.threshold.is_finite() || !self.fallback_weight.is_finite() || self.categories.iter().any(|rule| !rule.weight.is_finite()) {
      return Err(LinkageError::ConfigError("weights and threshold must be finite numbers".into()));
    }

    let mut seen = HashSet::default();

    for rule in &self.categories {
      if rule.category == Category::Other {
        return Err(LinkageError::ConfigError("the 'other' category cannot have matching rules".into()));
      }

      if !seen.insert(rule.category) {
        return Err(LinkageError::ConfigError(format!("category '{}' is configured more than once", rule.category)));
      }

      if rule.patterns.iter().any(|pattern| pattern.trim().is_empty()) {
        return Err(LinkageError::ConfigError(format!("category '{}' has an empty pattern", rule.category)));
      }
    }

    Ok(())
  }
}

fn validation_messages(errs: &ValidationErrors) -> Vec<String> {
  errs
    .errors()
    .iter()
    .flat_map(|(field, kind)| match kind {
      ValidationErrorsKind::Field(errors) => errors
        .iter()
        .map(|err| err.message.as_ref().map(|msg| msg.to_string()).unwrap_or_else(|| format!("invalid {field}")))
        .collect::<Vec<_>>(),
      ValidationErrorsKind::Struct(inner) => validation_messages(inner),
      ValidationErrorsKind::List(items) => items.values().flat_map(|inner| validation_messages(inner)).collect(),
    })
    .collect()
}
