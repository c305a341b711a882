mod cancel;
mod config;
mod error;
mod linkage;
mod matching;
mod model;
mod scoring;


/// Load and validate the embedded category table eagerly.
pub fn init() {
  let _ = *crate::config::DEFAULT_CONFIG;
}

pub use crate::cancel::{CancelOnDrop, Cancellation};
pub use crate::config::{CategoryRule, DEFAULT_CONFIG, LinkageConfig};
pub use crate::error::{ComparisonError, LinkageError};
pub use crate::linkage::Linker;
pub use crate::matching::{CrossProduct, FieldComparator, PairGenerator, TextRatio};
pub use crate::model::{CandidatePair, Category, ColumnMetadata, ColumnSpec, Dataset, MatchSet, Row, Value};

pub mod prelude {
  pub use crate::cancel::{CancelOnDrop, Cancellation};
  pub use crate::config::{CategoryRule, DEFAULT_CONFIG, LinkageConfig};
  pub use crate::error::{ComparisonError, LinkageError};
  pub use crate::linkage::Linker;
  pub use crate::matching::{CrossProduct, FieldComparator, PairGenerator, TextRatio};
  pub use crate::model::{CandidatePair, Category, ColumnMetadata, ColumnSpec, Dataset, MatchSet, Row, Value};
}
