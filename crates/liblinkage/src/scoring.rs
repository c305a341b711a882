use std::time::Instant;

use metrics::histogram;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::{Span, instrument};

use crate::{
  cancel::Cancellation,
  config::LinkageConfig,
  error::LinkageError,
  matching::{
    FieldComparator, PairGenerator,
    scorer::{self, comparable_columns},
  },
  model::{CandidatePair, ColumnMetadata, Dataset, MatchSet},
};

/// Score candidate row pairs and keep those above the threshold.
///
/// Left rows are processed in parallel, but results are gathered in
/// enumeration order: left rows first, then right rows in the order the
/// generator yields them.
#[allow(clippy::too_many_arguments)]
#[instrument(name = "find_matches", skip_all, fields(comparator = comparator.name(), generator = generator.name(), left_rows = left.rows.len(), right_rows = right.rows.len()))]
pub(crate) fn run<C: FieldComparator, G: PairGenerator>(
  config: &LinkageConfig,
  comparator: &C,
  generator: &G,
  left: &Dataset,
  right: &Dataset,
  left_columns: Vec<ColumnMetadata>,
  right_columns: Vec<ColumnMetadata>,
  cancel: &Cancellation,
) -> Result<MatchSet, LinkageError> {
  let span = Span::current();
  let then = Instant::now();
  let threshold = config.threshold;
  let columns = comparable_columns(config, &left_columns, &right_columns);

  if columns.is_empty() {
    tracing::warn!("no column pair shares a known category, rows cannot match");
  }

  let pairs = match columns.is_empty() {
    true => Vec::new(),

    false => (0..left.rows.len())
      .into_par_iter()
      .map(|i| {
        let _enter = span.enter();

        let lhs = &left.rows[i];
        let mut matches = Vec::new();

        for j in generator.candidates(left, right, i) {
          if cancel.is_cancelled() {
            return Err(LinkageError::Cancelled);
          }

          let Some(rhs) = right.rows.get(j) else { continue };
          let Some(score) = scorer::score(comparator, threshold, lhs, rhs, &columns) else { continue };

          histogram!("linkage_candidate_scores").record(score);

          tracing::debug!(left_id = i, right_id = j, score, "computed score");

          if score >= threshold {
            matches.push(CandidatePair::new(i, j, score, (&left.columns, lhs), (&right.columns, rhs)));
          }
        }

        Ok(matches)
      })
      .collect::<Result<Vec<_>, _>>()?
      .into_iter()
      .flatten()
      .collect::<Vec<_>>(),
  };

  histogram!("linkage_scoring_latency_seconds").record(then.elapsed().as_secs_f64());
  histogram!("linkage_matches_total").record(pairs.len() as f64);

  tracing::info!(matches = pairs.len(), comparable_columns = columns.len(), latency = then.elapsed().as_millis(), "matching run complete");

  Ok(MatchSet {
    threshold,
    left_columns,
    right_columns,
    pairs,
  })
}
