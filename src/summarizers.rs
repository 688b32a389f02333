use thiserror::Error;

use crate::dimension::Dimension;
use crate::table::AggregatedTable;

pub mod distribution;
pub mod stats;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum SummaryError {
    #[error("required column {0} is missing")]
    MissingColumn(&'static str),
    #[error("table has no rows")]
    EmptyTable,
    #[error("cannot detect the dimension, plausible: [{}]", candidate_names(.candidates))]
    AmbiguousDimension { candidates: Vec<Dimension> },
}

fn candidate_names(candidates: &[Dimension]) -> String {
    candidates.iter().map(|d| d.name()).collect::<Vec<_>>().join(", ")
}

/// A pure reduction of one aggregated table.
pub trait TableSummarizer {
    type Output;

    fn summarize(&self, table: &AggregatedTable) -> Result<Self::Output, SummaryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SummaryError::AmbiguousDimension {
            candidates: vec![Dimension::Size, Dimension::Duration],
        };
        assert_eq!(err.to_string(), "cannot detect the dimension, plausible: [size, duration]");
        let err = SummaryError::AmbiguousDimension { candidates: vec![] };
        assert_eq!(err.to_string(), "cannot detect the dimension, plausible: []");
        assert_eq!(
            SummaryError::MissingColumn("octets_sum").to_string(),
            "required column octets_sum is missing"
        );
    }
}
