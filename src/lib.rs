//! Summaries of aggregated flow histograms (`csv_hist` files).
//!
//! A histogram is loaded into an [`AggregatedTable`](table::AggregatedTable) keyed by the
//! buckets of one flow dimension. Two independent summarizers reduce it: an
//! [`AggregateStatsComputer`] producing totals and per-flow averages, and a
//! [`DistributionSummarizer`] sampling the CDF of flows, packets and octets at fixed
//! breakpoints. [`render`] turns both results into tabular text.

pub mod cdf;
pub mod dimension;
pub mod inout;
pub mod render;
pub mod summarizers;
pub mod table;

pub use dimension::{detect_dimension, Dimension, Quantity};
pub use summarizers::distribution::{DistributionSummarizer, DistributionTable};
pub use summarizers::stats::{AggregateStatsComputer, StatsTable};
pub use summarizers::{SummaryError, TableSummarizer};
pub use table::{AggregatedTable, Counter};

use log::debug;

/// Both summaries of one table.
#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    pub stats: StatsTable,
    pub distribution: DistributionTable,
}

/// Runs both summarizers over `table`. `dimension` of `None` detects the dimension from
/// the bucket keys.
pub fn summarize(
    table: &AggregatedTable,
    dimension: Option<Dimension>,
) -> Result<Summary, SummaryError> {
    let stats = AggregateStatsComputer.summarize(table)?;
    let distribution = DistributionSummarizer::new(dimension).summarize(table)?;
    debug!(
        "summarized {} buckets: {} stat rows, {} breakpoints",
        table.len(),
        stats.rows().len(),
        distribution.breakpoints().len()
    );
    Ok(Summary { stats, distribution })
}
